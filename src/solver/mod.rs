mod boundary;
mod core;
pub mod diagnostics;
mod params;

// Re-export public API
pub use boundary::{set_bnd, FieldType};
pub use core::{advect, diffuse, lin_solve, project, RELAX_ITERATIONS};
pub use params::SolverParams;

use crate::state::SimState;

/// Velocity half of a tick: diffuse, project, self-advect, project again.
pub fn velocity_step(state: &mut SimState, params: &SolverParams, dt: f64) {
    let SimState { vx, vy, scratch_p, scratch_div, .. } = state;

    // Diffuse velocity
    vx.swap();
    {
        let (cur, prev) = vx.split_mut();
        diffuse(FieldType::Vx, cur, prev, params.visc, dt);
    }
    vy.swap();
    {
        let (cur, prev) = vy.split_mut();
        diffuse(FieldType::Vy, cur, prev, params.visc, dt);
    }

    // Project to make diffused velocity divergence-free
    project(vx.current_mut(), vy.current_mut(), scratch_p, scratch_div);

    // Advect velocity through the projected field
    vx.swap();
    vy.swap();
    {
        let (ux, ux0) = vx.split_mut();
        advect(FieldType::Vx, ux, ux0, ux0, vy.previous(), dt);
    }
    {
        let (uy, uy0) = vy.split_mut();
        advect(FieldType::Vy, uy, uy0, vx.previous(), uy0, dt);
    }

    project(vx.current_mut(), vy.current_mut(), scratch_p, scratch_div);
}

/// Density half of a tick: diffuse, then carry along the resolved velocity.
pub fn density_step(state: &mut SimState, params: &SolverParams, dt: f64) {
    let SimState { density, vx, vy, .. } = state;

    density.swap();
    {
        let (cur, prev) = density.split_mut();
        diffuse(FieldType::Scalar, cur, prev, params.diff, dt);
    }
    density.swap();
    let (cur, prev) = density.split_mut();
    advect(FieldType::Scalar, cur, prev, vx.current(), vy.current(), dt);
}

/// One full simulation tick. Velocity is fully resolved before density moves.
pub fn fluid_step(state: &mut SimState, params: &SolverParams, dt: f64) {
    velocity_step(state, params, dt);
    density_step(state, params, dt);
    state.tick += 1;
}
