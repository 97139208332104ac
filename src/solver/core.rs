use super::boundary::{set_bnd, FieldType};
use super::diagnostics::divergence;
use crate::state::Field;

/// Gauss-Seidel sweeps per linear solve. Fixed, with no convergence check.
pub const RELAX_ITERATIONS: usize = 20;

/// Gauss-Seidel iterative linear solver.
/// Solves: x[i,j] = (x0[i,j] + a * (neighbors)) / c
pub fn lin_solve(field_type: FieldType, x: &mut Field, x0: &Field, a: f64, c: f64) {
    let (w, h) = (x.width(), x.height());
    for _ in 0..RELAX_ITERATIONS {
        for i in 1..=w {
            for j in 1..=h {
                let neighbors = x[(i - 1, j)] + x[(i + 1, j)] + x[(i, j - 1)] + x[(i, j + 1)];
                x[(i, j)] = (x0[(i, j)] + a * neighbors) / c;
            }
        }
        set_bnd(field_type, x);
    }
}

/// Diffusion step: spreads the field over time.
/// a = dt * rate * W * H, c = 1 + 4a
pub fn diffuse(field_type: FieldType, x: &mut Field, x0: &Field, rate: f64, dt: f64) {
    let a = dt * rate * (x.width() * x.height()) as f64;
    lin_solve(field_type, x, x0, a, 1.0 + 4.0 * a);
}

/// Semi-Lagrangian advection: traces each cell backwards through the velocity field.
pub fn advect(field_type: FieldType, d: &mut Field, d0: &Field, vx: &Field, vy: &Field, dt: f64) {
    let (w, h) = (d.width(), d.height());
    let dtx = dt * w as f64;
    let dty = dt * h as f64;
    let (max_x, max_y) = (w as f64 + 0.5, h as f64 + 0.5);

    for i in 1..=w {
        for j in 1..=h {
            // Clamp keeps the bilinear footprint inside the bordered grid.
            let x = (i as f64 - dtx * vx[(i, j)]).clamp(0.5, max_x);
            let y = (j as f64 - dty * vy[(i, j)]).clamp(0.5, max_y);

            let i0 = x.floor() as usize;
            let j0 = y.floor() as usize;
            let (i1, j1) = (i0 + 1, j0 + 1);
            let s1 = x - i0 as f64;
            let s0 = 1.0 - s1;
            let t1 = y - j0 as f64;
            let t0 = 1.0 - t1;

            d[(i, j)] = s0 * (t0 * d0[(i0, j0)] + t1 * d0[(i0, j1)])
                + s1 * (t0 * d0[(i1, j0)] + t1 * d0[(i1, j1)]);
        }
    }
    set_bnd(field_type, d);
}

/// Pressure projection: removes the divergent part of the velocity field.
pub fn project(vx: &mut Field, vy: &mut Field, p: &mut Field, div: &mut Field) {
    let (w, h) = (vx.width(), vx.height());
    let (wf, hf) = (w as f64, h as f64);

    divergence(vx, vy, div);
    p.fill(0.0);
    set_bnd(FieldType::Scalar, div);
    set_bnd(FieldType::Scalar, p);

    lin_solve(FieldType::Scalar, p, div, 1.0, 4.0);

    for i in 1..=w {
        for j in 1..=h {
            vx[(i, j)] -= 0.5 * (p[(i + 1, j)] - p[(i - 1, j)]) * wf;
            vy[(i, j)] -= 0.5 * (p[(i, j + 1)] - p[(i, j - 1)]) * hf;
        }
    }
    set_bnd(FieldType::Vx, vx);
    set_bnd(FieldType::Vy, vy);
}
