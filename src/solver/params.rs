/// Solver parameters for the fluid simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverParams {
    /// Interior grid width (W).
    pub width: usize,
    /// Interior grid height (H).
    pub height: usize,
    /// Density diffusion rate.
    pub diff: f64,
    /// Kinematic viscosity applied to both velocity components.
    pub visc: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            diff: 0.01,
            visc: 0.01,
        }
    }
}

impl SolverParams {
    /// Inviscid, non-diffusive flow: only advection and projection act.
    pub fn inviscid(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            diff: 0.0,
            visc: 0.0,
        }
    }
}
