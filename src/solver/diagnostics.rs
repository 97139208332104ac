use crate::state::Field;

/// Sum of interior values. For density this is the total mass in the box.
pub fn total_mass(field: &Field) -> f64 {
    field.interior().sum()
}

/// Compute volume-averaged kinetic energy: KE = 0.5 * <vx² + vy²>.
pub fn kinetic_energy(vx: &Field, vy: &Field) -> f64 {
    let count = vx.width() * vx.height();
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = vx.interior().zip(vy.interior()).map(|(u, v)| u * u + v * v).sum();
    0.5 * sum / count as f64
}

/// Central-difference divergence at an interior cell, scaled the same way
/// the projector builds its right-hand side.
pub fn divergence_at(vx: &Field, vy: &Field, i: usize, j: usize) -> f64 {
    let (wf, hf) = (vx.width() as f64, vx.height() as f64);
    -0.5 * ((vx[(i + 1, j)] - vx[(i - 1, j)]) / wf + (vy[(i, j + 1)] - vy[(i, j - 1)]) / hf)
}

/// Write the divergence of every interior cell into `out`.
pub fn divergence(vx: &Field, vy: &Field, out: &mut Field) {
    for j in 1..=vx.height() {
        for i in 1..=vx.width() {
            out[(i, j)] = divergence_at(vx, vy, i, j);
        }
    }
}

pub fn divergence_abs_sum(vx: &Field, vy: &Field) -> f64 {
    let mut sum = 0.0;
    for j in 1..=vx.height() {
        for i in 1..=vx.width() {
            sum += divergence_at(vx, vy, i, j).abs();
        }
    }
    sum
}

pub fn max_abs_divergence(vx: &Field, vy: &Field) -> f64 {
    let mut max = 0.0_f64;
    for j in 1..=vx.height() {
        for i in 1..=vx.width() {
            max = max.max(divergence_at(vx, vy, i, j).abs());
        }
    }
    max
}
