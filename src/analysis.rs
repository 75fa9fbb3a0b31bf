//! Diagnostics over a finished or running trajectory.
//!
//! Nothing in the integrator calls these: a blown-up run keeps going and it
//! is up to the caller to look at the energy series.

use crate::run_md::EnergyRecord;
use nalgebra::Vector2;

/// Relative total-energy change `|E - E0| / |E0|` of the last record.
///
/// Falls back to the absolute change when `E0` is zero.
pub fn energy_drift(records: &[EnergyRecord]) -> f64 {
    match (records.first(), records.last()) {
        (Some(first), Some(last)) => relative_change(first.total, last.total),
        _ => 0.0,
    }
}

/// Largest relative deviation of the total energy from its first value.
pub fn max_energy_deviation(records: &[EnergyRecord]) -> f64 {
    let Some(first) = records.first() else {
        return 0.0;
    };
    records
        .iter()
        .map(|r| relative_change(first.total, r.total))
        .fold(0.0, f64::max)
}

fn relative_change(reference: f64, value: f64) -> f64 {
    if reference.abs() > 1e-12 {
        (value - reference).abs() / reference.abs()
    } else {
        (value - reference).abs()
    }
}

/// Total linear momentum for identical particles of mass `mass`.
pub fn total_momentum(velocities: &[Vector2<f64>], mass: f64) -> Vector2<f64> {
    velocities.iter().sum::<Vector2<f64>>() * mass
}

/// True once any record carries a NaN or infinite energy.
pub fn has_blown_up(records: &[EnergyRecord]) -> bool {
    records
        .iter()
        .any(|r| !(r.potential.is_finite() && r.kinetic.is_finite() && r.total.is_finite()))
}
