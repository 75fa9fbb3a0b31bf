use crate::error::{MdError, Result};
use itertools::izip;
use nalgebra::Vector2;

pub trait ForceProvider {
    /// Number of atoms the provider was built for
    fn n_atoms(&self) -> usize;

    /// Total potential energy and per-atom forces (negative energy gradient)
    fn compute(&self, positions: &[Vector2<f64>]) -> Result<(f64, Vec<Vector2<f64>>)>;
}

pub trait Integrator {
    /// Advance the system by one time step
    fn propagate(&mut self) -> Result<&EnergyRecord>;

    /// Compute the instantaneous temperature
    fn temperature(&self) -> f64;
}

/// Energies sampled at one point of the trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRecord {
    pub time: f64,
    pub potential: f64,
    pub kinetic: f64,
    pub total: f64,
}

impl EnergyRecord {
    pub fn new(time: f64, potential: f64, kinetic: f64) -> Self {
        EnergyRecord {
            time,
            potential,
            kinetic,
            total: potential + kinetic,
        }
    }
}

#[inline]
fn kinetic_energy(velocities: &[Vector2<f64>], mass: f64) -> f64 {
    0.5 * mass * velocities.iter().map(|v| v.norm_squared()).sum::<f64>()
}

/// Position Verlet integrator for identical particles.
///
/// Keeps two configurations. `previous` is always the configuration described
/// by the last energy record, `current` is one step ahead of it.
pub struct Verlet<F: ForceProvider> {
    current: Vec<Vector2<f64>>,
    previous: Vec<Vector2<f64>>,
    velocities: Vec<Vector2<f64>>,
    mass: f64,
    dt: f64,
    k_b: f64,
    time: f64,
    energies: Vec<EnergyRecord>,
    pub(crate) provider: F,
}

impl<F: ForceProvider> Verlet<F> {
    /// Set up the two-position history from initial positions and velocities.
    ///
    /// The step ahead is a Taylor step `x + v dt + dt^2 F / 2m`, which is the
    /// only place the initial velocities enter the trajectory.
    pub fn new(
        positions: Vec<Vector2<f64>>,
        velocities: Vec<Vector2<f64>>,
        mass: f64,
        k_b: f64,
        dt: f64,
        provider: F,
    ) -> Result<Self> {
        let n = provider.n_atoms();
        if positions.len() != n {
            return Err(MdError::SizeMismatch {
                expected: n,
                found: positions.len(),
            });
        }
        if velocities.len() != n {
            return Err(MdError::SizeMismatch {
                expected: n,
                found: velocities.len(),
            });
        }
        if !(mass > 0.0) {
            return Err(MdError::Config(format!("mass must be positive, got {}", mass)));
        }
        if !(dt > 0.0) {
            return Err(MdError::Config(format!("time step must be positive, got {}", dt)));
        }

        let kinetic = kinetic_energy(&velocities, mass);
        let (potential, forces) = provider.compute(&positions)?;

        let half_dt2_inv_m = 0.5 * dt * dt / mass;
        let current = izip!(&positions, &velocities, &forces)
            .map(|(&x, &v, &f)| x + v * dt + f * half_dt2_inv_m)
            .collect();

        Ok(Verlet {
            current,
            previous: positions,
            velocities,
            mass,
            dt,
            k_b,
            time: 0.0,
            energies: vec![EnergyRecord::new(0.0, potential, kinetic)],
            provider,
        })
    }

    /// Configuration at [`Verlet::time`], the one the last record describes.
    pub fn positions(&self) -> &[Vector2<f64>] {
        &self.previous
    }

    /// Configuration one step ahead of [`Verlet::positions`].
    pub fn next_positions(&self) -> &[Vector2<f64>] {
        &self.current
    }

    /// Velocities at [`Verlet::time`] (central difference after the first step).
    pub fn velocities(&self) -> &[Vector2<f64>] {
        &self.velocities
    }

    pub fn energies(&self) -> &[EnergyRecord] {
        &self.energies
    }

    pub fn last_record(&self) -> &EnergyRecord {
        // never empty: the initial record is pushed in `new`
        &self.energies[self.energies.len() - 1]
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn provider(&self) -> &F {
        &self.provider
    }

    /// Run the trajectory backwards from here on.
    ///
    /// In position form this is a swap of the two stored configurations,
    /// which is exactly what negating every velocity does to the recurrence.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
        for v in &mut self.velocities {
            *v = -*v;
        }
    }
}

impl<F: ForceProvider> Integrator for Verlet<F> {
    fn propagate(&mut self) -> Result<&EnergyRecord> {
        let (potential, forces) = self.provider.compute(&self.current)?;

        let dt2_inv_m = self.dt * self.dt / self.mass;
        let next: Vec<Vector2<f64>> = izip!(&self.current, &self.previous, &forces)
            .map(|(&x, &x_prev, &f)| x * 2.0 - x_prev + f * dt2_inv_m)
            .collect();

        let inv_2dt = 0.5 / self.dt;
        self.velocities = next
            .iter()
            .zip(&self.previous)
            .map(|(&x_next, &x_prev)| (x_next - x_prev) * inv_2dt)
            .collect();
        let kinetic = kinetic_energy(&self.velocities, self.mass);

        self.previous = std::mem::replace(&mut self.current, next);
        self.time += self.dt;
        self.energies
            .push(EnergyRecord::new(self.time, potential, kinetic));

        Ok(self.last_record())
    }

    fn temperature(&self) -> f64 {
        let dof = 2 * self.velocities.len();
        2.0 * self.last_record().kinetic / (dof as f64 * self.k_b)
    }
}
