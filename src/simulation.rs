use crate::config::MdConfig;
use crate::error::Result;
use crate::lj_pot::LennardJones;
use crate::pbc::wrap_position;
use crate::run_md::{EnergyRecord, Integrator, Verlet};
use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Read-only view of one sampled point of the trajectory.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub step: usize,
    pub record: &'a EnergyRecord,
    pub positions: &'a [Vector2<f64>],
}

/// Owns the configuration and the integrator for one run.
pub struct Simulation {
    config: MdConfig,
    integrator: Verlet<LennardJones>,
    step: usize,
}

impl Simulation {
    /// Validate `config`, build the initial state and take the bootstrap step.
    ///
    /// Lattice jitter and velocities are drawn, in that order, from one RNG
    /// seeded with `config.system.seed`.
    pub fn new(config: MdConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.system.seed);
        let positions = config.generate_positions(&mut rng);
        let velocities = config.generate_velocities(positions.len(), &mut rng);

        let lj = LennardJones::new(
            config.lj_params(),
            config.system.box_length,
            positions.len(),
            config.cutoff_mode(),
        )?;
        info!(
            "Built {} atoms in a {:.3} box, cutoff {:.3} ({:?})",
            positions.len(),
            config.system.box_length,
            lj.params.cutoff,
            lj.cutoff
        );

        let integrator = Verlet::new(
            positions,
            velocities,
            config.system.mass,
            config.system.k_boltzmann,
            config.integration.time_step,
            lj,
        )?;
        let initial = integrator.last_record();
        info!(
            "Initial energies: PE={:.10} KE={:.10} TE={:.10}",
            initial.potential, initial.kinetic, initial.total
        );

        Ok(Simulation {
            config,
            integrator,
            step: 0,
        })
    }

    /// Advance one time step.
    pub fn step(&mut self) -> Result<&EnergyRecord> {
        self.integrator.propagate()?;
        self.step += 1;
        Ok(self.integrator.last_record())
    }

    /// Run `n_steps` steps, handing every new frame to `observer`.
    pub fn run<O>(&mut self, n_steps: usize, mut observer: O) -> Result<()>
    where
        O: FnMut(Frame<'_>) -> Result<()>,
    {
        let interval = self.config.output.output_interval;
        for _ in 0..n_steps {
            self.step()?;
            if self.step % interval == 0 {
                let record = self.integrator.last_record();
                info!(
                    "Step {}: t={:.4} PE={:.6} KE={:.6} TE={:.6} T={:.2}",
                    self.step,
                    record.time,
                    record.potential,
                    record.kinetic,
                    record.total,
                    self.integrator.temperature()
                );
            }
            observer(self.frame())?;
        }
        Ok(())
    }

    /// Run the number of steps named in the configuration.
    pub fn run_configured<O>(&mut self, observer: O) -> Result<()>
    where
        O: FnMut(Frame<'_>) -> Result<()>,
    {
        self.run(self.config.integration.total_steps, observer)
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            step: self.step,
            record: self.integrator.last_record(),
            positions: self.integrator.positions(),
        }
    }

    pub fn config(&self) -> &MdConfig {
        &self.config
    }

    pub fn n_atoms(&self) -> usize {
        self.integrator.positions().len()
    }

    pub fn steps_taken(&self) -> usize {
        self.step
    }

    pub fn time(&self) -> f64 {
        self.integrator.time()
    }

    pub fn positions(&self) -> &[Vector2<f64>] {
        self.integrator.positions()
    }

    pub fn wrapped_positions(&self) -> Vec<Vector2<f64>> {
        let box_length = self.config.system.box_length;
        self.positions()
            .iter()
            .map(|&x| wrap_position(x, box_length))
            .collect()
    }

    pub fn velocities(&self) -> &[Vector2<f64>] {
        self.integrator.velocities()
    }

    pub fn energies(&self) -> &[EnergyRecord] {
        self.integrator.energies()
    }

    pub fn initial_potential_energy(&self) -> f64 {
        self.integrator.energies()[0].potential
    }

    pub fn temperature(&self) -> f64 {
        self.integrator.temperature()
    }

    pub fn potential(&self) -> &LennardJones {
        self.integrator.provider()
    }

    /// Flip the direction of time for the remaining steps.
    pub fn reverse(&mut self) {
        self.integrator.reverse();
    }
}
