//! lj2d command-line runner
//!
//! Loads a YAML configuration, runs the simulation and optionally writes the
//! trajectory log. All physics lives in the library.

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs::File;
use std::io::BufWriter;
use tracing::{info, warn};

mod cli;

use cli::{setup_output, Args};
use lj2d::analysis::{energy_drift, has_blown_up, total_momentum};
use lj2d::config::PotentialConfig;
use lj2d::trajectory::TrajectoryWriter;
use lj2d::{MdConfig, Simulation};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_output(args.output.as_ref());

    info!("Reading configuration from: {}", args.config_file);
    let mut config = MdConfig::from_file(&args.config_file)
        .wrap_err_with(|| format!("Unable to load configuration file: {}", args.config_file))?;
    apply_overrides(&mut config, &args);
    info!("Configuration loaded:\n{:?}", config);

    let mut sim = Simulation::new(config).wrap_err("Failed to set up simulation")?;

    let mut writer = match &args.trajectory {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("Unable to create trajectory file: {}", path))?;
            let mut writer = TrajectoryWriter::new(BufWriter::new(file));
            if sim.config().output.wrap_positions {
                writer = writer.wrapped(sim.config().system.box_length);
            }
            writer.write_header(sim.n_atoms())?;
            writer.write_frame(&sim.frame())?;
            info!("Trajectory will be written to: {}", path);
            Some(writer)
        }
        None => None,
    };

    sim.run_configured(|frame| match writer.as_mut() {
        Some(w) => w.write_frame(&frame),
        None => Ok(()),
    })
    .wrap_err("Simulation run failed")?;

    if let Some(w) = writer.as_mut() {
        w.flush()?;
    }

    report(&sim);
    Ok(())
}

fn apply_overrides(config: &mut MdConfig, args: &Args) {
    if let Some(steps) = args.steps {
        info!("Overriding total_steps with: {}", steps);
        config.integration.total_steps = steps;
    }
    if let Some(seed) = args.seed {
        info!("Overriding seed with: {}", seed);
        config.system.seed = seed;
    }
    if let Some(window) = args.switch_window {
        info!("Overriding switch_window with: {}", window);
        let PotentialConfig::LennardJones { switch_window, .. } = &mut config.potential;
        *switch_window = Some(window);
    }
}

fn report(sim: &Simulation) {
    let energies = sim.energies();
    if has_blown_up(energies) {
        warn!("Non-finite energies in the trajectory: the time step or cutoff is likely unsuitable");
    }

    let last = sim.frame().record;
    info!("\nRun finished after {} steps (t = {:.4})", sim.steps_taken(), last.time);
    info!("Initial potential energy: {:.10}", sim.initial_potential_energy());
    info!(
        "Final energies: PE={:.10} KE={:.10} TE={:.10}",
        last.potential, last.kinetic, last.total
    );
    info!("Relative total energy drift: {:.6e}", energy_drift(energies));

    let p = total_momentum(sim.velocities(), sim.config().system.mass);
    info!("Total momentum: [{:.6e}, {:.6e}]", p.x, p.y);
}
