//! The shipped configuration files load and run.

use lj2d::{Cutoff, MdConfig, Simulation};
use std::path::PathBuf;

fn config_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("configs")
        .join(filename)
}

#[test]
fn test_shipped_configs_load() {
    let expected = [
        ("hard_cutoff_short.yaml", 0.5, Cutoff::Hard),
        ("hard_cutoff_long.yaml", 1.2, Cutoff::Hard),
        ("switched.yaml", 0.5, Cutoff::Switched { window: 0.1 }),
    ];
    for (file, cutoff, mode) in expected {
        let config = MdConfig::from_file(config_path(file)).unwrap();
        assert_eq!(config.n_atoms(), 25, "{}", file);
        assert_eq!(config.lj_params().cutoff, cutoff, "{}", file);
        assert_eq!(config.cutoff_mode(), mode, "{}", file);
    }
}

#[test]
fn test_shipped_config_runs() {
    let mut config = MdConfig::from_file(config_path("switched.yaml")).unwrap();
    config.integration.total_steps = 20;
    let mut sim = Simulation::new(config).unwrap();
    let mut frames = 0;
    sim.run_configured(|_| {
        frames += 1;
        Ok(())
    })
    .unwrap();
    assert_eq!(frames, 20);
    assert_eq!(sim.energies().len(), 21);
}
