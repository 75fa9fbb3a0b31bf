use crate::error::{MdError, Result};
use crate::lj_pot::{Cutoff, LjParams};
use nalgebra::Vector2;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a 2D Lennard-Jones run
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MdConfig {
    /// Particles, box and initial conditions
    pub system: SystemConfig,
    /// Pair potential parameters
    pub potential: PotentialConfig,
    /// Time stepping
    pub integration: IntegrationConfig,
    /// Logging and trajectory output
    #[serde(default)]
    pub output: OutputConfig,
}

/// System setup configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SystemConfig {
    /// Initial atomic positions (generated lattice or explicit)
    pub positions: PositionConfig,
    /// Edge length of the square periodic box
    pub box_length: f64,
    /// Mass shared by all atoms
    pub mass: f64,
    /// Temperature used to draw initial velocities
    pub temperature: f64,
    /// Boltzmann constant in the energy unit of epsilon
    #[serde(default = "default_kb")]
    pub k_boltzmann: f64,
    /// Seed for lattice jitter and velocity sampling
    #[serde(default)]
    pub seed: u64,
}

/// Position configuration options
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum PositionConfig {
    /// Perturbed square lattice filling the box
    #[serde(rename = "square_lattice")]
    SquareLattice {
        /// Number of atoms per side
        n_per_side: usize,
        /// Jitter amplitude as a fraction of the lattice spacing
        #[serde(default = "default_jitter")]
        jitter: f64,
    },
    /// Explicit list of positions
    #[serde(rename = "explicit")]
    Explicit { coords: Vec<[f64; 2]> },
}

/// Potential energy configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum PotentialConfig {
    /// Lennard-Jones potential
    #[serde(rename = "lennard_jones")]
    LennardJones {
        /// Per-atom collision diameter σ (pairs use 2σ)
        sigma: f64,
        /// Well depth ε
        epsilon: f64,
        /// Cutoff distance, must be below half the box length
        cutoff: f64,
        /// Width of the switching region ending at the cutoff (absent or 0: hard cutoff)
        #[serde(default)]
        switch_window: Option<f64>,
    },
}

/// Integration parameters
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IntegrationConfig {
    /// Time step
    pub time_step: f64,
    /// Total number of steps
    pub total_steps: usize,
}

/// Output configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Steps between log lines
    #[serde(default = "default_output_interval")]
    pub output_interval: usize,
    /// Fold positions into the box when writing frames
    #[serde(default)]
    pub wrap_positions: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            output_interval: default_output_interval(),
            wrap_positions: false,
        }
    }
}

// Default value functions
fn default_kb() -> f64 {
    // kJ mol^-1 K^-1
    0.0083144626
}
fn default_jitter() -> f64 {
    // fraction of the spacing; enough to put some neighbours inside short cutoffs
    0.3
}
fn default_output_interval() -> usize {
    100
}

impl Default for MdConfig {
    fn default() -> Self {
        MdConfig {
            system: SystemConfig {
                positions: PositionConfig::SquareLattice {
                    n_per_side: 5,
                    jitter: default_jitter(),
                },
                box_length: 3.0,
                mass: 2.0,
                temperature: 300.0,
                k_boltzmann: default_kb(),
                seed: 0,
            },
            potential: PotentialConfig::LennardJones {
                sigma: 0.27,
                epsilon: 0.3,
                cutoff: 0.5,
                switch_window: None,
            },
            integration: IntegrationConfig {
                time_step: 0.005,
                total_steps: 1000,
            },
            output: OutputConfig::default(),
        }
    }
}

impl MdConfig {
    /// Load configuration from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yml::from_str(content).map_err(|e| MdError::Parse {
            what: "configuration".to_string(),
            message: e.to_string(),
        })
    }

    /// Save configuration to YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yml::to_string(self).map_err(|e| MdError::Parse {
            what: "configuration".to_string(),
            message: e.to_string(),
        })?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(MdError::Config(msg));

        if !(self.integration.time_step > 0.0) {
            return invalid("time step must be positive".to_string());
        }
        if !(self.system.box_length > 0.0) {
            return invalid("box length must be positive".to_string());
        }
        if !(self.system.mass > 0.0) {
            return invalid("mass must be positive".to_string());
        }
        if !(self.system.temperature >= 0.0) {
            return invalid("temperature must not be negative".to_string());
        }
        if !(self.system.k_boltzmann > 0.0) {
            return invalid("Boltzmann constant must be positive".to_string());
        }
        if self.output.output_interval == 0 {
            return invalid("output interval must be positive".to_string());
        }

        match &self.system.positions {
            PositionConfig::SquareLattice { n_per_side, jitter } => {
                if *n_per_side < 2 {
                    return invalid(format!("n_per_side must be at least 2, got {}", n_per_side));
                }
                if !(0.0..=1.0).contains(jitter) {
                    return invalid(format!("lattice jitter must be in [0, 1], got {}", jitter));
                }
            }
            PositionConfig::Explicit { coords } => {
                if coords.len() < 2 {
                    return invalid(format!("at least 2 atoms are required, got {}", coords.len()));
                }
            }
        }

        let PotentialConfig::LennardJones {
            sigma,
            epsilon,
            cutoff,
            switch_window,
        } = &self.potential;
        if !(*sigma > 0.0) {
            return invalid("LJ sigma must be positive".to_string());
        }
        if !(*epsilon > 0.0) {
            return invalid("LJ epsilon must be positive".to_string());
        }
        if !(*cutoff > 0.0) {
            return invalid("LJ cutoff must be positive".to_string());
        }
        if *cutoff >= 0.5 * self.system.box_length {
            return invalid(format!(
                "cutoff ({}) must be smaller than half the box length ({})",
                cutoff,
                0.5 * self.system.box_length
            ));
        }
        if let Some(window) = switch_window {
            if !(*window >= 0.0 && *window <= *cutoff) {
                return invalid(format!(
                    "switching window ({}) must satisfy 0 <= window <= cutoff ({})",
                    window, cutoff
                ));
            }
        }

        Ok(())
    }

    pub fn n_atoms(&self) -> usize {
        match &self.system.positions {
            PositionConfig::SquareLattice { n_per_side, .. } => n_per_side * n_per_side,
            PositionConfig::Explicit { coords } => coords.len(),
        }
    }

    pub fn lj_params(&self) -> LjParams {
        let PotentialConfig::LennardJones {
            sigma,
            epsilon,
            cutoff,
            ..
        } = self.potential;
        LjParams {
            sigma,
            epsilon,
            cutoff,
        }
    }

    pub fn cutoff_mode(&self) -> Cutoff {
        let PotentialConfig::LennardJones { switch_window, .. } = self.potential;
        Cutoff::from_window(switch_window)
    }

    /// Generate positions based on configuration
    pub fn generate_positions<R: Rng>(&self, rng: &mut R) -> Vec<Vector2<f64>> {
        match &self.system.positions {
            PositionConfig::Explicit { coords } => {
                coords.iter().map(|&c| Vector2::new(c[0], c[1])).collect()
            }
            PositionConfig::SquareLattice { n_per_side, jitter } => {
                let spacing = self.system.box_length / *n_per_side as f64;
                let amplitude = jitter * spacing;
                let mut positions = Vec::with_capacity(n_per_side * n_per_side);

                for i in 0..*n_per_side {
                    for j in 0..*n_per_side {
                        let site = Vector2::new(
                            (i as f64 + 0.5) * spacing,
                            (j as f64 + 0.5) * spacing,
                        );
                        let offset = Vector2::new(
                            rng.gen::<f64>() - 0.5,
                            rng.gen::<f64>() - 0.5,
                        );
                        positions.push(site + offset * amplitude);
                    }
                }
                positions
            }
        }
    }

    /// Draw Maxwell-Boltzmann velocities, `sqrt(k_B T / m)` per component.
    ///
    /// Net momentum is left as drawn.
    pub fn generate_velocities<R: Rng>(&self, n_atoms: usize, rng: &mut R) -> Vec<Vector2<f64>> {
        let scale = (self.system.k_boltzmann * self.system.temperature / self.system.mass).sqrt();
        (0..n_atoms)
            .map(|_| {
                let vx: f64 = rng.sample(StandardNormal);
                let vy: f64 = rng.sample(StandardNormal);
                Vector2::new(vx, vy) * scale
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_validation() {
        let mut config = MdConfig::default();
        assert!(config.validate().is_ok());

        config.integration.time_step = -0.1;
        assert!(config.validate().is_err());
        config.integration.time_step = 0.005;

        config.system.mass = 0.0;
        assert!(config.validate().is_err());
        config.system.mass = 2.0;

        // NaN is not a valid parameter
        config.integration.time_step = f64::NAN;
        assert!(config.validate().is_err());
        config.integration.time_step = 0.005;
        config.system.mass = f64::NAN;
        assert!(config.validate().is_err());
        config.system.mass = 2.0;
        config.system.box_length = f64::NAN;
        assert!(config.validate().is_err());
        config.system.box_length = 3.0;
        config.system.temperature = f64::NAN;
        assert!(config.validate().is_err());
        config.system.temperature = 300.0;
        assert!(config.validate().is_ok());

        if let PotentialConfig::LennardJones {
            ref mut switch_window,
            ..
        } = config.potential
        {
            *switch_window = Some(0.8);
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cutoff_must_fit_half_box() {
        let mut config = MdConfig::default();
        if let PotentialConfig::LennardJones { ref mut cutoff, .. } = config.potential {
            *cutoff = 1.5;
        }
        match config.validate() {
            Err(MdError::Config(msg)) => assert!(msg.contains("half the box length"), "{}", msg),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_lattice_generation() {
        let mut config = MdConfig::default();
        config.system.positions = PositionConfig::SquareLattice {
            n_per_side: 5,
            jitter: 0.0,
        };
        let positions = config.generate_positions(&mut StdRng::seed_from_u64(0));
        assert_eq!(positions.len(), 25);
        assert_eq!(config.n_atoms(), 25);

        let mut xs: Vec<f64> = positions.iter().map(|p| p.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        xs.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
        assert_eq!(xs.len(), 5);
        assert!((xs[1] - xs[0] - 0.6).abs() < 1e-12);
        assert!((xs[0] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_lattice_jitter_is_bounded_and_seeded() {
        let config = MdConfig::default();
        let a = config.generate_positions(&mut StdRng::seed_from_u64(3));
        let b = config.generate_positions(&mut StdRng::seed_from_u64(3));
        let c = config.generate_positions(&mut StdRng::seed_from_u64(4));
        assert_eq!(a, b);
        assert_ne!(a, c);

        let spacing = 0.6;
        for (k, p) in a.iter().enumerate() {
            let site = Vector2::new(
                ((k / 5) as f64 + 0.5) * spacing,
                ((k % 5) as f64 + 0.5) * spacing,
            );
            let offset = p - site;
            assert!(offset.x.abs() <= 0.15 * spacing + 1e-12);
            assert!(offset.y.abs() <= 0.15 * spacing + 1e-12);
        }
    }

    #[test]
    fn test_velocity_distribution() {
        let mut config = MdConfig::default();
        config.system.k_boltzmann = 1.0;
        config.system.temperature = 2.0;
        config.system.mass = 0.5;
        let velocities = config.generate_velocities(20_000, &mut StdRng::seed_from_u64(9));
        assert_eq!(velocities.len(), 20_000);

        // per-component variance is k_B T / m = 4
        let n = velocities.len() as f64;
        let var_x = velocities.iter().map(|v| v.x * v.x).sum::<f64>() / n;
        let var_y = velocities.iter().map(|v| v.y * v.y).sum::<f64>() / n;
        assert!((var_x - 4.0).abs() < 0.2, "var_x = {}", var_x);
        assert!((var_y - 4.0).abs() < 0.2, "var_y = {}", var_y);
    }

    #[test]
    fn test_yaml_serialization() {
        let mut config = MdConfig::default();
        if let PotentialConfig::LennardJones {
            ref mut switch_window,
            ..
        } = config.potential
        {
            *switch_window = Some(0.1);
        }
        let yaml = serde_yml::to_string(&config).unwrap();
        let deserialized = MdConfig::from_yaml(&yaml).unwrap();
        assert_eq!(deserialized, config);
        assert_eq!(deserialized.cutoff_mode(), Cutoff::Switched { window: 0.1 });
    }

    #[test]
    fn test_yaml_defaults() {
        let yaml = r#"
system:
  positions:
    type: square_lattice
    n_per_side: 4
  box_length: 3.0
  mass: 2.0
  temperature: 300.0
potential:
  type: lennard_jones
  sigma: 0.27
  epsilon: 0.3
  cutoff: 1.2
integration:
  time_step: 0.005
  total_steps: 50
"#;
        let config = MdConfig::from_yaml(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.system.seed, 0);
        assert_eq!(config.system.k_boltzmann, default_kb());
        assert_eq!(config.output, OutputConfig::default());
        assert_eq!(config.cutoff_mode(), Cutoff::Hard);
        assert_eq!(
            config.system.positions,
            PositionConfig::SquareLattice {
                n_per_side: 4,
                jitter: 0.3
            }
        );
    }

    #[test]
    fn test_file_io() {
        let config = MdConfig::default();
        let temp_file = NamedTempFile::new().unwrap();
        config.to_file(temp_file.path()).unwrap();

        let loaded = MdConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            MdConfig::from_yaml("system: [1, 2"),
            Err(MdError::Parse { .. })
        ));
    }
}
