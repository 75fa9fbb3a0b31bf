pub mod analysis;
pub mod config;
pub mod error;
pub mod lj_pot;
pub mod pairs;
pub mod pbc;
pub mod run_md;
pub mod simulation;
pub mod trajectory;

pub use config::MdConfig;
pub use error::MdError;
pub use lj_pot::{Cutoff, LennardJones, LjParams};
pub use run_md::{EnergyRecord, ForceProvider, Integrator, Verlet};
pub use simulation::{Frame, Simulation};
