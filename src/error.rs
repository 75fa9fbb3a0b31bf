use thiserror::Error;

/// Errors raised by the simulation core.
///
/// Numerical blow-up (NaN or infinite energies) is deliberately absent: it is
/// carried through the energy series and left to the caller to detect.
#[derive(Debug, Error)]
pub enum MdError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Position array has {found} entries, expected {expected}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },
}

pub type Result<T> = std::result::Result<T, MdError>;
