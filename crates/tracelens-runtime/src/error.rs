use std::fmt;
use std::path::PathBuf;

/// Result type for tracelens-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Trace or run directory could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Requested run does not exist in the runs directory
    RunNotFound(String),

    /// Runs directory is missing or holds no runs
    NoRuns(PathBuf),

    /// Configuration error
    Config(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => write!(f, "Cannot read {}: {}", path.display(), source),
            Error::RunNotFound(id) => write!(f, "Trace not found: {}", id),
            Error::NoRuns(dir) => write!(f, "No traces found in {}", dir.display()),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::RunNotFound(_) | Error::NoRuns(_) | Error::Config(_) => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
