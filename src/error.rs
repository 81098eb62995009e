/// Fatal startup problem. Reported before any audit pass begins.
#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::error::ConfigError {
            message: format!($($arg)*),
        }
    };
}

#[macro_export]
macro_rules! config_err {
    ($($arg:tt)*) => {
        Err($crate::config_error!($($arg)*))
    };
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Failure to resolve an object against the cluster. Transient read errors
/// are retried by the reader; whatever surfaces here is final for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    NotFound,
    Read(String),
}

impl std::error::Error for LookupError {}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::NotFound => write!(f, "not found"),
            LookupError::Read(message) => write!(f, "read error: {message}"),
        }
    }
}
