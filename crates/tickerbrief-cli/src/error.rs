use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] tickerbrief_core::ConfigError),

    #[error("no results to display or send")]
    EmptyReport,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::EmptyReport => 3,
            Self::Io(_) => 10,
        }
    }
}
