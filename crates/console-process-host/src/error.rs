use console_engine::ConsoleError;
use thiserror::Error;

/// Errors that can occur while setting up a [`crate::ProcessHost`]
#[derive(Error, Debug)]
pub enum ProcessHostError {
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Launched process has no {0} pipe")]
    MissingPipe(&'static str),

    #[error(transparent)]
    Console(#[from] ConsoleError),
}
