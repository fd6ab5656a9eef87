use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("a process logger is already installed")]
    Logger(#[from] log::SetLoggerError),

    #[error("the shared console is already initialized")]
    AlreadyInitialized,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
