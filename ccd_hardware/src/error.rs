use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("no board with id {0} on the command bus")]
    NoSuchBoard(u32),
    #[error("command reply timeout")]
    Timeout,
}
