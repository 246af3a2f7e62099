use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiverError {
    #[error("Host capability failed: {0}")]
    Host(String),

    #[error("Invalid push payload: {0}")]
    Payload(String),
}
