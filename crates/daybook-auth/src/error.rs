use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Identity provider error: {0}")]
    Provider(String),
}
