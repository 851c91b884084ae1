use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaintError {
    #[error("invalid stylesheet: {0}")]
    InvalidStylesheet(String),
    #[error("invalid style declaration: {0}")]
    InvalidDeclaration(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
