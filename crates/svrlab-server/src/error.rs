//! Request-boundary errors and their envelope form

use svrlab_core::SvrError;
use svrlab_io::FileFormat;
use thiserror::Error;

use crate::envelope::ApiResponse;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("File size exceeds {limit} bytes")]
    FileTooLarge { limit: usize },

    #[error("Only {:?} files are allowed", FileFormat::ALLOWED_EXTENSIONS)]
    InvalidFormat { filename: String },

    #[error("Missing form field '{0}'")]
    MissingField(&'static str),

    #[error("Malformed multipart body: {0}")]
    Multipart(String),

    #[error("Worker task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Pipeline(#[from] SvrError),
}

impl ServerError {
    /// Envelope for this failure; `fallback` is the headline for errors
    /// without one of their own.
    pub fn into_envelope<T>(self, fallback: &str) -> ApiResponse<T> {
        let message = match &self {
            ServerError::FileTooLarge { .. } => "File too large",
            ServerError::InvalidFormat { .. } => "Invalid file format",
            ServerError::Pipeline(e) => e.summary(),
            ServerError::MissingField(_) | ServerError::Multipart(_) | ServerError::Task(_) => fallback,
        };
        ApiResponse::failure(message, self.to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::FileTooLarge { .. } => "FileTooLarge",
            ServerError::InvalidFormat { .. } => "InvalidFormat",
            ServerError::MissingField(_) => "MissingField",
            ServerError::Multipart(_) => "Multipart",
            ServerError::Task(_) => "Task",
            ServerError::Pipeline(e) => e.kind(),
        }
    }
}
