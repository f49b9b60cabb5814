use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No async runtime available, context: {context}")]
    RuntimeUnavailable { context: String },
}

impl Error {
    pub fn runtime_unavailable(context: impl Into<String>) -> Self {
        Self::RuntimeUnavailable {
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
