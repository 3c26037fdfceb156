pub type RasterfxResult<T> = Result<T, RasterfxError>;

#[derive(thiserror::Error, Debug)]
pub enum RasterfxError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterfxError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }
}
