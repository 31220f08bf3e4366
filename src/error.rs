use thiserror::Error;

#[derive(Error, Debug)]
pub enum RumeterError {
    #[error("翻译错误: {0}")]
    TranslateError(String),

    #[error("模型错误: {0}")]
    ModelError(String),

    #[error("格式错误: {0}")]
    CodecError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML 解析错误: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for RumeterError {
    fn from(err: anyhow::Error) -> Self {
        RumeterError::Other(err.to_string())
    }
}

// Add conversion from translate::TranslateError
impl From<crate::translate::TranslateError> for RumeterError {
    fn from(err: crate::translate::TranslateError) -> Self {
        RumeterError::TranslateError(err.to_string())
    }
}

// Add conversion from model::ModelError
impl From<crate::model::ModelError> for RumeterError {
    fn from(err: crate::model::ModelError) -> Self {
        RumeterError::ModelError(err.to_string())
    }
}

// Add conversion from codec::CodecError
impl From<crate::codec::CodecError> for RumeterError {
    fn from(err: crate::codec::CodecError) -> Self {
        RumeterError::CodecError(err.to_string())
    }
}

/// Result type for rumeter crate
pub type Result<T> = std::result::Result<T, RumeterError>;
