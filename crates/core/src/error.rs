use medcodes_types::TextError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown {kind} label: {value}")]
    UnknownLabel { kind: &'static str, value: String },

    #[error("duplicate code id in catalog: {0}")]
    DuplicateCodeId(String),
    #[error("failed to read catalog file: {0}")]
    CatalogRead(std::io::Error),
    #[error("failed to parse catalog: {0}")]
    CatalogParse(serde_json::Error),

    #[error("invalid storage key: {0}")]
    InvalidStorageKey(String),
    #[error("failed to read stored value: {0}")]
    StorageRead(std::io::Error),
    #[error("failed to write stored value: {0}")]
    StorageWrite(std::io::Error),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("failed to serialize stored value: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize stored value: {0}")]
    Deserialization(serde_json::Error),

    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User with this email already exists")]
    EmailTaken,

    #[error(transparent)]
    Text(#[from] TextError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
