use thiserror::Error;

use crate::schema::SchemaTag;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Json parse error {0:?}")]
    JsonParse(String),
    #[error("Malformed {schema} input: {message}")]
    MalformedRequest { schema: SchemaTag, message: String },
    #[error("Embedded command could not be parsed: {0}")]
    MalformedCommand(String),
    #[error("Embedded command declares no signer list")]
    MissingSigners,
    #[error("Continuation payloads have no code to express as a signing request")]
    UnsupportedPayload,
    #[error("Hash mismatch: transaction carries {declared}, command hashes to {computed}")]
    HashMismatch { declared: String, computed: String },
    #[error("No signer slot for public key {0}")]
    NoMatchingSigner(String),
    #[error("There is no unsigned transaction to sign")]
    NothingToSign,
    #[error("Invalid builder state: {0}")]
    InvalidState(String),
    #[error("Private key parse error: {0}")]
    PrivateKeyParse(String),
    #[error("Signature failure: {0}")]
    SignatureFailure(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("External signer failed: {0}")]
    Signer(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::JsonParse(e.to_string())
    }
}
