mod config;
mod consts;
mod errors;
pub mod command;
pub mod prelude;
pub mod schema;
pub mod session;
pub mod signer;
pub mod unsigned;

pub use command::{
    Capability, ContPayload, ExecPayload, Meta, PartialCommand, Payload, Signature, Signer,
    UnsignedCommand,
};
pub use config::{signer_key_from_env, BuilderConfig, Network};
pub use consts::{DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE, DEFAULT_TTL};
pub use errors::Error;
pub use schema::{
    classify, NormalizedRequest, ParsedRequest, SchemaTag, SigningCap, SigningRequest,
};
pub use session::SignatureBuilder;
pub use signer::{LocalKeySigner, TransactionSigner};
pub use unsigned::{
    create_transaction, hash_command, normalize_sigs, TransactionSummary, TxType,
};
