mod builder;
mod components;
mod sigs;

pub use builder::{create_transaction, hash_command};
pub use components::{TransactionSummary, TxType};
pub(crate) use sigs::declared_signers;
pub use sigs::normalize_sigs;
