mod local;

pub use local::LocalKeySigner;

use async_trait::async_trait;

use crate::command::UnsignedCommand;
use crate::prelude::Result;

/// Something that can add signatures to transactions: a wallet, a hardware
/// key, a remote signing service.
///
/// Implementations return the transactions in the order they were given.
/// Failures (a user cancelling, an unreachable wallet) are returned as-is;
/// callers do not retry.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign(&self, txs: Vec<UnsignedCommand>) -> Result<Vec<UnsignedCommand>>;
}
