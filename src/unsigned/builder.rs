use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use log::info;

use crate::command::{PartialCommand, UnsignedCommand};
use crate::prelude::Result;

type Blake2b256 = Blake2b<U32>;

/// Kadena transaction hash: blake2b-256 of the serialized command, encoded as
/// unpadded url-safe base64.
pub fn hash_command(cmd: &str) -> String {
    let digest = Blake2b256::digest(cmd.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Serializes `command`, hashes it and opens one empty signature slot per
/// declared signer.
///
/// The command is serialized exactly as given; apply
/// [`PartialCommand::with_defaults`] first if it still has gaps.
pub fn create_transaction(command: &PartialCommand) -> Result<UnsignedCommand> {
    let cmd = serde_json::to_string(command)?;
    let hash = hash_command(&cmd);
    let sigs = vec![None; command.signers().len()];
    info!("Built unsigned transaction {hash} with {} signature slots", sigs.len());
    Ok(UnsignedCommand { cmd, hash, sigs })
}
