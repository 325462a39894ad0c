use log::{debug, warn};
use serde::Deserialize;

use crate::command::{Signature, Signer, UnsignedCommand};
use crate::prelude::Result;
use crate::Error;

#[derive(Deserialize)]
struct SignerList {
    #[serde(default)]
    signers: Option<Vec<Signer>>,
}

/// Reads only the signer list of a serialized command; the rest of the command
/// does not have to be well formed.
pub(crate) fn declared_signers(cmd: &str) -> Result<Vec<Signer>> {
    let list: SignerList =
        serde_json::from_str(cmd).map_err(|e| Error::MalformedCommand(e.to_string()))?;
    list.signers.ok_or(Error::MissingSigners)
}

/// Aligns `tx.sigs` with the signer list declared in `tx.cmd`.
///
/// The result always has one slot per declared signer. A slot takes the
/// signature whose `pub_key` names that signer, or failing that the unkeyed
/// signature at the same position. Unmatched slots are `None`. Signatures
/// that belong to no declared signer are dropped.
pub fn normalize_sigs(tx: &UnsignedCommand) -> Result<Vec<Option<Signature>>> {
    let signers = declared_signers(&tx.cmd)?;

    let mut used = vec![false; tx.sigs.len()];
    let mut slots = Vec::with_capacity(signers.len());
    for (index, signer) in signers.iter().enumerate() {
        let by_key = tx.sigs.iter().enumerate().position(|(i, slot)| {
            !used[i]
                && matches!(slot, Some(sig) if sig.pub_key.as_deref() == Some(signer.pub_key.as_str()))
        });
        let by_position = match tx.sigs.get(index) {
            Some(Some(sig)) if sig.pub_key.is_none() && !used[index] => Some(index),
            _ => None,
        };

        match by_key.or(by_position) {
            Some(found) => {
                used[found] = true;
                slots.push(tx.sigs[found].clone());
            }
            None => slots.push(None),
        }
    }

    let dropped = tx
        .sigs
        .iter()
        .zip(&used)
        .filter(|(slot, used)| slot.is_some() && !**used)
        .count();
    if dropped > 0 {
        warn!("Dropped {dropped} signature(s) matching no declared signer of {}", tx.hash);
    }
    debug!(
        "Normalized {} signature(s) into {} slot(s) for {}",
        tx.sigs.len(),
        slots.len(),
        tx.hash
    );
    Ok(slots)
}
