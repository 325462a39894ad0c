use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ed25519_dalek::{Signer as _, SigningKey};
use log::info;
use rand::rngs::OsRng;

use crate::command::{Signature, UnsignedCommand};
use crate::config::parse_secret_key;
use crate::prelude::Result;
use crate::signer::TransactionSigner;
use crate::unsigned::{declared_signers, normalize_sigs};
use crate::Error;

/// Signs with an ed25519 key held in memory.
///
/// Only empty slots belonging to this key are filled; signatures already
/// present are left untouched.
#[derive(Debug, Clone)]
pub struct LocalKeySigner {
    key: SigningKey,
    pub_key: String,
}

impl LocalKeySigner {
    pub fn new(key: SigningKey) -> Self {
        let pub_key = hex::encode(key.verifying_key().as_bytes());
        LocalKeySigner { key, pub_key }
    }

    /// Parses a 64 character hex secret key.
    pub fn from_hex(secret: &str) -> Result<Self> {
        parse_secret_key(secret).map(Self::new)
    }

    pub fn generate() -> Self {
        Self::new(SigningKey::generate(&mut OsRng))
    }

    /// Hex encoded public key, as it appears in a signer's `pubKey`.
    pub fn pub_key(&self) -> &str {
        &self.pub_key
    }

    pub fn sign_one(&self, mut tx: UnsignedCommand) -> Result<UnsignedCommand> {
        tx.verify_hash()?;
        let signers = declared_signers(&tx.cmd)?;
        let mut slots = normalize_sigs(&tx)?;

        let hash_bytes = URL_SAFE_NO_PAD
            .decode(&tx.hash)
            .map_err(|e| Error::SignatureFailure(e.to_string()))?;

        let mut signed = 0;
        let mut owned = 0;
        for (signer, slot) in signers.iter().zip(slots.iter_mut()) {
            if signer.pub_key != self.pub_key {
                continue;
            }
            owned += 1;
            if slot.is_none() {
                let signature = self.key.sign(&hash_bytes);
                *slot = Some(Signature {
                    sig: hex::encode(signature.to_bytes()),
                    pub_key: Some(self.pub_key.clone()),
                });
                signed += 1;
            }
        }
        if owned == 0 {
            return Err(Error::NoMatchingSigner(self.pub_key.clone()));
        }

        info!("Signed {signed} slot(s) of {} with {}", tx.hash, self.pub_key);
        tx.sigs = slots;
        Ok(tx)
    }
}

#[async_trait]
impl TransactionSigner for LocalKeySigner {
    async fn sign(&self, txs: Vec<UnsignedCommand>) -> Result<Vec<UnsignedCommand>> {
        txs.into_iter().map(|tx| self.sign_one(tx)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{PartialCommand, Signer};
    use crate::unsigned::create_transaction;
    use ed25519_dalek::{Verifier, VerifyingKey};

    fn tx_for(keys: &[&str]) -> UnsignedCommand {
        let command = PartialCommand {
            signers: Some(keys.iter().map(|k| Signer::new(*k)).collect()),
            nonce: Some("signer-test".to_string()),
            ..Default::default()
        };
        create_transaction(&command).unwrap()
    }

    #[test]
    fn test_from_hex_derives_public_key() {
        let signer = LocalKeySigner::from_hex(&"07".repeat(32)).unwrap();
        let expected = SigningKey::from_bytes(&[7u8; 32]).verifying_key();
        assert_eq!(signer.pub_key(), hex::encode(expected.as_bytes()));
    }

    #[tokio::test]
    async fn test_sign_fills_own_slot_only() {
        let signer = LocalKeySigner::generate();
        let other = "f".repeat(64);
        let tx = tx_for(&[other.as_str(), signer.pub_key()]);

        let signed = signer.sign(vec![tx.clone()]).await.unwrap();
        assert_eq!(signed.len(), 1);
        let signed = &signed[0];
        assert_eq!(signed.hash, tx.hash);
        assert!(signed.sigs[0].is_none());
        assert!(!signed.is_fully_signed());

        let sig = signed.sigs[1].as_ref().unwrap();
        assert_eq!(sig.pub_key.as_deref(), Some(signer.pub_key()));

        let key_bytes: [u8; 32] = hex::decode(signer.pub_key()).unwrap().try_into().unwrap();
        let verifying = VerifyingKey::from_bytes(&key_bytes).unwrap();
        let sig_bytes: [u8; 64] = hex::decode(&sig.sig).unwrap().try_into().unwrap();
        let hash_bytes = URL_SAFE_NO_PAD.decode(&signed.hash).unwrap();
        assert!(verifying
            .verify(&hash_bytes, &ed25519_dalek::Signature::from_bytes(&sig_bytes))
            .is_ok());
    }

    #[tokio::test]
    async fn test_sign_rejects_transaction_without_own_slot() {
        let signer = LocalKeySigner::generate();
        let tx = tx_for(&["someone-else"]);
        let result = signer.sign(vec![tx]).await;
        assert!(matches!(result, Err(Error::NoMatchingSigner(_))));
    }

    #[tokio::test]
    async fn test_sign_rejects_tampered_hash() {
        let signer = LocalKeySigner::generate();
        let mut tx = tx_for(&[signer.pub_key()]);
        tx.hash = crate::unsigned::hash_command("something else");
        let result = signer.sign(vec![tx]).await;
        assert!(matches!(result, Err(Error::HashMismatch { .. })));
    }

    #[test]
    fn test_existing_signature_is_kept() {
        let signer = LocalKeySigner::generate();
        let mut tx = tx_for(&[signer.pub_key()]);
        let existing = Signature {
            sig: "already".to_string(),
            pub_key: Some(signer.pub_key().to_string()),
        };
        tx.sigs = vec![Some(existing.clone())];

        let signed = signer.sign_one(tx).unwrap();
        assert_eq!(signed.sigs, vec![Some(existing)]);
    }
}
