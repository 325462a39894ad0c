mod types;

pub use types::*;

use chrono::Utc;
use serde::{Deserialize, Deserializer};

use crate::config::BuilderConfig;
use crate::consts::NONCE_PREFIX;
use crate::prelude::Result;
use crate::unsigned::hash_command;
use crate::Error;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SigSlot {
    #[serde(default)]
    sig: Option<String>,
    #[serde(default)]
    pub_key: Option<String>,
}

/// Reads a `sigs` array where an unsigned slot is either `null` or an entry
/// whose `sig` is `null`.
pub(crate) fn deserialize_sig_slots<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<Option<Signature>>, D::Error>
where
    D: Deserializer<'de>,
{
    let slots: Vec<Option<SigSlot>> = Vec::deserialize(deserializer)?;
    Ok(slots
        .into_iter()
        .map(|slot| {
            slot.and_then(|slot| {
                slot.sig.map(|sig| Signature {
                    sig,
                    pub_key: slot.pub_key,
                })
            })
        })
        .collect())
}

impl PartialCommand {
    pub fn exec(&self) -> Option<&ExecPayload> {
        match &self.payload {
            Some(Payload::Exec(exec)) => Some(exec),
            _ => None,
        }
    }

    pub fn is_continuation(&self) -> bool {
        matches!(self.payload, Some(Payload::Cont(_)))
    }

    /// Declared signers, empty when the command has none yet.
    pub fn signers(&self) -> &[Signer] {
        self.signers.as_deref().unwrap_or_default()
    }

    /// Fills every field the command leaves unset with the builder's defaults.
    /// Fields that are already present are never overwritten.
    pub fn with_defaults(mut self, config: &BuilderConfig) -> Self {
        let now = Utc::now();

        let meta = self.meta.get_or_insert_with(Meta::default);
        meta.chain_id.get_or_insert_with(|| config.chain_id.clone());
        meta.sender.get_or_insert_with(String::new);
        meta.gas_limit.get_or_insert(config.gas_limit);
        meta.gas_price.get_or_insert(config.gas_price);
        meta.ttl.get_or_insert(config.ttl);
        meta.creation_time.get_or_insert(now.timestamp().max(0) as u64);

        self.nonce
            .get_or_insert_with(|| format!("{NONCE_PREFIX}{}", now.timestamp_millis()));
        self.network_id
            .get_or_insert_with(|| config.network.id().to_string());
        self.signers.get_or_insert_with(Vec::new);
        self
    }

    /// Scopes `caps` to the signer owning `pub_key`, adding that signer if the
    /// command does not declare it yet.
    pub fn add_signer_capabilities(&mut self, pub_key: &str, caps: Vec<Capability>) {
        let signers = self.signers.get_or_insert_with(Vec::new);
        let signer = match signers.iter().position(|s| s.pub_key == pub_key) {
            Some(index) => &mut signers[index],
            None => {
                signers.push(Signer::new(pub_key));
                let last = signers.len() - 1;
                &mut signers[last]
            }
        };
        signer.clist.get_or_insert_with(Vec::new).extend(caps);
    }
}

impl UnsignedCommand {
    /// Decodes the embedded command.
    pub fn parse_command(&self) -> Result<PartialCommand> {
        serde_json::from_str(&self.cmd).map_err(|e| Error::MalformedCommand(e.to_string()))
    }

    pub fn verify_hash(&self) -> Result<()> {
        let computed = hash_command(&self.cmd);
        if computed == self.hash {
            Ok(())
        } else {
            Err(Error::HashMismatch {
                declared: self.hash.clone(),
                computed,
            })
        }
    }

    pub fn is_fully_signed(&self) -> bool {
        self.sigs.iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_command_wire_names() {
        let command: PartialCommand = serde_json::from_value(json!({
            "payload": {"exec": {"code": "(+ 1 2)", "data": {"ks": ["k"]}}},
            "meta": {"chainId": "1", "gasLimit": 1000, "gasPrice": 0.00000001, "creationTime": 7},
            "signers": [{"pubKey": "abc", "clist": [{"name": "coin.GAS", "args": []}]}],
            "networkId": "testnet04",
            "nonce": "n1"
        }))
        .unwrap();

        assert_eq!(command.exec().unwrap().code, "(+ 1 2)");
        let meta = command.meta.as_ref().unwrap();
        assert_eq!(meta.chain_id.as_deref(), Some("1"));
        assert_eq!(meta.creation_time, Some(7));
        assert_eq!(command.signers()[0].pub_key, "abc");
        assert_eq!(command.network_id.as_deref(), Some("testnet04"));
    }

    #[test]
    fn test_null_sig_entries_are_unsigned_slots() {
        let tx: UnsignedCommand = serde_json::from_value(json!({
            "cmd": "{}",
            "hash": "h",
            "sigs": [{"pubKey": "k1", "sig": null}, null, {"pubKey": "k3", "sig": "s3"}]
        }))
        .unwrap();

        assert_eq!(
            tx.sigs,
            vec![
                None,
                None,
                Some(Signature {
                    sig: "s3".to_string(),
                    pub_key: Some("k3".to_string()),
                }),
            ]
        );
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let command = PartialCommand {
            nonce: Some("n1".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&command).unwrap(), r#"{"nonce":"n1"}"#);
    }

    #[test]
    fn test_continuation_payload() {
        let command: PartialCommand = serde_json::from_value(json!({
            "payload": {"cont": {"pactId": "p1", "step": 1, "rollback": false}}
        }))
        .unwrap();
        assert!(command.is_continuation());
        assert!(command.exec().is_none());
    }

    #[test]
    fn test_with_defaults_keeps_existing_values() {
        let command = PartialCommand {
            meta: Some(Meta {
                gas_limit: Some(42),
                ..Default::default()
            }),
            nonce: Some("mine".to_string()),
            ..Default::default()
        }
        .with_defaults(&BuilderConfig::default());

        let meta = command.meta.unwrap();
        assert_eq!(meta.gas_limit, Some(42));
        assert_eq!(meta.gas_price, Some(crate::DEFAULT_GAS_PRICE));
        assert_eq!(meta.ttl, Some(crate::DEFAULT_TTL));
        assert!(meta.creation_time.is_some());
        assert_eq!(command.nonce.as_deref(), Some("mine"));
        assert_eq!(command.network_id.as_deref(), Some("testnet04"));
        assert_eq!(command.signers, Some(vec![]));
    }

    #[test]
    fn test_add_signer_capabilities_extends_existing_signer() {
        let gas = Capability {
            name: "coin.GAS".to_string(),
            args: vec![],
        };
        let transfer = Capability {
            name: "coin.TRANSFER".to_string(),
            args: vec![json!("alice"), json!("bob"), json!(1.0)],
        };

        let mut command = PartialCommand::default();
        command.add_signer_capabilities("alice-key", vec![gas.clone()]);
        command.add_signer_capabilities("bob-key", vec![]);
        command.add_signer_capabilities("alice-key", vec![transfer.clone()]);

        let signers = command.signers();
        assert_eq!(signers.len(), 2);
        assert_eq!(signers[0].clist, Some(vec![gas, transfer]));
        assert_eq!(signers[1].clist, Some(vec![]));
    }
}
