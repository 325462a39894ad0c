use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Environment data passed to Pact code, keyed by name.
pub type EnvData = Map<String, Value>;

/// Canonical pre-hash representation of a Kadena transaction.
///
/// Every field is optional so that the same type can hold a command that was
/// pasted half-finished, one built from a signing request, and one that is
/// ready to hash. Absent fields are left out of the serialized form, which is
/// what gets hashed, so a command never grows keys it was not given.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signers: Option<Vec<Signer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

/// Either an execution or a continuation of a multi-step pact.
///
/// On the wire this is `{"exec": {...}}` or `{"cont": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Payload {
    Exec(ExecPayload),
    Cont(ContPayload),
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecPayload {
    pub code: String,
    #[serde(default)]
    pub data: EnvData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContPayload {
    pub pact_id: String,
    pub step: u64,
    #[serde(default)]
    pub rollback: bool,
    #[serde(default)]
    pub data: EnvData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<String>,
}

/// Public metadata. `gas_price` is in KDA per unit of gas.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<u64>,
}

/// A named permission a signer scopes its signature to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    pub pub_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clist: Option<Vec<Capability>>,
}

impl Signer {
    pub fn new(pub_key: impl Into<String>) -> Self {
        Signer {
            pub_key: pub_key.into(),
            address: None,
            scheme: None,
            clist: None,
        }
    }
}

/// A signature in a transaction's `sigs` array.
///
/// `pub_key` is optional on the wire; when present it ties the signature to a
/// signer regardless of its position in the array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub sig: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
}

/// Serialized command plus its hash and signature slots.
///
/// A `None` slot serializes as `null` and means "not yet signed". On input a
/// slot written as `{"pubKey": "...", "sig": null}` is also unsigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsignedCommand {
    pub cmd: String,
    pub hash: String,
    #[serde(default, deserialize_with = "super::deserialize_sig_slots")]
    pub sigs: Vec<Option<Signature>>,
}
