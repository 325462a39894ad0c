use serde::{Deserialize, Serialize};

use crate::command::{Capability, EnvData, ExecPayload, Meta, PartialCommand, Payload};
use crate::prelude::Result;
use crate::Error;

/// Uncompiled code plus the capabilities it needs, before any signer has been
/// paired with those capabilities. Meta fields sit at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EnvData>,
    #[serde(default)]
    pub caps: Vec<SigningCap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Keys that must sign without being scoped to any capability.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_signers: Vec<String>,
}

/// A capability requirement that has not been assigned to a signer yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigningCap {
    pub role: String,
    #[serde(default)]
    pub description: String,
    pub cap: Capability,
}

/// A canonical command and the capabilities still waiting for a signer.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    pub command: PartialCommand,
    pub caps_without_signers: Vec<SigningCap>,
}

impl SigningRequest {
    /// Maps the request onto the canonical command shape.
    ///
    /// Only `code`, `data`, the five flattened meta fields and `nonce` are
    /// carried over; nothing is defaulted or invented here. A missing `data`
    /// becomes an empty mapping.
    pub fn to_partial_command(&self) -> PartialCommand {
        PartialCommand {
            payload: Some(Payload::Exec(ExecPayload {
                code: self.code.clone(),
                data: self.data.clone().unwrap_or_default(),
            })),
            meta: Some(Meta {
                chain_id: self.chain_id.clone(),
                gas_limit: self.gas_limit,
                gas_price: self.gas_price,
                ttl: self.ttl,
                sender: self.sender.clone(),
                creation_time: None,
            }),
            signers: None,
            network_id: None,
            nonce: self.nonce.clone(),
        }
    }

    /// Same as [`SigningRequest::to_partial_command`], with the capabilities
    /// returned alongside the command rather than inside it.
    pub fn normalize(self) -> NormalizedRequest {
        let command = self.to_partial_command();
        NormalizedRequest {
            command,
            caps_without_signers: self.caps,
        }
    }

    /// Inverse of [`SigningRequest::to_partial_command`] for exec payloads.
    ///
    /// Signers, network id and creation time have no place in a signing
    /// request and are not carried.
    pub fn from_partial_command(command: &PartialCommand) -> Result<Self> {
        let exec = command.exec().ok_or(Error::UnsupportedPayload)?;
        let meta = command.meta.clone().unwrap_or_default();
        Ok(SigningRequest {
            code: exec.code.clone(),
            data: Some(exec.data.clone()),
            caps: Vec::new(),
            nonce: command.nonce.clone(),
            chain_id: meta.chain_id,
            gas_limit: meta.gas_limit,
            gas_price: meta.gas_price,
            ttl: meta.ttl,
            sender: meta.sender,
            extra_signers: Vec::new(),
        })
    }
}
