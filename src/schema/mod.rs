//! Detection of the wire format a pasted payload is written in.
//!
//! Three shapes are recognized, checked in this order:
//!
//! 1. quick-sign request: an object with a `cmd` string that itself holds JSON
//! 2. signing request: an object with a `code` key
//! 3. Pact command: an object with a `payload` key
//!
//! Only the presence of those keys decides the tag. An object carrying both
//! `cmd` and `code` is a quick-sign request.

mod signing_request;

pub use signing_request::{NormalizedRequest, SigningCap, SigningRequest};

use std::fmt;

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::command::{PartialCommand, Signature, UnsignedCommand};
use crate::prelude::Result;
use crate::unsigned::hash_command;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaTag {
    Invalid,
    QuickSignRequest,
    SigningRequest,
    PactCommand,
}

impl fmt::Display for SchemaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaTag::Invalid => "invalid",
            SchemaTag::QuickSignRequest => "quickSignRequest",
            SchemaTag::SigningRequest => "signingRequest",
            SchemaTag::PactCommand => "PactCommand",
        };
        f.write_str(name)
    }
}

/// Tags `text` by its structure. Never fails: anything unrecognized,
/// including non-JSON and non-object JSON, is [`SchemaTag::Invalid`].
pub fn classify(text: &str) -> SchemaTag {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => classify_object(&object),
        Ok(_) => SchemaTag::Invalid,
        Err(e) => {
            debug!("input is not JSON: {e}");
            SchemaTag::Invalid
        }
    }
}

fn classify_object(object: &Map<String, Value>) -> SchemaTag {
    if let Some(cmd) = object.get("cmd") {
        return match cmd {
            Value::String(inner) if serde_json::from_str::<Value>(inner).is_ok() => {
                SchemaTag::QuickSignRequest
            }
            // Only a string holding JSON counts; numbers and objects are rejected.
            _ => SchemaTag::Invalid,
        };
    }
    if object.contains_key("code") {
        SchemaTag::SigningRequest
    } else if object.contains_key("payload") {
        SchemaTag::PactCommand
    } else {
        SchemaTag::Invalid
    }
}

/// A classified payload decoded into the type for its branch.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRequest {
    Invalid,
    /// `command` is `None` when `tx.cmd` is JSON but not a command. The
    /// transaction is kept so signing can report what is wrong with it.
    QuickSign {
        tx: UnsignedCommand,
        command: Option<PartialCommand>,
    },
    SigningRequest(SigningRequest),
    PactCommand(PartialCommand),
}

/// Quick-sign input as pasted; `hash` is recomputed when missing.
#[derive(Deserialize)]
struct QuickSignInput {
    cmd: String,
    #[serde(default)]
    hash: Option<String>,
    #[serde(default, deserialize_with = "crate::command::deserialize_sig_slots")]
    sigs: Vec<Option<Signature>>,
}

impl ParsedRequest {
    /// Classifies `text` and decodes it.
    ///
    /// An unrecognized payload is `Ok(ParsedRequest::Invalid)`. A payload that
    /// was tagged but does not decode into its shape is
    /// [`Error::MalformedRequest`].
    pub fn parse(text: &str) -> Result<Self> {
        let object = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(object)) => object,
            _ => return Ok(ParsedRequest::Invalid),
        };
        let schema = classify_object(&object);
        debug!("classified input as {schema}");

        let malformed = |message: String| Error::MalformedRequest { schema, message };
        let value = Value::Object(object);
        match schema {
            SchemaTag::Invalid => Ok(ParsedRequest::Invalid),
            SchemaTag::QuickSignRequest => {
                let input: QuickSignInput =
                    serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
                let hash = input.hash.unwrap_or_else(|| hash_command(&input.cmd));
                let tx = UnsignedCommand {
                    cmd: input.cmd,
                    hash,
                    sigs: input.sigs,
                };
                let command = match tx.parse_command() {
                    Ok(command) => Some(command),
                    Err(e) => {
                        debug!("quick-sign cmd does not decode as a command: {e}");
                        None
                    }
                };
                Ok(ParsedRequest::QuickSign { tx, command })
            }
            SchemaTag::SigningRequest => serde_json::from_value(value)
                .map(ParsedRequest::SigningRequest)
                .map_err(|e| malformed(e.to_string())),
            SchemaTag::PactCommand => serde_json::from_value(value)
                .map(ParsedRequest::PactCommand)
                .map_err(|e| malformed(e.to_string())),
        }
    }

    pub fn schema(&self) -> SchemaTag {
        match self {
            ParsedRequest::Invalid => SchemaTag::Invalid,
            ParsedRequest::QuickSign { .. } => SchemaTag::QuickSignRequest,
            ParsedRequest::SigningRequest(_) => SchemaTag::SigningRequest,
            ParsedRequest::PactCommand(_) => SchemaTag::PactCommand,
        }
    }
}
