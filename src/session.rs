use log::{info, warn};

use crate::command::{PartialCommand, UnsignedCommand};
use crate::config::BuilderConfig;
use crate::prelude::Result;
use crate::schema::{ParsedRequest, SchemaTag, SigningCap};
use crate::signer::TransactionSigner;
use crate::unsigned::{create_transaction, normalize_sigs, TransactionSummary};
use crate::Error;

/// State for one paste-review-sign pass over a single payload.
///
/// Quick-sign requests and Pact commands have a transaction as soon as they
/// are processed. Signing requests first need their capabilities assigned to
/// signers with [`SignatureBuilder::assign_signer`] and then a
/// [`SignatureBuilder::build`].
#[derive(Debug, Default)]
pub struct SignatureBuilder {
    input: String,
    schema: Option<SchemaTag>,
    command: Option<PartialCommand>,
    unsigned_tx: Option<UnsignedCommand>,
    caps_without_signers: Vec<SigningCap>,
    extra_signers: Vec<String>,
    signed_tx: Option<UnsignedCommand>,
}

impl SignatureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the session state with whatever `text` holds.
    ///
    /// Unrecognized input is not an error: the schema becomes
    /// [`SchemaTag::Invalid`] and everything else is cleared. Input that is
    /// recognized but malformed clears the state and returns the error.
    pub fn process_input(&mut self, text: &str) -> Result<SchemaTag> {
        *self = SignatureBuilder {
            input: text.to_string(),
            ..Default::default()
        };

        let parsed = match ParsedRequest::parse(text) {
            Ok(parsed) => parsed,
            Err(e) => {
                if let Error::MalformedRequest { schema, .. } = &e {
                    self.schema = Some(*schema);
                }
                return Err(e);
            }
        };
        let schema = parsed.schema();
        self.schema = Some(schema);

        match parsed {
            ParsedRequest::QuickSign { tx, command } => {
                self.command = command;
                self.unsigned_tx = Some(tx);
            }
            ParsedRequest::PactCommand(command) => {
                self.unsigned_tx = Some(create_transaction(&command)?);
                self.command = Some(command);
            }
            ParsedRequest::SigningRequest(request) => {
                self.extra_signers = request.extra_signers.clone();
                let normalized = request.normalize();
                self.command = Some(normalized.command);
                self.caps_without_signers = normalized.caps_without_signers;
            }
            ParsedRequest::Invalid => {}
        }
        Ok(schema)
    }

    /// Moves the capabilities at `cap_indices` out of the unassigned list and
    /// scopes them to `pub_key`. An empty index list declares an unscoped
    /// signer.
    pub fn assign_signer(&mut self, pub_key: &str, cap_indices: &[usize]) -> Result<()> {
        if self.schema != Some(SchemaTag::SigningRequest) || self.unsigned_tx.is_some() {
            return Err(Error::InvalidState(
                "signers can only be assigned to an unbuilt signing request".to_string(),
            ));
        }
        let mut indices = cap_indices.to_vec();
        indices.sort_unstable();
        indices.dedup();
        if indices.len() != cap_indices.len() {
            return Err(Error::InvalidState("duplicate capability index".to_string()));
        }
        if let Some(&out_of_range) = indices
            .iter()
            .find(|&&i| i >= self.caps_without_signers.len())
        {
            return Err(Error::InvalidState(format!(
                "no unassigned capability at index {out_of_range}"
            )));
        }

        let mut caps = Vec::with_capacity(indices.len());
        for &index in indices.iter().rev() {
            caps.push(self.caps_without_signers.remove(index).cap);
        }
        caps.reverse();

        let command = self
            .command
            .as_mut()
            .ok_or_else(|| Error::InvalidState("no command to assign signers to".to_string()))?;
        command.add_signer_capabilities(pub_key, caps);
        Ok(())
    }

    /// Produces the unsigned transaction.
    ///
    /// For a signing request this declares the extra signers, fills unset
    /// fields from `config` and hashes the result. Every capability must have
    /// a signer by then. For the other shapes the transaction already exists
    /// and is returned unchanged.
    pub fn build(&mut self, config: &BuilderConfig) -> Result<&UnsignedCommand> {
        if self.unsigned_tx.is_none() {
            if self.schema != Some(SchemaTag::SigningRequest) {
                return Err(Error::InvalidState("no transaction to build".to_string()));
            }
            if !self.caps_without_signers.is_empty() {
                return Err(Error::InvalidState(format!(
                    "{} capabilities have no signer",
                    self.caps_without_signers.len()
                )));
            }
            let mut command = self
                .command
                .take()
                .ok_or_else(|| Error::InvalidState("no command to build".to_string()))?;
            for pub_key in &self.extra_signers {
                if !command.signers().iter().any(|s| &s.pub_key == pub_key) {
                    command.add_signer_capabilities(pub_key, Vec::new());
                }
            }
            let command = command.with_defaults(config);
            let tx = create_transaction(&command);
            self.command = Some(command);
            self.unsigned_tx = Some(tx?);
        }
        self.unsigned_tx
            .as_ref()
            .ok_or_else(|| Error::InvalidState("no transaction to build".to_string()))
    }

    pub fn summary(&self) -> Option<TransactionSummary> {
        self.command.as_ref().map(|command| {
            TransactionSummary::new(command, self.unsigned_tx.as_ref().map(|tx| tx.hash.as_str()))
        })
    }

    /// Normalizes the signature slots and hands the transaction to `signer`.
    pub async fn sign<S>(&mut self, signer: &S) -> Result<&UnsignedCommand>
    where
        S: TransactionSigner + ?Sized,
    {
        let tx = self.unsigned_tx.as_ref().ok_or(Error::NothingToSign)?;
        let normalized = UnsignedCommand {
            sigs: normalize_sigs(tx)?,
            ..tx.clone()
        };
        info!("Requesting signatures for {}", normalized.hash);

        let signed = signer.sign(vec![normalized]).await?;
        if signed.len() > 1 {
            warn!("Signer returned {} transactions for one request", signed.len());
        }
        let signed = signed
            .into_iter()
            .next()
            .ok_or_else(|| Error::Signer("signer returned no transactions".to_string()))?;
        Ok(&*self.signed_tx.insert(signed))
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn schema(&self) -> Option<SchemaTag> {
        self.schema
    }

    pub fn command(&self) -> Option<&PartialCommand> {
        self.command.as_ref()
    }

    pub fn unsigned_tx(&self) -> Option<&UnsignedCommand> {
        self.unsigned_tx.as_ref()
    }

    pub fn caps_without_signers(&self) -> &[SigningCap] {
        &self.caps_without_signers
    }

    pub fn signed_tx(&self) -> Option<&UnsignedCommand> {
        self.signed_tx.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CancellingSigner;

    #[async_trait]
    impl TransactionSigner for CancellingSigner {
        async fn sign(&self, _txs: Vec<UnsignedCommand>) -> Result<Vec<UnsignedCommand>> {
            Err(Error::Signer("user cancelled".to_string()))
        }
    }

    const SIGNING_REQUEST: &str = r#"{
        "code": "(coin.transfer \"alice\" \"bob\" 1.0)",
        "caps": [
            {"role": "Gas", "description": "pay gas", "cap": {"name": "coin.GAS", "args": []}},
            {"role": "Transfer", "description": "send", "cap": {"name": "coin.TRANSFER", "args": ["alice", "bob", 1.0]}}
        ],
        "chainId": "1",
        "sender": "alice"
    }"#;

    #[test]
    fn test_invalid_input_clears_state() {
        let mut builder = SignatureBuilder::new();
        builder.process_input(SIGNING_REQUEST).unwrap();
        assert_eq!(builder.caps_without_signers().len(), 2);

        let schema = builder.process_input("not json").unwrap();
        assert_eq!(schema, SchemaTag::Invalid);
        assert!(builder.command().is_none());
        assert!(builder.unsigned_tx().is_none());
        assert!(builder.caps_without_signers().is_empty());
        assert_eq!(builder.input(), "not json");
    }

    #[test]
    fn test_malformed_input_keeps_tag() {
        let mut builder = SignatureBuilder::new();
        assert!(builder.process_input(r#"{"payload": 3}"#).is_err());
        assert_eq!(builder.schema(), Some(SchemaTag::PactCommand));
        assert!(builder.command().is_none());
    }

    #[test]
    fn test_assign_signer_validates_indices() {
        let mut builder = SignatureBuilder::new();
        builder.process_input(SIGNING_REQUEST).unwrap();

        assert!(builder.assign_signer("k", &[2]).is_err());
        assert!(builder.assign_signer("k", &[0, 0]).is_err());
        assert_eq!(builder.caps_without_signers().len(), 2);

        builder.assign_signer("k", &[1, 0]).unwrap();
        assert!(builder.caps_without_signers().is_empty());
        let clist = builder.command().unwrap().signers()[0].clist.clone().unwrap();
        assert_eq!(clist[0].name, "coin.GAS");
        assert_eq!(clist[1].name, "coin.TRANSFER");
    }

    #[test]
    fn test_build_requires_all_caps_assigned() {
        let mut builder = SignatureBuilder::new();
        builder.process_input(SIGNING_REQUEST).unwrap();
        builder.assign_signer("k", &[0]).unwrap();

        let result = builder.build(&BuilderConfig::default());
        assert!(matches!(result, Err(Error::InvalidState(_))));
        assert!(builder.command().is_some());
    }

    #[test]
    fn test_assign_after_build_is_rejected() {
        let mut builder = SignatureBuilder::new();
        builder.process_input(SIGNING_REQUEST).unwrap();
        builder.assign_signer("k", &[0, 1]).unwrap();
        builder.build(&BuilderConfig::default()).unwrap();
        assert!(builder.assign_signer("other", &[]).is_err());
    }

    #[tokio::test]
    async fn test_sign_without_transaction() {
        let mut builder = SignatureBuilder::new();
        builder.process_input(SIGNING_REQUEST).unwrap();
        let result = builder.sign(&CancellingSigner).await;
        assert!(matches!(result, Err(Error::NothingToSign)));
    }

    #[tokio::test]
    async fn test_signer_failure_is_propagated() {
        let mut builder = SignatureBuilder::new();
        builder
            .process_input(r#"{"payload":{"exec":{"code":"(+ 1 2)","data":{}}},"signers":[],"nonce":"n1"}"#)
            .unwrap();

        let result = builder.sign(&CancellingSigner).await;
        assert!(matches!(result, Err(Error::Signer(ref msg)) if msg == "user cancelled"));
        assert!(builder.signed_tx().is_none());
    }
}
