use std::fmt;

use serde_json::Value;

use crate::command::{PartialCommand, Payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxType {
    Exec,
    Cont,
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxType::Exec => f.write_str("Exec"),
            TxType::Cont => f.write_str("Cont"),
        }
    }
}

/// What a reviewer needs to see before signing.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSummary {
    pub hash: Option<String>, // None until the transaction has been built
    pub tx_type: TxType,
    pub code: Option<String>, // Only exec payloads carry code
    pub data: Value,
    pub network_id: Option<String>,
    pub chain_id: Option<String>,
    pub gas_payer: Option<String>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<f64>,
    pub max_gas_cost: Option<f64>, // gas_price * gas_limit, when both are known
    pub creation_time: Option<u64>,
    pub ttl: Option<u64>,
    pub nonce: Option<String>,
    pub signer_count: usize,
}

impl TransactionSummary {
    pub fn new(command: &PartialCommand, hash: Option<&str>) -> Self {
        let (tx_type, code, data) = match &command.payload {
            Some(Payload::Cont(cont)) => (TxType::Cont, None, Value::Object(cont.data.clone())),
            Some(Payload::Exec(exec)) => (
                TxType::Exec,
                Some(exec.code.clone()),
                Value::Object(exec.data.clone()),
            ),
            None => (TxType::Exec, None, Value::Object(Default::default())),
        };
        let meta = command.meta.clone().unwrap_or_default();
        let max_gas_cost = match (meta.gas_price, meta.gas_limit) {
            (Some(price), Some(limit)) => Some(price * limit as f64),
            _ => None,
        };

        TransactionSummary {
            hash: hash.map(str::to_string),
            tx_type,
            code,
            data,
            network_id: command.network_id.clone(),
            chain_id: meta.chain_id,
            gas_payer: meta.sender,
            gas_limit: meta.gas_limit,
            gas_price: meta.gas_price,
            max_gas_cost,
            creation_time: meta.creation_time,
            ttl: meta.ttl,
            nonce: command.nonce.clone(),
            signer_count: command.signers().len(),
        }
    }
}

fn or_dash<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for TransactionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hash: {}", or_dash(&self.hash))?;
        writeln!(f, "Tx Type: {}", self.tx_type)?;
        if let Some(code) = &self.code {
            writeln!(f, "Code: {code}")?;
        }
        writeln!(f, "Data: {}", self.data)?;
        writeln!(f, "Network: {}", or_dash(&self.network_id))?;
        writeln!(f, "Chain: {}", or_dash(&self.chain_id))?;
        writeln!(f, "Gas Payer: {}", or_dash(&self.gas_payer))?;
        writeln!(f, "Gas Limit: {}", or_dash(&self.gas_limit))?;
        writeln!(f, "Gas Price: {}", or_dash(&self.gas_price))?;
        writeln!(f, "Max Gas Cost: {}", or_dash(&self.max_gas_cost))?;
        writeln!(f, "Creation Time: {}", or_dash(&self.creation_time))?;
        writeln!(f, "TTL: {}", or_dash(&self.ttl))?;
        writeln!(f, "Nonce: {}", or_dash(&self.nonce))?;
        write!(f, "Signers: {}", self.signer_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_of_exec_command() {
        let command: PartialCommand = serde_json::from_value(json!({
            "payload": {"exec": {"code": "(+ 1 2)", "data": {"x": 1}}},
            "meta": {"chainId": "3", "sender": "gas-payer", "gasLimit": 1000, "gasPrice": 0.5},
            "signers": [{"pubKey": "k"}],
            "networkId": "mainnet01"
        }))
        .unwrap();

        let summary = TransactionSummary::new(&command, Some("abc"));
        assert_eq!(summary.tx_type, TxType::Exec);
        assert_eq!(summary.code.as_deref(), Some("(+ 1 2)"));
        assert_eq!(summary.data, json!({"x": 1}));
        assert_eq!(summary.max_gas_cost, Some(500.0));
        assert_eq!(summary.gas_payer.as_deref(), Some("gas-payer"));
        assert_eq!(summary.signer_count, 1);
        assert!(summary.to_string().contains("Network: mainnet01"));
    }

    #[test]
    fn test_summary_of_continuation_without_meta() {
        let command: PartialCommand = serde_json::from_value(json!({
            "payload": {"cont": {"pactId": "p", "step": 1, "rollback": false}}
        }))
        .unwrap();

        let summary = TransactionSummary::new(&command, None);
        assert_eq!(summary.tx_type, TxType::Cont);
        assert!(summary.code.is_none());
        assert!(summary.max_gas_cost.is_none());
        assert!(summary.to_string().contains("Max Gas Cost: -"));
    }
}
