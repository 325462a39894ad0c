use kda_sigbuilder::prelude::Result;
use kda_sigbuilder::{
    classify, BuilderConfig, LocalKeySigner, SignatureBuilder, TransactionSummary, UnsignedCommand,
};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Throwaway key, generated fresh on every run
    let signer = LocalKeySigner::generate();
    let config = BuilderConfig::default();
    println!("✅ Generated signer {}", signer.pub_key());

    // Example 1: A signing request, capabilities assigned to our key
    println!("\n📝 Example 1: Signing request");
    let signing_request = json!({
        "code": "(coin.transfer \"alice\" \"bob\" 1.0)",
        "caps": [
            {"role": "Gas", "description": "Pay for gas", "cap": {"name": "coin.GAS", "args": []}},
            {"role": "Transfer", "description": "Send 1.0 KDA to bob",
             "cap": {"name": "coin.TRANSFER", "args": ["alice", "bob", 1.0]}}
        ],
        "chainId": "0",
        "sender": "alice"
    })
    .to_string();
    println!("  Schema: {}", classify(&signing_request));

    let mut builder = SignatureBuilder::new();
    builder.process_input(&signing_request)?;
    builder.assign_signer(signer.pub_key(), &[0, 1])?;
    builder.build(&config)?;
    print_summary(builder.summary());
    builder.sign(&signer).await?;
    print_signed(builder.signed_tx());

    // Example 2: A raw Pact command
    println!("\n📦 Example 2: Pact command");
    let pact_command = json!({
        "payload": {"exec": {"code": "(+ 1 2)", "data": {}}},
        "meta": {"chainId": "1", "sender": "alice", "gasLimit": 500, "gasPrice": 0.00000001,
                 "ttl": 600, "creationTime": 1_700_000_000u64},
        "signers": [{"pubKey": signer.pub_key()}],
        "networkId": config.network.id(),
        "nonce": "example-2"
    })
    .to_string();
    builder.process_input(&pact_command)?;
    print_summary(builder.summary());
    builder.sign(&signer).await?;
    print_signed(builder.signed_tx());

    // Example 3: The same transaction handed back as a quick-sign request
    println!("\n⚡ Example 3: Quick-sign request");
    let Some(tx) = builder.unsigned_tx().cloned() else {
        return Ok(());
    };
    let quick_sign = serde_json::to_string(&tx)?;
    println!("  Schema: {}", classify(&quick_sign));
    builder.process_input(&quick_sign)?;
    builder.sign(&signer).await?;
    print_signed(builder.signed_tx());

    println!("\n📋 Next steps:");
    println!("1. Check that every slot in sigs is filled");
    println!("2. Submit cmd, hash and sigs to a Chainweb node's /send endpoint");

    Ok(())
}

fn print_summary(summary: Option<TransactionSummary>) {
    match summary {
        Some(summary) => {
            for line in summary.to_string().lines() {
                println!("  {line}");
            }
        }
        None => println!("  (nothing to review)"),
    }
}

fn print_signed(tx: Option<&UnsignedCommand>) {
    let Some(tx) = tx else {
        println!("  (not signed)");
        return;
    };
    println!("  Fully signed: {}", tx.is_fully_signed());
    println!(
        "  Signed transaction: {}",
        serde_json::to_string_pretty(tx).unwrap_or_else(|_| "Failed to serialize".to_string())
    );
}
