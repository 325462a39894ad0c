use std::io::Read;
use std::{env, fs, io};

use kda_sigbuilder::prelude::Result;
use kda_sigbuilder::{
    signer_key_from_env, BuilderConfig, Error, LocalKeySigner, SchemaTag, SignatureBuilder,
};
use log::{error, info};

// Reads a payload from the file named on the command line, or stdin
fn read_input() -> Result<String> {
    match env::args().nth(1) {
        Some(path) => fs::read_to_string(&path).map_err(|e| Error::Config(format!("{path}: {e}"))),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| Error::Config(format!("stdin: {e}")))?;
            Ok(input)
        }
    }
}

async fn run() -> Result<()> {
    let config = BuilderConfig::from_env()?;
    let signer = signer_key_from_env()?.map(LocalKeySigner::new);
    info!("Using network {}", config.network.id());

    let input = read_input()?;
    let mut builder = SignatureBuilder::new();
    let schema = builder.process_input(&input)?;
    println!("Schema: {schema}");

    match schema {
        SchemaTag::Invalid => {
            println!("Paste SigData, CommandSigData, or a Pact command payload");
            return Ok(());
        }
        SchemaTag::SigningRequest => {
            let caps = builder.caps_without_signers().to_vec();
            if !caps.is_empty() {
                println!("Capabilities without signers:");
                println!("{}", serde_json::to_string_pretty(&caps)?);
            }
            // With a local key every capability goes to that key
            match &signer {
                Some(signer) => {
                    let indices: Vec<usize> = (0..caps.len()).collect();
                    builder.assign_signer(signer.pub_key(), &indices)?;
                }
                None if !caps.is_empty() => {
                    println!("Set KADENA_SECRET_KEY to assign these capabilities");
                    return Ok(());
                }
                None => {}
            }
            builder.build(&config)?;
        }
        SchemaTag::QuickSignRequest | SchemaTag::PactCommand => {}
    }

    if let Some(summary) = builder.summary() {
        println!("{summary}");
    }
    if let Some(tx) = builder.unsigned_tx() {
        println!("Transaction:\n{}", serde_json::to_string_pretty(tx)?);
    }

    let Some(signer) = signer else {
        info!("KADENA_SECRET_KEY not set, not signing");
        return Ok(());
    };
    let signed = builder.sign(&signer).await?;
    println!("Signed Transaction:\n{}", serde_json::to_string_pretty(signed)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(e) = run().await {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
