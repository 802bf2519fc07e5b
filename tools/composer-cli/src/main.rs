//! Composer CLI
//!
//! Composes, validates and assembles a multi-message transaction from a
//! chain description and a request file, then prints the canonical draft.

mod request;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared_types::ChainInfo;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use tx_composer::{
    fields, gas_of_tx, AssetCoinConverter, Bech32AddressValidator, ComposerApi, ComposerConfig,
    ComposerPorts, ComposerService, FieldErrors, InMemoryTxStore, LcdClient, MsgTypeId,
};

use request::{parse_types, ComposeRequest};

/// Composer CLI
#[derive(Parser, Debug)]
#[command(name = "composer-cli")]
#[command(about = "Compose multi-message transactions for Cosmos SDK chains")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a transaction and print its canonical draft.
    Build {
        /// Chain description (JSON).
        #[arg(long)]
        chain: PathBuf,
        /// Compose request (JSON).
        #[arg(long)]
        request: PathBuf,
    },
    /// Print the gas estimate for a list of message types.
    Gas {
        /// Comma-separated message types, e.g. `send,vote`.
        #[arg(long)]
        types: String,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn describe(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, error)| format!("{field}: {error}"))
        .collect::<Vec<_>>()
        .join("; ")
}

async fn build(config: ComposerConfig, chain: ChainInfo, request: ComposeRequest) -> Result<()> {
    let lcd = Arc::new(LcdClient::new(config.lcd_timeout())?);
    let store = Arc::new(InMemoryTxStore::new());
    let ports = ComposerPorts {
        addresses: Arc::new(Bech32AddressValidator),
        coins: Arc::new(AssetCoinConverter),
        endpoint: lcd.clone(),
        store: store.clone(),
        validator_loader: lcd,
    };
    let confidential = chain.confidential_encryption;
    let mut composer = ComposerService::new(config, chain, request.account, ports);

    for message in &request.messages {
        let msg_type = message.msg_type()?;
        let slot = composer.add_message_type(msg_type);

        for (field, value) in &message.fields {
            composer
                .edit_field(slot, field, value)
                .await
                .with_context(|| format!("{msg_type}: field {field}"))?;
        }
        if let Some(body) = message.body_text() {
            composer
                .edit_body(slot, &body, false)
                .await
                .with_context(|| format!("{msg_type}: body"))?;
        }
        if confidential
            && msg_type == MsgTypeId::ExecuteContract
            && !message.fields.contains_key(fields::CODE_HASH)
        {
            if let Err(e) = composer.fetch_code_hash(slot).await {
                warn!(%msg_type, error = %e, "Code hash lookup failed");
            }
        }
    }

    composer.set_memo(&request.memo);
    if let Some(gas_limit) = &request.gas_limit {
        composer.set_gas_limit(gas_limit);
    }

    let id = match composer.submit().await {
        Ok(id) => id,
        Err(e) => {
            for (index, slot) in composer.slots().iter().enumerate() {
                let errors = slot.unit().error_view();
                if !errors.is_empty() {
                    warn!(index, msg_type = %slot.msg_type(), errors = %describe(&errors), "Invalid message");
                }
            }
            bail!("build failed: {e}");
        }
    };

    let stored = store
        .get(&id)
        .context("stored transaction disappeared")?;
    info!(%id, msgs = stored.draft.msgs.len(), "Draft ready");
    println!("{}", stored.canonical_json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = ComposerConfig::from_env()?;

    match args.command {
        Command::Build { chain, request } => {
            let chain: ChainInfo = read_json(&chain)?;
            let request: ComposeRequest = read_json(&request)?;
            build(config, chain, request).await
        }
        Command::Gas { types } => {
            let types = parse_types(&types)?;
            println!("{}", gas_of_tx(&types, &config.gas));
            Ok(())
        }
    }
}
