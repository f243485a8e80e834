// Command-line application
// Parses flags, resolves config, and drives the codec and key store

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::rsa::{decrypt_payload, encrypt_string, RsaKeyPair, RsaPublicKey};
use crate::util::{FileKeyStore, KeyStore, StoredKeys};
use crate::wire::{CiphertextPayload, WireRecord};

/// Toy per-byte RSA messaging: derive keys, encrypt, decrypt.
#[derive(Debug, Parser)]
#[command(name = "rsa-chat", version, about)]
pub struct Cli {
    /// Load settings from a JSON config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where the local key records are kept.
    #[arg(long, global = true)]
    pub key_store: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `rsa_chat=trace`. RUST_LOG takes precedence.
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Derive a key pair from p, q and e and print the public key.
    Keygen {
        /// First prime factor (decimal).
        #[arg(long)]
        p: Option<String>,
        /// Second prime factor (decimal).
        #[arg(long)]
        q: Option<String>,
        /// Public exponent (decimal).
        #[arg(long)]
        e: Option<String>,
        /// Store the derived keys in the key store.
        #[arg(long)]
        save: bool,
    },
    /// Encrypt a message and print the ciphertext payload.
    Encrypt {
        /// Recipient public key: a JSON file, inline JSON, or `self`.
        #[arg(long)]
        to: String,
        /// Message text. Read from stdin when omitted.
        message: Option<String>,
    },
    /// Decrypt a ciphertext payload with the stored private key.
    Decrypt {
        /// Payload JSON file. Read from stdin when omitted.
        payload: Option<PathBuf>,
    },
    /// Print the stored public key.
    ShowKey,
    /// Delete the stored keys.
    Forget,
}

pub fn run_app() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .with_overrides(cli.key_store.clone(), cli.log.clone());

    init_tracing(&config.log_filter);

    let mut store = FileKeyStore::new(&config.key_store_path);
    let output = execute(cli.command, &config, &mut store, &mut io::stdin())?;
    println!("{}", output);
    Ok(())
}

fn init_tracing(default_filter: &str) {
    // Logs go to stderr so stdout stays machine-readable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Run one command and return what it prints on stdout.
pub fn execute(
    command: Command,
    config: &Config,
    store: &mut dyn KeyStore,
    stdin: &mut dyn Read,
) -> Result<String> {
    match command {
        Command::Keygen { p, q, e, save } => {
            let p = p.unwrap_or_else(|| config.defaults.p.clone());
            let q = q.unwrap_or_else(|| config.defaults.q.clone());
            let e = e.unwrap_or_else(|| config.defaults.e.clone());

            let keypair = RsaKeyPair::from_decimal(&p, &q, &e)
                .context("failed to generate keys, check p, q and e")?;

            if save {
                store.save(&StoredKeys {
                    public_key: keypair.public_key(),
                    private_key: keypair.private_key(),
                })?;
            }
            info!(n_bitlen = keypair.bit_length(), saved = save, "key pair ready");

            Ok(keypair.public_key().to_json_pretty()?)
        }
        Command::Encrypt { to, message } => {
            let public_key = resolve_recipient(&to, store)?;
            let message = match message {
                Some(message) => message,
                None => read_all(stdin)?,
            };

            let payload = encrypt_string(&message, &public_key)?;
            info!(units = payload.ciphertext.len(), "message encrypted");
            Ok(payload.to_json()?)
        }
        Command::Decrypt { payload } => {
            let json = match payload {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read payload {}", path.display()))?,
                None => read_all(stdin)?,
            };
            let payload = CiphertextPayload::from_json(&json)?;
            let keys = require_keys(store)?;

            let plaintext = decrypt_payload(&payload, &keys.private_key).context("decryption failed")?;
            Ok(plaintext)
        }
        Command::ShowKey => Ok(require_keys(store)?.public_key.to_json_pretty()?),
        Command::Forget => {
            store.clear()?;
            Ok("Logged out and local keys cleared.".to_string())
        }
    }
}

fn resolve_recipient(to: &str, store: &dyn KeyStore) -> Result<RsaPublicKey> {
    if to == "self" {
        return Ok(require_keys(store)?.public_key);
    }

    let json = if to.trim_start().starts_with('{') {
        to.to_string()
    } else {
        std::fs::read_to_string(to).with_context(|| format!("failed to read public key {}", to))?
    };
    Ok(RsaPublicKey::from_json(&json)?)
}

fn require_keys(store: &dyn KeyStore) -> Result<StoredKeys> {
    store
        .load()?
        .ok_or_else(|| anyhow!("no stored keys, run `rsa-chat keygen --save` first"))
}

fn read_all(stdin: &mut dyn Read) -> Result<String> {
    let mut buf = String::new();
    stdin.read_to_string(&mut buf).context("failed to read stdin")?;
    if buf.is_empty() {
        bail!("nothing to read on stdin");
    }
    Ok(buf)
}
