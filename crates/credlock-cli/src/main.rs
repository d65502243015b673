//! credlock CLI - thin driver over credlock-core
//!
//! `encrypt` generates (or reuses) a secret key, writes its encoded form
//! to the key file, and encrypts the credential fields in-place.
//! `decrypt` loads the key and prints one decrypted field. `derive-key`
//! builds the key from a passphrase instead of the OS random source.

use std::sync::Arc;

use anyhow::{bail, Context};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use credlock_core::{
    CredentialVault, KeyStore, KeyValueStore, PropertiesFile, DEFAULT_FIELDS,
};

/// Entry name the derivation salt is stored under in the key file
const SALT_ENTRY: &str = "SALT";

/// credlock - encrypt credential properties files in-place
#[derive(Parser, Debug)]
#[command(name = "credlock")]
#[command(version = "0.1.0")]
#[command(about = "Symmetric credential encryption for properties files")]
struct Args {
    /// Path to the credentials properties file
    #[arg(long, env = "CREDLOCK_CREDENTIALS", default_value = "uat.properties")]
    credentials: String,

    /// Path to the secret key properties file
    #[arg(long, env = "CREDLOCK_KEY_FILE", default_value = "secret_key.properties")]
    key_file: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a key, persist it, and encrypt credential fields in-place
    Encrypt {
        /// Field names to encrypt (defaults to URL, USERNAME, PASSWORD)
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// Decrypt one field and print it
    Decrypt {
        /// Field name to decrypt
        #[arg(long)]
        field: String,
    },
    /// Derive the secret key from a passphrase and persist it
    DeriveKey,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let key_store = PropertiesFile::new(&args.key_file);
    key_store.load().await?;
    let key_store: Arc<dyn KeyValueStore> = Arc::new(key_store);
    let keys = KeyStore::new(key_store.clone());

    match args.command {
        Command::Encrypt { fields } => {
            let creds = load_credentials(&args.credentials).await?;

            // Reuse a persisted key so re-runs on new fields stay
            // decryptable; double-encrypting an already swept field is
            // still on the operator.
            let key = if keys.has_key().await? {
                warn!("Reusing existing key from {}", args.key_file);
                keys.load_key().await?
            } else {
                let key = credlock_core::generate_key()?;
                keys.save_key(&key).await?;
                info!("New key written to {}", args.key_file);
                key
            };

            let names: Vec<&str> = if fields.is_empty() {
                DEFAULT_FIELDS.to_vec()
            } else {
                fields.iter().map(String::as_str).collect()
            };

            let vault = CredentialVault::new(creds, key);
            let encrypted = vault.encrypt_fields(&names).await?;
            info!(
                "Encrypted {} field(s) in {}: {}",
                encrypted.len(),
                args.credentials,
                encrypted.join(", ")
            );
        }

        Command::Decrypt { field } => {
            let creds = load_credentials(&args.credentials).await?;
            let key = keys.load_key().await.context("no usable secret key")?;

            let vault = CredentialVault::new(creds, key);
            let value = vault.decrypt_field(&field).await?;
            println!("{}", value.expose());
        }

        Command::DeriveKey => {
            let password = rpassword::prompt_password("Passphrase: ")?;
            if password.is_empty() {
                bail!("passphrase must not be empty");
            }

            // Keep the salt beside the key so the same passphrase
            // derives the same key on every machine
            let salt = match key_store.get(SALT_ENTRY).await? {
                Some(encoded) => BASE64
                    .decode(&encoded)
                    .context("stored SALT entry is not valid base64")?,
                None => {
                    let salt = credlock_core::generate_salt()?;
                    key_store.put(SALT_ENTRY, &BASE64.encode(salt)).await?;
                    salt.to_vec()
                }
            };

            let key = credlock_core::derive_key(&password, &salt)?;
            keys.save_key(&key).await?;
            info!("Derived key written to {}", args.key_file);
        }
    }

    Ok(())
}

async fn load_credentials(path: &str) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    if !std::path::Path::new(path).exists() {
        bail!("credentials file not found: {}", path);
    }
    let creds = PropertiesFile::new(path);
    creds.load().await?;
    Ok(Arc::new(creds))
}
