use std::collections::HashMap;

use super::CoachError;

pub(crate) const SERVICE_NAME: &str = "habitflow";
const KEYRING_SERVER: &str = "anthropic-api";

/// Environment variable consulted before the keyring.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

fn attributes() -> HashMap<&'static str, &'static str> {
    let mut attrs = HashMap::new();
    attrs.insert("service", SERVICE_NAME);
    attrs.insert("server", KEYRING_SERVER);
    attrs
}

async fn connect() -> Result<oo7::Keyring, CoachError> {
    oo7::Keyring::new()
        .await
        .map_err(|e| CoachError::Keyring(format!("Failed to connect to keyring: {}", e)))
}

/// Store the Anthropic API key in the system keyring.
pub async fn store_api_key(key: &str) -> Result<(), CoachError> {
    let keyring = connect().await?;
    keyring
        .create_item("HabitFlow Anthropic API Key", &attributes(), key.as_bytes(), true)
        .await
        .map_err(|e| CoachError::Keyring(format!("Failed to store API key: {}", e)))?;
    log::info!("Stored API key in keyring");
    Ok(())
}

/// Load the Anthropic API key from the system keyring.
pub async fn load_api_key() -> Result<Option<String>, CoachError> {
    let keyring = connect().await?;
    let items = keyring
        .search_items(&attributes())
        .await
        .map_err(|e| CoachError::Keyring(format!("Failed to search keyring: {}", e)))?;

    if let Some(item) = items.first() {
        let secret_bytes = item
            .secret()
            .await
            .map_err(|e| CoachError::Keyring(format!("Failed to read secret: {}", e)))?;
        let key = String::from_utf8(secret_bytes.to_vec())
            .map_err(|e| CoachError::Keyring(format!("Invalid UTF-8 in secret: {}", e)))?;
        if !key.is_empty() {
            return Ok(Some(key));
        }
    }

    Ok(None)
}

/// API key from the environment, else from the keyring.
pub async fn resolve_api_key() -> Result<String, CoachError> {
    if let Some(key) = env_api_key() {
        return Ok(key);
    }
    match load_api_key().await {
        Ok(Some(key)) => Ok(key),
        Ok(None) => Err(CoachError::MissingApiKey),
        Err(e) => {
            log::warn!("{}", e);
            Err(CoachError::MissingApiKey)
        }
    }
}

fn env_api_key() -> Option<String> {
    usable_key(std::env::var(API_KEY_ENV).ok())
}

fn usable_key(raw: Option<String>) -> Option<String> {
    raw.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}
