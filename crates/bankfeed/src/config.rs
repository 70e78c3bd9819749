//! Provider credential loading
//!
//! Supports loading API credentials from (in order of priority):
//! 1. Compile-time embedded credentials (for production builds)
//! 2. JSON file (~/.config/bankfeed/provider-credentials.json)
//! 3. Runtime environment variables (fallback)

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// Credentials filename in the bankfeed config directory
const CREDENTIALS_FILE: &str = "provider-credentials.json";

/// Provider environment selecting the API host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Sandbox,
    Development,
    Production,
}

impl Environment {
    /// Base URL of the provider API for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => "https://sandbox.plaid.com",
            Environment::Development => "https://development.plaid.com",
            Environment::Production => "https://production.plaid.com",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sandbox" => Ok(Environment::Sandbox),
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            other => bail!("Unknown provider environment: {}", other),
        }
    }
}

/// API credentials for the transactions provider
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub secret: String,
    pub environment: Environment,
}

/// Credential file format
#[derive(Deserialize)]
struct CredentialFile {
    client_id: String,
    secret: String,
    environment: Option<String>,
}

impl ProviderCredentials {
    /// Load credentials using the following priority:
    /// 1. Compile-time embedded credentials (for production builds)
    /// 2. JSON file (~/.config/bankfeed/provider-credentials.json)
    /// 3. Runtime environment variables
    pub fn load() -> Result<Self> {
        // Try compile-time embedded credentials first (production builds)
        if let Some(creds) = Self::from_compile_time() {
            return Ok(creds);
        }

        // Try default config file
        if config::config_exists(CREDENTIALS_FILE) {
            let file: CredentialFile = config::load_json(CREDENTIALS_FILE)?;
            return Self::from_credential_file(file);
        }

        // Fall back to runtime environment variables
        Self::from_env()
    }

    /// Load credentials embedded at compile time via environment variables.
    /// Build with: PLAID_CLIENT_ID=xxx PLAID_SECRET=yyy cargo build --release
    pub fn from_compile_time() -> Option<Self> {
        let client_id = option_env!("PLAID_CLIENT_ID")?;
        let secret = option_env!("PLAID_SECRET")?;

        // Only return if both are non-empty
        if client_id.is_empty() || secret.is_empty() {
            return None;
        }

        let environment = option_env!("PLAID_ENV")
            .and_then(|e| e.parse().ok())
            .unwrap_or_default();

        Some(Self {
            client_id: client_id.to_string(),
            secret: secret.to_string(),
            environment,
        })
    }

    /// Load credentials from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file: CredentialFile = config::load_json_file(path)?;
        Self::from_credential_file(file)
    }

    /// Parse credentials from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CredentialFile =
            serde_json::from_str(json).context("Failed to parse credentials JSON")?;
        Self::from_credential_file(file)
    }

    /// Parse credentials from a CredentialFile
    fn from_credential_file(file: CredentialFile) -> Result<Self> {
        let environment = match file.environment {
            Some(e) => e
                .parse()
                .context("Credentials file has an invalid 'environment'")?,
            None => Environment::default(),
        };

        Ok(Self {
            client_id: file.client_id,
            secret: file.secret,
            environment,
        })
    }

    /// Load credentials from environment variables
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var("PLAID_CLIENT_ID")
            .context("PLAID_CLIENT_ID environment variable not set")?;
        let secret = std::env::var("PLAID_SECRET")
            .context("PLAID_SECRET environment variable not set")?;
        let environment = match std::env::var("PLAID_ENV") {
            Ok(e) => e.parse()?,
            Err(_) => Environment::default(),
        };

        Ok(Self {
            client_id,
            secret,
            environment,
        })
    }

    /// Check if credentials are available (compile-time, file, or env vars)
    pub fn is_available() -> bool {
        if Self::from_compile_time().is_some() {
            return true;
        }
        if config::config_exists(CREDENTIALS_FILE) {
            return true;
        }
        std::env::var("PLAID_CLIENT_ID").is_ok() && std::env::var("PLAID_SECRET").is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_credentials_json() {
        let json = r#"{
            "client_id": "test-client-id",
            "secret": "test-secret",
            "environment": "development"
        }"#;

        let creds = ProviderCredentials::from_json(json).unwrap();
        assert_eq!(creds.client_id, "test-client-id");
        assert_eq!(creds.secret, "test-secret");
        assert_eq!(creds.environment, Environment::Development);
    }

    #[test]
    fn test_environment_defaults_to_sandbox() {
        let json = r#"{ "client_id": "id", "secret": "s" }"#;
        let creds = ProviderCredentials::from_json(json).unwrap();
        assert_eq!(creds.environment, Environment::Sandbox);
    }

    #[test]
    fn test_invalid_environment_rejected() {
        let json = r#"{ "client_id": "id", "secret": "s", "environment": "staging" }"#;
        assert!(ProviderCredentials::from_json(json).is_err());
    }

    #[test]
    fn test_invalid_json() {
        let json = r#"{ "other": {} }"#;
        assert!(ProviderCredentials::from_json(json).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "client_id": "file-id", "secret": "file-secret", "environment": "sandbox" }}"#
        )
        .unwrap();

        let creds = ProviderCredentials::from_file(file.path()).unwrap();
        assert_eq!(creds.client_id, "file-id");
        assert_eq!(creds.environment, Environment::Sandbox);
    }

    #[test]
    fn test_environment_urls() {
        assert_eq!(Environment::Sandbox.base_url(), "https://sandbox.plaid.com");
        assert_eq!(
            Environment::Production.base_url(),
            "https://production.plaid.com"
        );
        assert_eq!(Environment::Sandbox.as_str(), "sandbox");
    }

    #[test]
    fn test_environment_round_trip() {
        for env in [
            Environment::Sandbox,
            Environment::Development,
            Environment::Production,
        ] {
            assert_eq!(env.as_str().parse::<Environment>().unwrap(), env);
        }
    }
}
