//! Configuration module for the crowdfund service.
//!
//! Configuration is read from a TOML file. Before parsing, `${VAR}` and
//! `${VAR:-default}` references are substituted from the environment, so
//! secrets such as the wallet key never need to live in the file itself.
//! Every section has defaults; an empty file yields a working read-only
//! configuration pointed at the public trails API.

use crowdfund_types::TrailRef;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Application token sent to the trails API when none is configured.
pub const DEFAULT_TRAIL_APP_ID: &str = "0198e901-43fa-7800-97c5-a331b77852dd";
/// Public trails API endpoint.
pub const DEFAULT_TRAILS_BASE_URL: &str = "https://trails-api.herd.eco/v1";
/// Environment variable overriding the trails application token.
pub const TRAIL_APP_ID_ENV: &str = "HERD_TRAIL_APP_ID";
/// Environment variable carrying the identity provider application id.
pub const IDENTITY_APP_ID_ENV: &str = "PRIVY_APP_ID";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Configuration error: {0}")]
	Parse(String),
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// The default Display includes the whole input; keep just the message.
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
	#[serde(default)]
	pub app: AppConfig,
	#[serde(default)]
	pub trails: TrailsConfig,
	#[serde(default)]
	pub identity: IdentityConfig,
	/// Wallet implementations. Required when the identity layer is enabled.
	pub wallet: Option<WalletConfig>,
	#[serde(default)]
	pub explorer: ExplorerConfig,
	pub api: Option<ApiConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
	/// Name reported in logs.
	#[serde(default = "default_app_name")]
	pub name: String,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			name: default_app_name(),
		}
	}
}

fn default_app_name() -> String {
	"crowdfund".to_string()
}

/// Settings for the trails workflow API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrailsConfig {
	#[serde(default = "default_base_url")]
	pub base_url: String,
	/// Value of the application id header sent with every request.
	#[serde(default = "default_trail_app_id")]
	pub app_id: String,
	/// Per-request timeout in seconds.
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
	/// Minimum spacing between outbound evaluation calls.
	#[serde(default = "default_min_interval_ms")]
	pub min_interval_ms: u64,
	/// Trail used to create campaigns.
	#[serde(default = "default_creation_trail")]
	pub creation: TrailRef,
	/// Trail used to donate (step 1) and refund (step 2).
	#[serde(default = "default_donation_refund_trail")]
	pub donation_refund: TrailRef,
}

impl Default for TrailsConfig {
	fn default() -> Self {
		Self {
			base_url: default_base_url(),
			app_id: default_trail_app_id(),
			timeout_seconds: default_timeout_seconds(),
			min_interval_ms: default_min_interval_ms(),
			creation: default_creation_trail(),
			donation_refund: default_donation_refund_trail(),
		}
	}
}

fn default_base_url() -> String {
	DEFAULT_TRAILS_BASE_URL.to_string()
}

fn default_trail_app_id() -> String {
	std::env::var(TRAIL_APP_ID_ENV)
		.ok()
		.filter(|v| !v.is_empty())
		.unwrap_or_else(|| DEFAULT_TRAIL_APP_ID.to_string())
}

fn default_timeout_seconds() -> u64 {
	30
}

fn default_min_interval_ms() -> u64 {
	5000
}

fn default_creation_trail() -> TrailRef {
	TrailRef::new(
		"0198e8eb-9669-7497-adb0-ebd5ca9ebffb",
		"0198e8eb-9675-7703-908f-0afa1c81eee2",
	)
}

fn default_donation_refund_trail() -> TrailRef {
	TrailRef::new(
		"0198e8eb-654b-71f4-aa0e-dc6990d57363",
		"0198e8eb-6556-7671-aecb-3165333a1e34",
	)
}

/// Identity provider settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
	/// Identity provider application id. Empty or absent disables the
	/// wallet layer.
	#[serde(default = "default_identity_app_id")]
	pub app_id: Option<String>,
}

impl Default for IdentityConfig {
	fn default() -> Self {
		Self {
			app_id: default_identity_app_id(),
		}
	}
}

impl IdentityConfig {
	pub fn is_enabled(&self) -> bool {
		self.app_id.as_deref().is_some_and(|id| !id.trim().is_empty())
	}
}

fn default_identity_app_id() -> Option<String> {
	std::env::var(IDENTITY_APP_ID_ENV)
		.ok()
		.filter(|v| !v.is_empty())
}

/// Wallet implementations keyed by name.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalletConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Raw per-implementation tables, validated by each implementation's schema.
	pub implementations: HashMap<String, toml::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExplorerConfig {
	#[serde(default = "default_explorer_url")]
	pub base_url: String,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			base_url: default_explorer_url(),
		}
	}
}

impl ExplorerConfig {
	/// Link to a transaction on the block explorer.
	pub fn transaction_url(&self, hash: &str) -> String {
		format!("{}/tx/{}", self.base_url.trim_end_matches('/'), hash)
	}
}

fn default_explorer_url() -> String {
	"https://basescan.org".to_string()
}

/// HTTP API server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	#[serde(default)]
	pub enabled: bool,
	#[serde(default = "default_api_host")]
	pub host: String,
	#[serde(default = "default_api_port")]
	pub port: u16,
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	3000
}

/// Substitutes `${VAR}` and `${VAR:-default}` with environment values.
///
/// Input is capped at 1MB to bound regex work.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut output = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match (std::env::var(name.as_str()), cap.get(2)) {
			(Ok(v), _) => v,
			(Err(_), Some(default)) => default.as_str().to_string(),
			(Err(_), None) => {
				return Err(ConfigError::Validation(format!(
					"Environment variable '{}' not found",
					name.as_str()
				)));
			},
		};
		output.push_str(&input[last_end..whole.start()]);
		output.push_str(&value);
		last_end = whole.end();
	}
	output.push_str(&input[last_end..]);

	Ok(output)
}

impl Config {
	/// Loads configuration from a file.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path.as_ref()).await?;
		content.parse()
	}

	/// Whether wallet-backed operations are available.
	pub fn wallet_enabled(&self) -> bool {
		self.identity.is_enabled()
	}

	fn validate(&self) -> Result<(), ConfigError> {
		let trails = &self.trails;
		if !trails.base_url.starts_with("http://") && !trails.base_url.starts_with("https://") {
			return Err(ConfigError::Validation(format!(
				"trails.base_url must be an http(s) URL, got '{}'",
				trails.base_url
			)));
		}
		if trails.app_id.trim().is_empty() {
			return Err(ConfigError::Validation(
				"trails.app_id cannot be empty".into(),
			));
		}
		if trails.timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"trails.timeout_seconds must be greater than 0".into(),
			));
		}
		if trails.min_interval_ms > 60_000 {
			return Err(ConfigError::Validation(
				"trails.min_interval_ms cannot exceed 60000".into(),
			));
		}
		for (name, trail) in [
			("creation", &trails.creation),
			("donation_refund", &trails.donation_refund),
		] {
			if trail.trail_id.is_empty() || trail.version_id.is_empty() {
				return Err(ConfigError::Validation(format!(
					"trails.{} requires both trail_id and version_id",
					name
				)));
			}
		}

		if self.identity.is_enabled() {
			let wallet = self.wallet.as_ref().ok_or_else(|| {
				ConfigError::Validation(
					"A [wallet] section is required when the identity provider is enabled".into(),
				)
			})?;
			if wallet.primary.is_empty() {
				return Err(ConfigError::Validation(
					"Wallet primary implementation cannot be empty".into(),
				));
			}
			if !wallet.implementations.contains_key(&wallet.primary) {
				return Err(ConfigError::Validation(format!(
					"Primary wallet '{}' not found in implementations",
					wallet.primary
				)));
			}
		}

		if let Some(api) = self.api.as_ref().filter(|api| api.enabled) {
			if api.port == 0 {
				return Err(ConfigError::Validation("api.port cannot be 0".into()));
			}
		}

		Ok(())
	}
}

/// Parses a TOML string after environment substitution, then validates it.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("CF_TEST_HOST", "localhost");
		std::env::set_var("CF_TEST_PORT", "5432");

		let input = "host = \"${CF_TEST_HOST}:${CF_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"localhost:5432\"");

		std::env::remove_var("CF_TEST_HOST");
		std::env::remove_var("CF_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${CF_MISSING_VAR:-fallback}\"";
		assert_eq!(resolve_env_vars(input).unwrap(), "value = \"fallback\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let result = resolve_env_vars("value = \"${CF_MISSING_VAR}\"");
		assert!(result.unwrap_err().to_string().contains("CF_MISSING_VAR"));
	}

	#[test]
	fn test_empty_config_uses_defaults() {
		let config: Config = "".parse().unwrap();
		assert_eq!(config.trails.base_url, DEFAULT_TRAILS_BASE_URL);
		assert_eq!(config.trails.min_interval_ms, 5000);
		assert_eq!(
			config.trails.donation_refund.trail_id,
			"0198e8eb-654b-71f4-aa0e-dc6990d57363"
		);
		assert_eq!(
			config.explorer.transaction_url("0xabc"),
			"https://basescan.org/tx/0xabc"
		);
		assert!(config.api.is_none());
	}

	#[test]
	fn test_identity_requires_wallet() {
		let config_str = r#"
[identity]
app_id = "privy-app"
"#;
		let err = Config::from_str(config_str).unwrap_err();
		assert!(err.to_string().contains("[wallet] section is required"));

		let config_str = r#"
[identity]
app_id = "privy-app"

[wallet]
primary = "local"
[wallet.implementations.remote]
"#;
		let err = Config::from_str(config_str).unwrap_err();
		assert!(err
			.to_string()
			.contains("Primary wallet 'local' not found in implementations"));
	}

	#[test]
	fn test_blank_identity_disables_wallet() {
		let config: Config = "[identity]\napp_id = \"\"\n".parse().unwrap();
		assert!(!config.wallet_enabled());
		assert!(config.wallet.is_none());
	}

	#[test]
	fn test_full_config() {
		std::env::set_var("CF_TEST_WALLET_KEY", "0x01");

		let config_str = r#"
[app]
name = "crowdfund-dev"

[trails]
base_url = "http://127.0.0.1:9000/v1"
app_id = "test-app"
min_interval_ms = 10

[identity]
app_id = "privy-app"

[wallet]
primary = "local"
[wallet.implementations.local]
private_key = "${CF_TEST_WALLET_KEY}"
rpc_url = "http://localhost:8545"

[api]
enabled = true
port = 4000
"#;
		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.app.name, "crowdfund-dev");
		assert_eq!(config.trails.app_id, "test-app");
		assert!(config.wallet_enabled());
		let wallet = config.wallet.unwrap();
		assert_eq!(
			wallet.implementations["local"]
				.get("private_key")
				.and_then(|v| v.as_str()),
			Some("0x01")
		);
		assert_eq!(config.api.unwrap().port, 4000);

		std::env::remove_var("CF_TEST_WALLET_KEY");
	}

	#[test]
	fn test_shipped_config_parses() {
		let config: Config = include_str!("../../../config/crowdfund.toml").parse().unwrap();
		assert_eq!(config.trails.creation.version_id, "0198e8eb-9675-7703-908f-0afa1c81eee2");
		assert_eq!(config.wallet.map(|w| w.primary).as_deref(), Some("local"));
		assert!(config.api.is_some_and(|api| api.enabled && api.port == 3000));
	}

	#[test]
	fn test_invalid_base_url_rejected() {
		let err = Config::from_str("[trails]\nbase_url = \"ftp://nowhere\"\n").unwrap_err();
		assert!(err.to_string().contains("http(s) URL"));
	}

	#[tokio::test]
	async fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[explorer]\nbase_url = \"https://sepolia.basescan.org/\"").unwrap();

		let config = Config::from_file(file.path()).await.unwrap();
		assert_eq!(
			config.explorer.transaction_url("0x1"),
			"https://sepolia.basescan.org/tx/0x1"
		);
	}
}
