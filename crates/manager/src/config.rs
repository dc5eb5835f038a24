//! Manager configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// Settings read once at startup, optionally from a TOML table.
///
/// ```toml
/// enabled = true
/// extractors = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterceptConfig {
	/// Global interception switch. While disabled, reactivated surfaces keep
	/// whatever mode they were in.
	pub enabled: bool,
	/// Consult the extractor registry for container types the manager does
	/// not traverse natively.
	pub extractors: bool,
}

impl Default for InterceptConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			extractors: true,
		}
	}
}

impl InterceptConfig {
	pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}
}
