//! Login settings: the authorization template and the page-cache hosts used during
//! canonicalization.
//!
//! Settings are plain serde data so hosts can ship them as JSON; [`LoginSettings::builder`]
//! validates them before use.

// self
use crate::{_prelude::*, error::ConfigError, link};

/// Authorization endpoint template with `${name}` placeholders.
pub const DEFAULT_AUTHORIZE_TEMPLATE: &str = "https://openapi.baidu.com/oauth/2.0/authorize?response_type=code&client_id=${client_id}&redirect_uri=${redirect_uri}&scope=${scope}&state=${state}";
/// Scope substituted into every authorization URL; callers cannot override it.
pub const AUTHORIZE_SCOPE: &str = "snsapi_userinfo";
/// Placeholders every authorization template must declare.
pub const REQUIRED_PLACEHOLDERS: [&str; 3] = ["client_id", "redirect_uri", "state"];

/// Validated settings consumed by [`UrlService`](crate::link::UrlService).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginSettings {
	/// Authorization URL template.
	pub authorize_template: String,
	/// Page-cache hosts whose `/c/` paths are unwrapped to the origin URL.
	pub cache_hosts: Vec<String>,
}
impl LoginSettings {
	/// Returns a builder seeded with the default template and no cache hosts.
	pub fn builder() -> LoginSettingsBuilder {
		LoginSettingsBuilder::default()
	}

	/// Parses settings from JSON and validates them.
	pub fn from_json(raw: &str) -> Result<Self> {
		let mut de = serde_json::Deserializer::from_str(raw);
		let settings: Self = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ConfigError::InvalidSettings { source })?;

		settings.validate()?;

		Ok(settings)
	}

	/// Checks the template and cache host invariants.
	pub fn validate(&self) -> Result<(), ConfigError> {
		for name in REQUIRED_PLACEHOLDERS {
			if !self.authorize_template.contains(&format!("${{{name}}}")) {
				return Err(ConfigError::MissingPlaceholder { name });
			}
		}

		let blank = link::render_template(&self.authorize_template, &HashMap::<String, String>::new());
		let endpoint =
			Url::parse(&blank).map_err(|source| ConfigError::InvalidTemplate { source })?;

		if endpoint.scheme() != "https" {
			return Err(ConfigError::InsecureEndpoint { url: endpoint.to_string() });
		}

		for host in &self.cache_hosts {
			if host.is_empty() || host.contains(['/', ':']) || host.chars().any(char::is_whitespace)
			{
				return Err(ConfigError::InvalidCacheHost { host: host.clone() });
			}
		}

		Ok(())
	}
}
impl Default for LoginSettings {
	fn default() -> Self {
		Self { authorize_template: DEFAULT_AUTHORIZE_TEMPLATE.into(), cache_hosts: Vec::new() }
	}
}

/// Builder for [`LoginSettings`] values.
#[derive(Debug, Default)]
pub struct LoginSettingsBuilder {
	settings: LoginSettings,
}
impl LoginSettingsBuilder {
	/// Overrides the authorization URL template.
	pub fn authorize_template(mut self, template: impl Into<String>) -> Self {
		self.settings.authorize_template = template.into();

		self
	}

	/// Adds a page-cache host.
	pub fn cache_host(mut self, host: impl Into<String>) -> Self {
		self.settings.cache_hosts.push(host.into().to_ascii_lowercase());

		self
	}

	/// Consumes the builder and validates the resulting settings.
	pub fn build(self) -> Result<LoginSettings, ConfigError> {
		self.settings.validate()?;

		Ok(self.settings)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_settings_are_valid() {
		let settings = LoginSettings::builder().build().expect("Default settings should validate.");

		assert_eq!(settings.authorize_template, DEFAULT_AUTHORIZE_TEMPLATE);
		assert!(settings.cache_hosts.is_empty());
	}

	#[test]
	fn cache_hosts_are_lowercased() {
		let settings = LoginSettings::builder()
			.cache_host("MipCache.Example.COM")
			.build()
			.expect("Cache host fixture should validate.");

		assert_eq!(settings.cache_hosts, vec!["mipcache.example.com".to_owned()]);
	}
}
