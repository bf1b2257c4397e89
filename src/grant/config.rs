//! Token endpoint configuration shared by the network-backed grants.

// std
use std::net::IpAddr;
// self
use crate::{_prelude::*, error::ConfigError, grant::scope::ScopeSet, token::TokenSecret};

/// How the client authenticates itself at the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}

/// Validated token endpoint settings consumed by the built-in grants.
#[derive(Clone, Debug)]
pub struct GrantConfig {
	/// Token endpoint URL.
	pub token_endpoint: Url,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret for confidential clients.
	pub client_secret: Option<TokenSecret>,
	/// Scopes requested with every exchange.
	pub scope: ScopeSet,
	/// Client authentication mode.
	pub client_auth_method: ClientAuthMethod,
	/// Character used to join scopes into the `scope` parameter.
	pub scope_delimiter: char,
	/// Additional form parameters (e.g. `audience`, `resource`).
	pub extra_params: BTreeMap<String, String>,
}
impl GrantConfig {
	/// Creates a builder for the provided client identifier.
	pub fn builder(client_id: impl Into<String>) -> GrantConfigBuilder {
		GrantConfigBuilder::new(client_id)
	}
}

/// Builder for [`GrantConfig`] values.
#[derive(Debug)]
pub struct GrantConfigBuilder {
	client_id: String,
	token_endpoint: Option<Url>,
	client_secret: Option<TokenSecret>,
	scope: ScopeSet,
	client_auth_method: ClientAuthMethod,
	scope_delimiter: char,
	extra_params: BTreeMap<String, String>,
}
impl GrantConfigBuilder {
	fn new(client_id: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			token_endpoint: None,
			client_secret: None,
			scope: ScopeSet::default(),
			client_auth_method: ClientAuthMethod::default(),
			scope_delimiter: ' ',
			extra_params: BTreeMap::new(),
		}
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Sets the requested scopes.
	pub fn scope(mut self, scope: ScopeSet) -> Self {
		self.scope = scope;

		self
	}

	/// Overrides the client authentication method.
	pub fn client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth_method = method;

		self
	}

	/// Overrides the scope delimiter (defaults to a space).
	pub fn scope_delimiter(mut self, delimiter: char) -> Self {
		self.scope_delimiter = delimiter;

		self
	}

	/// Adds a form parameter sent with every exchange.
	pub fn extra_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra_params.insert(key.into(), value.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<GrantConfig, ConfigError> {
		let token_endpoint = self.token_endpoint.ok_or(ConfigError::MissingTokenEndpoint)?;

		validate_endpoint(&token_endpoint)?;

		if self.scope_delimiter.is_control() {
			return Err(ConfigError::InvalidScopeDelimiter { delimiter: self.scope_delimiter });
		}

		Ok(GrantConfig {
			token_endpoint,
			client_id: self.client_id,
			client_secret: self.client_secret,
			scope: self.scope,
			client_auth_method: self.client_auth_method,
			scope_delimiter: self.scope_delimiter,
			extra_params: self.extra_params,
		})
	}
}

// Plain HTTP is tolerated only for loopback hosts (local development and test servers).
fn validate_endpoint(url: &Url) -> Result<(), ConfigError> {
	let loopback = match url.host_str() {
		Some("localhost") => true,
		Some(host) => host
			.trim_start_matches('[')
			.trim_end_matches(']')
			.parse::<IpAddr>()
			.is_ok_and(|ip| ip.is_loopback()),
		None => false,
	};

	match url.scheme() {
		"https" => Ok(()),
		"http" if loopback => Ok(()),
		_ => Err(ConfigError::InsecureEndpoint { url: url.to_string() }),
	}
}
