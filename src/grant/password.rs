//! Resource-owner `password` grant.

// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	error::ConfigError,
	grant::{Grant, GrantConfig, GrantFuture},
	http::TokenHttpClient,
	oauth::TokenEndpoint,
	token::{RawToken, TokenSecret},
};

/// Grant that exchanges a username and password for a new token.
///
/// The password is held as a [`TokenSecret`] so it never appears in debug output.
pub struct PasswordCredentialsGrant<C>
where
	C: ?Sized + TokenHttpClient,
{
	endpoint: TokenEndpoint<C>,
	username: String,
	password: TokenSecret,
}
impl<C> PasswordCredentialsGrant<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a grant that reuses the caller-provided transport.
	pub fn with_http_client(
		config: &GrantConfig,
		username: impl Into<String>,
		password: impl Into<String>,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self, ConfigError> {
		let endpoint = TokenEndpoint::from_config(config, http_client.into(), Arc::new(SystemClock))?;

		Ok(Self { endpoint, username: username.into(), password: TokenSecret::new(password) })
	}

	/// Replaces the clock used to stamp issued tokens.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.endpoint.set_clock(clock);

		self
	}

	/// Resource owner the grant authenticates as.
	pub fn username(&self) -> &str {
		&self.username
	}
}
#[cfg(feature = "reqwest")]
impl PasswordCredentialsGrant<ReqwestHttpClient> {
	/// Creates a grant backed by a fresh reqwest transport.
	pub fn new(
		config: &GrantConfig,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Result<Self, ConfigError> {
		Self::with_http_client(config, username, password, ReqwestHttpClient::without_redirects()?)
	}
}
impl<C> Grant for PasswordCredentialsGrant<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn request_new_access_token<'a>(&'a self, _current: Option<&'a RawToken>) -> GrantFuture<'a> {
		self.endpoint.exchange_password(&self.username, &self.password)
	}
}
impl<C> Debug for PasswordCredentialsGrant<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PasswordCredentialsGrant")
			.field("endpoint", &self.endpoint)
			.field("username", &self.username)
			.field("password", &self.password)
			.finish()
	}
}
