//! `client_credentials` grant for service-to-service principals.

// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	error::ConfigError,
	grant::{Grant, GrantConfig, GrantFuture},
	http::TokenHttpClient,
	oauth::TokenEndpoint,
	token::RawToken,
};

/// Grant that exchanges the configured client credentials for a new token on every request.
pub struct ClientCredentialsGrant<C>
where
	C: ?Sized + TokenHttpClient,
{
	endpoint: TokenEndpoint<C>,
}
impl<C> ClientCredentialsGrant<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a grant that reuses the caller-provided transport.
	pub fn with_http_client(
		config: &GrantConfig,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self, ConfigError> {
		let endpoint = TokenEndpoint::from_config(config, http_client.into(), Arc::new(SystemClock))?;

		Ok(Self { endpoint })
	}

	/// Replaces the clock used to stamp issued tokens.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.endpoint.set_clock(clock);

		self
	}
}
#[cfg(feature = "reqwest")]
impl ClientCredentialsGrant<ReqwestHttpClient> {
	/// Creates a grant backed by a fresh reqwest transport.
	pub fn new(config: &GrantConfig) -> Result<Self, ConfigError> {
		Self::with_http_client(config, ReqwestHttpClient::without_redirects()?)
	}
}
impl<C> Grant for ClientCredentialsGrant<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn request_new_access_token<'a>(&'a self, _current: Option<&'a RawToken>) -> GrantFuture<'a> {
		self.endpoint.exchange_client_credentials()
	}
}
impl<C> Debug for ClientCredentialsGrant<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentialsGrant").field("endpoint", &self.endpoint).finish()
	}
}
