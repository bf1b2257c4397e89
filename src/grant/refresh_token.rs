//! `refresh_token` grant that rotates the refresh token held by the current token.

// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	error::{AuthenticationError, ConfigError},
	grant::{Grant, GrantConfig, GrantFuture},
	http::TokenHttpClient,
	oauth::TokenEndpoint,
	token::RawToken,
};

/// Grant that exchanges the current token's refresh token for a new token.
///
/// Fails with [`AuthenticationError::MissingRefreshToken`] without touching the network when
/// nothing is held or the held token carries no refresh token. When the server omits a new
/// refresh token, the previous one is carried over.
pub struct RefreshTokenGrant<C>
where
	C: ?Sized + TokenHttpClient,
{
	endpoint: TokenEndpoint<C>,
}
impl<C> RefreshTokenGrant<C>
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
impl RefreshTokenGrant<ReqwestHttpClient> {
	/// Creates a grant backed by a fresh reqwest transport.
	pub fn new(config: &GrantConfig) -> Result<Self, ConfigError> {
		Self::with_http_client(config, ReqwestHttpClient::without_redirects()?)
	}
}
impl<C> Grant for RefreshTokenGrant<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn request_new_access_token<'a>(&'a self, current: Option<&'a RawToken>) -> GrantFuture<'a> {
		match current.and_then(RawToken::refresh_token) {
			Some(refresh_token) => self.endpoint.exchange_refresh_token(refresh_token),
			None => Box::pin(async { Err(AuthenticationError::MissingRefreshToken) }),
		}
	}
}
impl<C> Debug for RefreshTokenGrant<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshTokenGrant").field("endpoint", &self.endpoint).finish()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn missing_refresh_tokens_fail_without_network() {
		let config = GrantConfig::builder("client")
			.token_endpoint(Url::parse("https://auth.invalid/token").expect("Fixture URL should parse."))
			.build()
			.expect("Fixture config should build.");
		let grant = RefreshTokenGrant::new(&config).expect("Grant should build.");
		let held = RawToken::bearer("held").expect("Fixture token should build.");

		assert!(matches!(
			grant.request_new_access_token(None).await,
			Err(AuthenticationError::MissingRefreshToken)
		));
		assert!(matches!(
			grant.request_new_access_token(Some(&held)).await,
			Err(AuthenticationError::MissingRefreshToken)
		));
	}
}
