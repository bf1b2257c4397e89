//! Token endpoint facade built on the `oauth2` crate.
//!
//! The built-in grants delegate request assembly (form bodies, client authentication) to
//! `oauth2` and only translate its responses and errors into [`RawToken`] and
//! [`AuthenticationError`].

mod classify;

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError, RefreshToken,
	RequestTokenError, ResourceOwnerPassword, ResourceOwnerUsername, Scope, TokenResponse,
	TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	clock::Clock,
	error::{AuthenticationError, ConfigError, TokenFormatError, TransientError, TransportError},
	grant::{ClientAuthMethod, GrantConfig, ScopeSet},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	oauth::classify::ErrorClass,
	obs::{self, GrantKind, GrantOutcome, ObsSpan},
	token::{RawToken, TokenSecret},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type ExchangeFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawToken, AuthenticationError>> + 'a + Send>>;

// Adds the configured scope and extra parameters to any `oauth2` token request.
macro_rules! with_params {
	($endpoint:expr, $request:expr) => {{
		let endpoint = $endpoint;
		let mut request = $request;

		if endpoint.scope_delimiter == ' ' {
			for scope in endpoint.config_scope.iter() {
				request = request.add_scope(Scope::new(scope.to_owned()));
			}
		} else if let Some(joined) = endpoint.config_scope.join(endpoint.scope_delimiter) {
			request = request.add_extra_param("scope", joined);
		}
		for (key, value) in &endpoint.extra_params {
			request = request.add_extra_param(key, value);
		}

		request
	}};
}

/// One token endpoint plus the transport and clock used to reach it.
pub(crate) struct TokenEndpoint<C>
where
	C: ?Sized + TokenHttpClient,
{
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
	clock: Arc<dyn Clock>,
	config_scope: ScopeSet,
	scope_delimiter: char,
	extra_params: BTreeMap<String, String>,
}
impl<C> TokenEndpoint<C>
where
	C: ?Sized + TokenHttpClient,
{
	pub(crate) fn from_config(
		config: &GrantConfig,
		http_client: Arc<C>,
		clock: Arc<dyn Clock>,
	) -> Result<Self, ConfigError> {
		let token_url = TokenUrl::new(config.token_endpoint.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let mut oauth_client =
			BasicClient::new(ClientId::new(config.client_id.clone())).set_token_uri(token_url);

		if let Some(secret) = &config.client_secret {
			oauth_client =
				oauth_client.set_client_secret(ClientSecret::new(secret.expose().to_owned()));
		}
		if matches!(config.client_auth_method, ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self {
			oauth_client,
			http_client,
			clock,
			config_scope: config.scope.clone(),
			scope_delimiter: config.scope_delimiter,
			extra_params: config.extra_params.clone(),
		})
	}

	pub(crate) fn set_clock(&mut self, clock: Arc<dyn Clock>) {
		self.clock = clock;
	}

	pub(crate) fn exchange_client_credentials(&self) -> ExchangeFuture<'_> {
		const KIND: GrantKind = GrantKind::ClientCredentials;

		let meta = ResponseMetadataSlot::default();

		Box::pin(observe(KIND, async move {
			let handle = self.http_client.with_metadata(meta.clone());
			let request = with_params!(self, self.oauth_client.exchange_client_credentials());
			let response = request
				.request_async(&handle)
				.await
				.map_err(|err| map_request_error(meta.take(), err))?;

			map_token_response(response, self.clock.now())
		}))
	}

	pub(crate) fn exchange_password<'a>(
		&'a self,
		username: &'a str,
		password: &'a TokenSecret,
	) -> ExchangeFuture<'a> {
		const KIND: GrantKind = GrantKind::Password;

		let meta = ResponseMetadataSlot::default();

		Box::pin(observe(KIND, async move {
			let handle = self.http_client.with_metadata(meta.clone());
			let username = ResourceOwnerUsername::new(username.to_owned());
			let password = ResourceOwnerPassword::new(password.expose().to_owned());
			let request =
				with_params!(self, self.oauth_client.exchange_password(&username, &password));
			let response = request
				.request_async(&handle)
				.await
				.map_err(|err| map_request_error(meta.take(), err))?;

			map_token_response(response, self.clock.now())
		}))
	}

	pub(crate) fn exchange_refresh_token<'a>(
		&'a self,
		refresh_token: &'a TokenSecret,
	) -> ExchangeFuture<'a> {
		const KIND: GrantKind = GrantKind::RefreshToken;

		let meta = ResponseMetadataSlot::default();

		Box::pin(observe(KIND, async move {
			let handle = self.http_client.with_metadata(meta.clone());
			let refresh_secret = RefreshToken::new(refresh_token.expose().to_owned());
			let request =
				with_params!(self, self.oauth_client.exchange_refresh_token(&refresh_secret));
			let response = request
				.request_async(&handle)
				.await
				.map_err(|err| map_request_error(meta.take(), err))?;

			// Servers that do not rotate refresh tokens omit them from the response.
			map_token_response(response, self.clock.now())
				.map(|token| token.or_refresh_token(Some(refresh_token)))
		}))
	}
}
impl<C> Debug for TokenEndpoint<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenEndpoint")
			.field("scope", &self.config_scope)
			.field("scope_delimiter", &self.scope_delimiter)
			.field("extra_params", &self.extra_params.keys().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

async fn observe<F>(kind: GrantKind, exchange: F) -> Result<RawToken, AuthenticationError>
where
	F: Future<Output = Result<RawToken, AuthenticationError>>,
{
	obs::record_grant_outcome(kind, GrantOutcome::Attempt);

	let result = ObsSpan::grant(kind, "token_endpoint").instrument(exchange).await;

	match &result {
		Ok(_) => obs::record_grant_outcome(kind, GrantOutcome::Success),
		Err(_) => obs::record_grant_outcome(kind, GrantOutcome::Failure),
	}

	result
}

fn map_token_response(
	response: BasicTokenResponse,
	now: OffsetDateTime,
) -> Result<RawToken, AuthenticationError> {
	let mut builder = RawToken::builder().access_token(response.access_token().secret().to_owned());

	if let Some(refresh) = response.refresh_token() {
		builder = builder.refresh_token(refresh.secret().to_owned());
	}
	if let Some(expires_in) = response.expires_in() {
		let seconds = i64::try_from(expires_in.as_secs())
			.map_err(|_| TokenFormatError::ExpiresInOutOfRange)?;

		builder = builder.expires_in(Duration::seconds(seconds));
	}

	Ok(builder.build_at(now)?)
}

fn map_request_error<E>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> AuthenticationError
where
	E: 'static + Send + Sync + StdError,
{
	let meta = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, meta),
		RequestTokenError::Request(error) => map_transport_error(error, meta),
		RequestTokenError::Parse(error, _body) =>
			TransientError::TokenResponseParse { source: error, status: meta_status(meta) }.into(),
		RequestTokenError::Other(message) => TransientError::TokenEndpoint {
			message,
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		}
		.into(),
	}
}

fn map_server_response_error(
	response: BasicErrorResponse,
	meta: Option<&ResponseMetadata>,
) -> AuthenticationError {
	let code = response.error().as_ref().to_owned();
	let description = response.error_description().map(String::as_str);
	let reason = match description {
		Some(description) => format!("{code}: {description}"),
		None => code.clone(),
	};

	match classify::classify(Some(&code), description, meta_status(meta)) {
		ErrorClass::InvalidGrant => AuthenticationError::InvalidGrant { reason },
		ErrorClass::InvalidClient => AuthenticationError::InvalidClient { reason },
		ErrorClass::InsufficientScope => AuthenticationError::InsufficientScope { reason },
		ErrorClass::Transient => TransientError::TokenEndpoint {
			message: reason,
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		}
		.into(),
	}
}

fn map_transport_error<E>(
	err: HttpClientError<E>,
	meta: Option<&ResponseMetadata>,
) -> AuthenticationError
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => TransportError::Request(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransientError::TokenEndpoint {
			message: format!("HTTP client error: {message}"),
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		}
		.into(),
		_ => TransientError::TokenEndpoint {
			message: "HTTP client error".into(),
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		}
		.into(),
	}
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}
