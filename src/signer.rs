//! Strategies for attaching an access token to outgoing requests.

// self
use crate::token::TokenSecret;

/// Attaches an access token to a request without constraining the HTTP client type.
///
/// The crate implements it for `reqwest::RequestBuilder` behind the `reqwest` feature; other
/// clients can implement it for their own request types.
pub trait AccessTokenSigner<Request>
where
	Self: Send + Sync,
{
	/// Consumes the request and returns it carrying `token`.
	fn sign(&self, request: Request, token: &TokenSecret) -> Request;
}

/// Sends the token as `Authorization: Bearer <token>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BearerAuth;
#[cfg(feature = "reqwest")]
impl AccessTokenSigner<reqwest::RequestBuilder> for BearerAuth {
	fn sign(&self, request: reqwest::RequestBuilder, token: &TokenSecret) -> reqwest::RequestBuilder {
		request.bearer_auth(token.expose())
	}
}

/// Sends the token as a query parameter, `access_token` unless renamed.
#[derive(Clone, Debug)]
pub struct QueryString {
	field_name: String,
}
impl QueryString {
	/// Uses `field_name` instead of `access_token`.
	pub fn new(field_name: impl Into<String>) -> Self {
		Self { field_name: field_name.into() }
	}

	/// Name of the query parameter carrying the token.
	pub fn field_name(&self) -> &str {
		&self.field_name
	}
}
impl Default for QueryString {
	fn default() -> Self {
		Self::new("access_token")
	}
}
#[cfg(feature = "reqwest")]
impl AccessTokenSigner<reqwest::RequestBuilder> for QueryString {
	fn sign(&self, request: reqwest::RequestBuilder, token: &TokenSecret) -> reqwest::RequestBuilder {
		request.query(&[(self.field_name.as_str(), token.expose())])
	}
}
