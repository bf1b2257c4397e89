//! Error types shared by the token store, the manager, grants, and the request pipeline.

// self
use crate::{_prelude::*, grant::ScopeValidationError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Input handed to `set_access_token` could not be normalized into a token.
	#[error("Invalid token format: {0}")]
	InvalidTokenFormat(#[from] TokenFormatError),
	/// The grant could not obtain a new access token.
	#[error("Authentication failed: {0}")]
	AuthenticationFailed(#[from] AuthenticationError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure while sending a signed request.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Reasons a token input was rejected during normalization.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TokenFormatError {
	/// No access token was supplied, or it was empty.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Input is neither a mapping, a string, nor a token.
	#[error("Unsupported token input shape: {shape}.")]
	UnsupportedShape {
		/// JSON kind of the rejected input.
		shape: &'static str,
	},
	/// A mapping field carried a value of the wrong type.
	#[error("Token field `{path}` is invalid: {message}.")]
	InvalidField {
		/// Path of the offending field.
		path: String,
		/// Deserializer message.
		message: String,
	},
	/// `expires_in` cannot be added to the current instant.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// `expires_at` is not a representable unix timestamp.
	#[error("The expires_at value is not a valid unix timestamp.")]
	ExpiresAtOutOfRange,
}

/// Failures reported by a [`Grant`](crate::grant::Grant) while acquiring a token.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token endpoint answered with a body that is not a usable token.
	#[error("Token endpoint returned a malformed token: {0}")]
	MalformedToken(#[from] TokenFormatError),

	/// Authorization server rejected the grant (bad credentials or refresh token).
	#[error("Authorization server rejected the grant: {reason}.")]
	InvalidGrant {
		/// Server- or crate-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Server- or crate-supplied reason string.
		reason: String,
	},
	/// Requested scopes exceed what the client may obtain.
	#[error("Requested scopes were refused: {reason}.")]
	InsufficientScope {
		/// Server- or crate-supplied reason string.
		reason: String,
	},
	/// Refresh-token exchange was requested without a refresh token on hand.
	#[error("No refresh token is available for the refresh_token grant.")]
	MissingRefreshToken,
	/// Grant cannot produce tokens at all.
	#[error("No token can be acquired: {reason}.")]
	Unavailable {
		/// Why the grant is unavailable.
		reason: String,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Token endpoint was never configured.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Token endpoint cannot be handed to the OAuth client.
	#[error("Token endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Token endpoint must use HTTPS unless it points at a loopback host.
	#[error("The token endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Scope delimiter is a control character.
	#[error("Scope delimiter must be a printable character.")]
	InvalidScopeDelimiter {
		/// Invalid delimiter that was supplied.
		delimiter: char,
	},
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] ScopeValidationError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Token endpoint returned an unexpected but non-fatal response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request could not be assembled.
	#[error("HTTP request could not be built.")]
	Request(#[from] oauth2::http::Error),
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while sending the request.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_format_error_converts_into_invalid_token_format() {
		let err: Error = TokenFormatError::MissingAccessToken.into();

		assert!(matches!(err, Error::InvalidTokenFormat(TokenFormatError::MissingAccessToken)));
		assert_eq!(err.to_string(), "Invalid token format: Access token is required.");
	}

	#[test]
	fn authentication_error_keeps_its_source() {
		let auth = AuthenticationError::InvalidClient { reason: "bad secret".into() };
		let err: Error = auth.into();
		let source = StdError::source(&err)
			.expect("Authentication failures should expose the grant error as their source.");

		assert!(matches!(err, Error::AuthenticationFailed(AuthenticationError::InvalidClient { .. })));
		assert_eq!(source.to_string(), "Client authentication failed: bad secret.");
	}
}
