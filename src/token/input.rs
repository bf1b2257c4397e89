//! Input shapes accepted by `set_access_token` and their normalization into [`RawToken`].

// crates.io
use serde::{Deserializer, de::Error as DeError};
use serde_json::Value;
// self
use crate::{_prelude::*, error::TokenFormatError, token::raw::RawToken};

/// Token data in any of the accepted shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenInput {
	/// OAuth token-response style mapping.
	Mapping(TokenMap),
	/// Bare access token that never expires.
	String(String),
	/// Already-normalized token, stored as-is.
	Token(RawToken),
}
impl TokenInput {
	/// Parses a JSON document (typically a token endpoint response body).
	pub fn from_json_str(raw: &str) -> Result<Self, TokenFormatError> {
		let mut de = serde_json::Deserializer::from_str(raw);
		let value: Value = serde_path_to_error::deserialize(&mut de).map_err(invalid_field)?;

		Self::try_from(value)
	}

	/// Normalizes the input, resolving relative expiry against `now`.
	pub fn into_raw_token(self, now: OffsetDateTime) -> Result<RawToken, TokenFormatError> {
		match self {
			Self::Mapping(map) => map.into_raw_token(now),
			Self::String(access_token) =>
				RawToken::builder().access_token(access_token).build_at(now),
			Self::Token(token) => Ok(token),
		}
	}
}
impl From<TokenMap> for TokenInput {
	fn from(map: TokenMap) -> Self {
		Self::Mapping(map)
	}
}
impl From<String> for TokenInput {
	fn from(access_token: String) -> Self {
		Self::String(access_token)
	}
}
impl From<&str> for TokenInput {
	fn from(access_token: &str) -> Self {
		Self::String(access_token.to_owned())
	}
}
impl From<RawToken> for TokenInput {
	fn from(token: RawToken) -> Self {
		Self::Token(token)
	}
}
impl TryFrom<Value> for TokenInput {
	type Error = TokenFormatError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Object(_) => TokenMap::from_json(value).map(Self::Mapping),
			Value::String(access_token) => Ok(Self::String(access_token)),
			other => Err(TokenFormatError::UnsupportedShape { shape: json_kind(&other) }),
		}
	}
}

/// Mapping form mirroring the OAuth 2.0 token response body.
///
/// `expires_in` is relative seconds, `expires_at` is a unix timestamp; when both are present
/// `expires_at` wins. Unknown keys such as `token_type` or `scope` are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMap {
	/// Access token; required for normalization to succeed.
	#[serde(default)]
	pub access_token: Option<String>,
	/// Optional refresh token.
	#[serde(default)]
	pub refresh_token: Option<String>,
	/// Lifetime in seconds from now. Numeric strings are accepted.
	#[serde(default, deserialize_with = "deserialize_seconds")]
	pub expires_in: Option<i64>,
	/// Absolute expiry as unix seconds. Numeric strings are accepted.
	#[serde(default, deserialize_with = "deserialize_seconds")]
	pub expires_at: Option<i64>,
}
impl TokenMap {
	/// Creates a mapping carrying only an access token.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self { access_token: Some(access_token.into()), ..Default::default() }
	}

	/// Sets the refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(refresh_token.into());

		self
	}

	/// Sets the relative lifetime in seconds.
	pub fn with_expires_in(mut self, seconds: i64) -> Self {
		self.expires_in = Some(seconds);

		self
	}

	/// Sets the absolute expiry as unix seconds.
	pub fn with_expires_at(mut self, unix_seconds: i64) -> Self {
		self.expires_at = Some(unix_seconds);

		self
	}

	/// Decodes a JSON object into a mapping, reporting the path of any mistyped field.
	pub fn from_json(value: Value) -> Result<Self, TokenFormatError> {
		serde_path_to_error::deserialize(value).map_err(invalid_field)
	}

	/// Normalizes the mapping into a [`RawToken`].
	pub fn into_raw_token(self, now: OffsetDateTime) -> Result<RawToken, TokenFormatError> {
		let mut builder = RawToken::builder();

		if let Some(access_token) = self.access_token {
			builder = builder.access_token(access_token);
		}
		if let Some(refresh_token) = self.refresh_token {
			builder = builder.refresh_token(refresh_token);
		}
		if let Some(unix_seconds) = self.expires_at {
			let instant = OffsetDateTime::from_unix_timestamp(unix_seconds)
				.map_err(|_| TokenFormatError::ExpiresAtOutOfRange)?;

			builder = builder.expires_at(instant);
		}
		if let Some(seconds) = self.expires_in {
			builder = builder.expires_in(Duration::seconds(seconds));
		}

		builder.build_at(now)
	}
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Seconds {
		Integer(i64),
		Float(f64),
		Text(String),
	}

	match Option::<Seconds>::deserialize(deserializer)? {
		None => Ok(None),
		Some(Seconds::Integer(value)) => Ok(Some(value)),
		Some(Seconds::Float(value)) if value.is_finite() => Ok(Some(value.trunc() as i64)),
		Some(Seconds::Float(_)) => Err(DeError::custom("seconds must be finite")),
		Some(Seconds::Text(raw)) => raw.trim().parse::<i64>().map(Some).map_err(DeError::custom),
	}
}

fn invalid_field(err: serde_path_to_error::Error<serde_json::Error>) -> TokenFormatError {
	TokenFormatError::InvalidField { path: err.path().to_string(), message: err.inner().to_string() }
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
