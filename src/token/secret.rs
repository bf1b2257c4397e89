//! Secret wrapper that keeps access and refresh tokens out of logs.

// self
use crate::_prelude::*;

/// Redacted token secret; `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the secret holds an empty string.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl PartialEq<str> for TokenSecret {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}
impl PartialEq<&str> for TokenSecret {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
