//! Immutable token value, lifecycle helpers, and the builder every input shape normalizes through.

// self
use crate::{_prelude::*, error::TokenFormatError, token::secret::TokenSecret};

/// Lifecycle status of a [`RawToken`] at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Token may be presented to resource servers.
	Active,
	/// Token reached its expiry instant.
	Expired,
}

/// Normalized OAuth token: an access token, an optional refresh token, and an optional absolute
/// expiry instant.
///
/// A token without `expires_at` never expires. The access token is never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct RawToken {
	access_token: TokenSecret,
	refresh_token: Option<TokenSecret>,
	expires_at: Option<OffsetDateTime>,
}
impl RawToken {
	/// Returns a builder for assembling a token.
	pub fn builder() -> RawTokenBuilder {
		RawTokenBuilder::default()
	}

	/// Creates a never-expiring token carrying only an access token.
	pub fn bearer(access_token: impl Into<String>) -> Result<Self, TokenFormatError> {
		Self::builder().access_token(access_token).build_at(OffsetDateTime::UNIX_EPOCH)
	}

	/// Access token presented to resource servers.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Refresh token, if the authorization server issued one.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	/// Absolute expiry instant; `None` means the token never expires.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		match self.expires_at {
			Some(expires_at) if expires_at <= instant => TokenStatus::Expired,
			_ => TokenStatus::Active,
		}
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Time left before expiry, clamped at zero; `None` for never-expiring tokens.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Option<Duration> {
		self.expires_at.map(|expires_at| (expires_at - instant).max(Duration::ZERO))
	}

	/// Returns a copy that keeps `refresh_token` when this token carries none.
	pub fn or_refresh_token(mut self, refresh_token: Option<&TokenSecret>) -> Self {
		if self.refresh_token.is_none() {
			self.refresh_token = refresh_token.cloned();
		}

		self
	}
}
impl Debug for RawToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RawToken")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`RawToken`].
///
/// An absolute `expires_at` wins over a relative `expires_in`; with neither the token never
/// expires.
#[derive(Clone, Debug, Default)]
pub struct RawTokenBuilder {
	access_token: Option<TokenSecret>,
	refresh_token: Option<TokenSecret>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl RawTokenBuilder {
	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(TokenSecret::new(token));

		self
	}

	/// Provides the refresh token value.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets an expiry relative to the build instant. Negative values yield an expired token.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Consumes the builder, resolving relative expiry against `now`.
	pub fn build_at(self, now: OffsetDateTime) -> Result<RawToken, TokenFormatError> {
		let access_token = self
			.access_token
			.filter(|token| !token.is_empty())
			.ok_or(TokenFormatError::MissingAccessToken)?;
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => Some(instant),
			(None, Some(delta)) =>
				Some(now.checked_add(delta).ok_or(TokenFormatError::ExpiresInOutOfRange)?),
			(None, None) => None,
		};
		let refresh_token = self.refresh_token.filter(|token| !token.is_empty());

		Ok(RawToken { access_token, refresh_token, expires_at })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn expiry_is_strict() {
		let token = RawToken::builder()
			.access_token("access")
			.expires_at(macros::datetime!(2025-01-01 01:00 UTC))
			.build_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expect("Token fixture should build.");

		assert_eq!(token.status_at(macros::datetime!(2025-01-01 00:59:59 UTC)), TokenStatus::Active);
		assert_eq!(token.status_at(macros::datetime!(2025-01-01 01:00 UTC)), TokenStatus::Expired);
		assert!(token.is_expired_at(macros::datetime!(2025-01-01 02:00 UTC)));
	}

	#[test]
	fn tokens_without_expiry_never_expire() {
		let token = RawToken::bearer("forever").expect("Bare bearer token should build.");

		assert_eq!(token.expires_at(), None);
		assert_eq!(token.remaining_at(macros::datetime!(9999-01-01 00:00 UTC)), None);
		assert!(!token.is_expired_at(macros::datetime!(9999-01-01 00:00 UTC)));
	}

	#[test]
	fn absolute_expiry_wins_over_relative() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let token = RawToken::builder()
			.access_token("access")
			.expires_in(Duration::hours(5))
			.expires_at(now + Duration::minutes(10))
			.build_at(now)
			.expect("Token with both expiry forms should build.");

		assert_eq!(token.expires_at(), Some(now + Duration::minutes(10)));

		let relative = RawToken::builder()
			.access_token("access")
			.expires_in(Duration::seconds(-3600))
			.build_at(now)
			.expect("Token with negative expires_in should build.");

		assert_eq!(relative.expires_at(), Some(now - Duration::hours(1)));
		assert!(relative.is_expired_at(now));
		assert_eq!(relative.remaining_at(now), Some(Duration::ZERO));
	}

	#[test]
	fn empty_access_token_is_rejected() {
		let err = RawToken::builder()
			.access_token("")
			.refresh_token("refresh")
			.build_at(OffsetDateTime::UNIX_EPOCH)
			.expect_err("Empty access tokens must be rejected.");

		assert_eq!(err, TokenFormatError::MissingAccessToken);
		assert_eq!(
			RawToken::builder().build_at(OffsetDateTime::UNIX_EPOCH),
			Err(TokenFormatError::MissingAccessToken)
		);
	}

	#[test]
	fn refresh_token_is_kept_only_when_missing() {
		let previous = TokenSecret::new("old-refresh");
		let without = RawToken::bearer("a").expect("Fixture should build.");
		let with = RawToken::builder()
			.access_token("b")
			.refresh_token("new-refresh")
			.build_at(OffsetDateTime::UNIX_EPOCH)
			.expect("Fixture should build.");

		assert_eq!(
			without.or_refresh_token(Some(&previous)).refresh_token(),
			Some(&TokenSecret::new("old-refresh"))
		);
		assert_eq!(
			with.or_refresh_token(Some(&previous)).refresh_token(),
			Some(&TokenSecret::new("new-refresh"))
		);
	}

	#[test]
	fn debug_redacts_secrets() {
		let token = RawToken::builder()
			.access_token("top-secret")
			.refresh_token("also-secret")
			.build_at(OffsetDateTime::UNIX_EPOCH)
			.expect("Fixture should build.");
		let rendered = format!("{token:?}");

		assert!(!rendered.contains("secret"));
		assert!(rendered.contains("<redacted>"));
	}
}
