//! Single-slot token store with input normalization and clock-driven validity checks.

// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	token::{RawToken, TokenInput},
};

/// Holds at most one [`RawToken`] and answers whether it is usable right now.
///
/// Every write replaces the held token wholesale; no history is kept. The store never touches
/// the network and never refreshes on its own.
#[derive(Debug)]
pub struct TokenStore {
	slot: RwLock<Option<RawToken>>,
	clock: Arc<dyn Clock>,
}
impl TokenStore {
	/// Creates an empty store reading time from `clock`.
	pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
		Self { slot: RwLock::new(None), clock }
	}

	/// Clock used for normalization and expiry checks.
	pub fn clock(&self) -> &Arc<dyn Clock> {
		&self.clock
	}

	/// Normalizes `input` and replaces the held token.
	///
	/// On [`Error::InvalidTokenFormat`](crate::error::Error::InvalidTokenFormat) the previously
	/// held token stays in place.
	pub fn set_access_token(&self, input: impl Into<TokenInput>) -> Result<()> {
		let token = input.into().into_raw_token(self.clock.now())?;

		self.replace(token);

		Ok(())
	}

	/// Accepts a JSON mapping or string, rejecting any other JSON shape.
	pub fn set_access_token_json(&self, value: serde_json::Value) -> Result<()> {
		self.set_access_token(TokenInput::try_from(value)?)
	}

	/// Returns the held token unchanged, if any.
	pub fn current_token(&self) -> Option<RawToken> {
		self.slot.read().clone()
	}

	/// Returns `true` iff a token is held and it has not expired.
	pub fn has_valid_token(&self) -> bool {
		self.valid_token().is_some()
	}

	/// Returns the held token when it has not expired.
	pub fn valid_token(&self) -> Option<RawToken> {
		self.usable_token(Duration::ZERO)
	}

	/// Returns the held token when it stays valid for longer than `window`.
	///
	/// A window reaching past the representable range treats every token as due.
	pub fn usable_token(&self, window: Duration) -> Option<RawToken> {
		let due_at = self.clock.now().checked_add(window)?;

		self.slot.read().as_ref().filter(|token| !token.is_expired_at(due_at)).cloned()
	}

	/// Drops the held token, returning it.
	pub fn clear(&self) -> Option<RawToken> {
		self.slot.write().take()
	}

	/// Drops the held token only if its access token equals `access_token`.
	pub fn clear_if(&self, access_token: &str) -> bool {
		let mut slot = self.slot.write();

		if slot.as_ref().is_some_and(|token| token.access_token().expose() == access_token) {
			*slot = None;

			true
		} else {
			false
		}
	}

	pub(crate) fn replace(&self, token: RawToken) {
		*self.slot.write() = Some(token);
	}

	// Stores `token` unless another token than `previous` was written meanwhile; an emptied slot
	// still accepts it.
	pub(crate) fn replace_unless_changed(
		&self,
		previous: Option<&RawToken>,
		token: RawToken,
	) -> bool {
		let mut slot = self.slot.write();

		if slot.is_some() && slot.as_ref() != previous {
			return false;
		}

		*slot = Some(token);

		true
	}
}
impl Default for TokenStore {
	fn default() -> Self {
		Self::with_clock(Arc::new(SystemClock))
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros;
	// self
	use super::*;
	use crate::{
		clock::ManualClock,
		error::{Error, TokenFormatError},
		token::{TokenMap, TokenSecret},
	};

	fn store_at(instant: OffsetDateTime) -> (TokenStore, Arc<ManualClock>) {
		let clock = Arc::new(ManualClock::new(instant));

		(TokenStore::with_clock(clock.clone()), clock)
	}

	#[test]
	fn empty_store_has_no_valid_token() {
		let store = TokenStore::default();

		assert!(store.current_token().is_none());
		assert!(!store.has_valid_token());
	}

	#[test]
	fn relative_expiry_elapses_with_the_clock() {
		let (store, clock) = store_at(macros::datetime!(2025-01-01 00:00 UTC));

		store
			.set_access_token(TokenMap::new("access").with_refresh_token("r").with_expires_in(3600))
			.expect("Mapping input should be accepted.");

		assert!(store.has_valid_token());

		clock.advance(Duration::seconds(3599));

		assert!(store.has_valid_token());

		clock.advance(Duration::seconds(1));

		assert!(!store.has_valid_token());
		assert!(store.current_token().is_some());
	}

	#[test]
	fn bare_string_stays_valid_indefinitely() {
		let (store, clock) = store_at(macros::datetime!(2025-01-01 00:00 UTC));

		store.set_access_token("plain").expect("Bare strings should be accepted.");
		clock.advance(Duration::weeks(520));

		assert!(store.has_valid_token());
		assert_eq!(
			store.current_token().map(|token| token.access_token().clone()),
			Some(TokenSecret::new("plain"))
		);
	}

	#[test]
	fn raw_token_is_stored_unchanged() {
		let (store, _clock) = store_at(macros::datetime!(2025-01-01 00:00 UTC));
		let token = RawToken::builder()
			.access_token("access")
			.refresh_token("refresh")
			.expires_at(macros::datetime!(2025-01-01 01:00 UTC))
			.build_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expect("Fixture should build.");

		store.set_access_token(token.clone()).expect("Raw tokens should be accepted.");

		assert_eq!(store.current_token(), Some(token));
	}

	#[test]
	fn rejected_input_keeps_the_previous_token() {
		let (store, _clock) = store_at(macros::datetime!(2025-01-01 00:00 UTC));

		store.set_access_token("keep-me").expect("Seed token should be accepted.");

		let err = store
			.set_access_token_json(json!({ "refresh_token": "r" }))
			.expect_err("Mapping without access_token must be rejected.");

		assert!(matches!(err, Error::InvalidTokenFormat(TokenFormatError::MissingAccessToken)));

		let err = store.set_access_token_json(json!([1, 2])).expect_err("Arrays must be rejected.");

		assert!(matches!(err, Error::InvalidTokenFormat(TokenFormatError::UnsupportedShape { .. })));
		assert!(store.set_access_token(TokenMap::default()).is_err());
		assert_eq!(
			store.current_token().map(|token| token.access_token().clone()),
			Some(TokenSecret::new("keep-me"))
		);
	}

	#[test]
	fn usable_token_honors_the_window() {
		let (store, _clock) = store_at(macros::datetime!(2025-01-01 00:00 UTC));

		store
			.set_access_token(TokenMap::new("short").with_expires_in(30))
			.expect("Mapping input should be accepted.");

		assert!(store.usable_token(Duration::seconds(29)).is_some());
		assert!(store.usable_token(Duration::seconds(30)).is_none());
		assert!(store.valid_token().is_some());
	}

	#[test]
	fn oversized_windows_mark_tokens_as_due() {
		let (store, _clock) = store_at(OffsetDateTime::UNIX_EPOCH);

		store.set_access_token("pinned").expect("Bare strings should be accepted.");

		assert!(store.usable_token(Duration::MAX).is_none());
		assert!(store.has_valid_token());
	}

	#[test]
	fn conditional_replace_yields_to_newer_writes() {
		let (store, _clock) = store_at(macros::datetime!(2025-01-01 00:00 UTC));
		let issued = RawToken::bearer("issued").expect("Fixture should build.");

		store.set_access_token("before").expect("Seed token should be accepted.");

		let before = store.current_token();

		store.set_access_token("written-meanwhile").expect("Second token should be accepted.");

		assert!(!store.replace_unless_changed(before.as_ref(), issued.clone()));
		assert_eq!(
			store.current_token().map(|token| token.access_token().clone()),
			Some(TokenSecret::new("written-meanwhile"))
		);

		store.clear();

		assert!(store.replace_unless_changed(before.as_ref(), issued.clone()));
		assert_eq!(store.current_token(), Some(issued));
	}

	#[test]
	fn clear_if_only_drops_matching_tokens() {
		let store = TokenStore::default();

		store.set_access_token("current").expect("Seed token should be accepted.");

		assert!(!store.clear_if("stale"));
		assert!(store.has_valid_token());
		assert!(store.clear_if("current"));
		assert!(store.current_token().is_none());
		assert!(store.clear().is_none());
	}
}
