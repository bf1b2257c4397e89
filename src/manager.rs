//! Token lifecycle orchestration: serve the held token while it is usable, otherwise run the
//! configured grant exactly once even when many callers race.
//!
//! [`TokenManager::get_access_token`] reads the store without locking. Only when the held token
//! is missing or due does it take the refresh guard, re-check the store (another caller may
//! have finished a refresh meanwhile) and invoke the grant. Failures never touch the store.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	clock::Clock,
	error::AuthenticationError,
	grant::Grant,
	obs::{self, ObsSpan, TokenOutcome},
	store::TokenStore,
	token::{RawToken, TokenInput, TokenSecret},
};

/// Thread-safe counters describing how token lookups were served.
#[derive(Debug, Default)]
pub struct TokenMetrics {
	cache_hits: AtomicU64,
	grant_invocations: AtomicU64,
	grant_failures: AtomicU64,
}
impl TokenMetrics {
	/// Returns the number of lookups answered from the held token.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Returns the number of grant calls, including refresh-grant attempts.
	pub fn grant_invocations(&self) -> u64 {
		self.grant_invocations.load(Ordering::Relaxed)
	}

	/// Returns the number of lookups that ended without a token.
	pub fn grant_failures(&self) -> u64 {
		self.grant_failures.load(Ordering::Relaxed)
	}

	fn record_cache_hit(&self) {
		self.cache_hits.fetch_add(1, Ordering::Relaxed);
	}

	fn record_grant_invocation(&self) {
		self.grant_invocations.fetch_add(1, Ordering::Relaxed);
	}

	fn record_grant_failure(&self) {
		self.grant_failures.fetch_add(1, Ordering::Relaxed);
	}
}

/// Owns a [`TokenStore`] and the [`Grant`] used to fill it.
///
/// Share it behind an [`Arc`]; every method takes `&self`.
pub struct TokenManager {
	store: TokenStore,
	grant: Arc<dyn Grant>,
	refresh_grant: Option<Arc<dyn Grant>>,
	refresh_guard: AsyncMutex<()>,
	refresh_window: Duration,
	metrics: TokenMetrics,
}
impl TokenManager {
	/// Creates a manager with an empty store on the system clock.
	pub fn new(grant: Arc<dyn Grant>) -> Self {
		Self {
			store: TokenStore::default(),
			grant,
			refresh_grant: None,
			refresh_guard: AsyncMutex::new(()),
			refresh_window: Duration::ZERO,
			metrics: TokenMetrics::default(),
		}
	}

	/// Replaces the clock used for normalization and expiry checks.
	///
	/// A token held at this point is kept as is. Built-in grants stamp `expires_at` with their
	/// own clock, so pass the same clock to the grant's `with_clock` when it is not the system
	/// clock.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		let held = self.store.clear();

		self.store = TokenStore::with_clock(clock);

		if let Some(token) = held {
			self.store.replace(token);
		}

		self
	}

	/// Adds a grant tried first whenever the held token carries a refresh token.
	///
	/// When it fails, the primary grant runs instead.
	pub fn with_refresh_grant(mut self, grant: Arc<dyn Grant>) -> Self {
		self.refresh_grant = Some(grant);

		self
	}

	/// Treats tokens expiring within `window` as due for renewal.
	///
	/// Defaults to zero, so a token is renewed only once it has expired. Negative windows are
	/// clamped to zero.
	pub fn with_refresh_window(mut self, window: Duration) -> Self {
		self.refresh_window = window.max(Duration::ZERO);

		self
	}

	/// Normalizes `input` and replaces the held token.
	pub fn set_access_token(&self, input: impl Into<TokenInput>) -> Result<()> {
		self.store.set_access_token(input)
	}

	/// Replaces the held token from a JSON mapping or string.
	pub fn set_access_token_json(&self, value: serde_json::Value) -> Result<()> {
		self.store.set_access_token_json(value)
	}

	/// Returns the held token, if any.
	pub fn current_token(&self) -> Option<RawToken> {
		self.store.current_token()
	}

	/// Returns `true` iff a token is held and has not expired.
	pub fn has_valid_token(&self) -> bool {
		self.store.has_valid_token()
	}

	/// Returns a usable access token, running the grant only when none is held.
	///
	/// Concurrent callers that find no usable token wait for a single grant invocation and
	/// share its result. On failure the store is left unchanged. When a token is set while the
	/// grant runs, that token is kept and the issued one is only returned to this caller.
	pub async fn get_access_token(&self) -> Result<TokenSecret> {
		if let Some(secret) = self.cached_secret() {
			return Ok(secret);
		}

		ObsSpan::manager("get_access_token").instrument(self.acquire(false)).await
	}

	/// Runs the grant regardless of the held token's validity.
	pub async fn refresh_access_token(&self) -> Result<TokenSecret> {
		ObsSpan::manager("refresh_access_token").instrument(self.acquire(true)).await
	}

	/// Drops the held token if its access token still equals `rejected`.
	///
	/// Returns `false` when another caller already replaced it.
	pub fn invalidate(&self, rejected: &TokenSecret) -> bool {
		self.store.clear_if(rejected.expose())
	}

	/// Counters describing how lookups were served.
	pub fn metrics(&self) -> &TokenMetrics {
		&self.metrics
	}

	fn cached_secret(&self) -> Option<TokenSecret> {
		let token = self.store.usable_token(self.refresh_window)?;

		self.metrics.record_cache_hit();
		obs::record_token_outcome(TokenOutcome::Cached);

		Some(token.access_token().clone())
	}

	async fn acquire(&self, force: bool) -> Result<TokenSecret> {
		let _singleflight = self.refresh_guard.lock().await;

		if !force {
			if let Some(secret) = self.cached_secret() {
				return Ok(secret);
			}
		}

		let current = self.store.current_token();

		match self.run_grants(current.as_ref()).await {
			Ok(token) => {
				let secret = token.access_token().clone();

				// A token set through `set_access_token` during the exchange stays in place.
				self.store.replace_unless_changed(current.as_ref(), token);
				obs::record_token_outcome(TokenOutcome::Acquired);

				Ok(secret)
			},
			Err(e) => {
				self.metrics.record_grant_failure();
				obs::record_token_outcome(TokenOutcome::Failed);

				Err(e.into())
			},
		}
	}

	async fn run_grants(&self, current: Option<&RawToken>) -> Result<RawToken, AuthenticationError> {
		let refreshable = current.and_then(RawToken::refresh_token).is_some();

		if let Some(refresh_grant) = self.refresh_grant.as_ref().filter(|_| refreshable) {
			self.metrics.record_grant_invocation();

			match refresh_grant.request_new_access_token(current).await {
				Ok(token) => return Ok(token),
				Err(e) => obs::warn("Refresh grant failed; falling back to the primary grant.", &e),
			}
		}

		self.metrics.record_grant_invocation();

		self.grant.request_new_access_token(current).await
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("store", &self.store)
			.field("refresh_grant_set", &self.refresh_grant.is_some())
			.field("refresh_window", &self.refresh_window)
			.field("metrics", &self.metrics)
			.finish_non_exhaustive()
	}
}
