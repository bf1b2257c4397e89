//! Optional observability helpers for grants and the token manager.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit `oauth2_bearer.grant` spans (fields `grant`, `stage`) around token
//!   endpoint exchanges and `oauth2_bearer.manager` spans around token acquisition.
//! - Enable `metrics` to increment `oauth2_bearer_grant_total` (labels `grant`, `outcome`) and
//!   `oauth2_bearer_token_total` (label `outcome`).

mod counter;
mod span;

pub use counter::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Grant kinds observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantKind {
	/// Client Credentials grant.
	ClientCredentials,
	/// Resource Owner Password Credentials grant.
	Password,
	/// Refresh Token grant.
	RefreshToken,
}
impl GrantKind {
	/// Returns the RFC 6749 `grant_type` value, also used as a span or metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantKind::ClientCredentials => "client_credentials",
			GrantKind::Password => "password",
			GrantKind::RefreshToken => "refresh_token",
		}
	}
}
impl Display for GrantKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each grant exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantOutcome {
	/// Exchange started.
	Attempt,
	/// Token obtained.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl GrantOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantOutcome::Attempt => "attempt",
			GrantOutcome::Success => "success",
			GrantOutcome::Failure => "failure",
		}
	}
}
impl Display for GrantOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// How a `get_access_token` call was served.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenOutcome {
	/// Held token was still usable.
	Cached,
	/// A grant produced a new token.
	Acquired,
	/// The grant failed.
	Failed,
}
impl TokenOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenOutcome::Cached => "cached",
			TokenOutcome::Acquired => "acquired",
			TokenOutcome::Failed => "failed",
		}
	}
}
impl Display for TokenOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
