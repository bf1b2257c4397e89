//! The grant capability consumed by [`TokenManager`](crate::manager::TokenManager) and its
//! built-in strategies.
//!
//! A [`Grant`] turns "whatever state is on hand" into a fresh [`RawToken`]. The manager never
//! inspects how: client credentials, resource-owner passwords, and refresh-token exchanges are
//! all just implementations picked at construction time.

pub mod config;
pub mod scope;

mod client_credentials;
mod password;
mod refresh_token;

pub use client_credentials::*;
pub use config::*;
pub use password::*;
pub use refresh_token::*;
pub use scope::*;

// self
use crate::{_prelude::*, error::AuthenticationError, token::RawToken};

/// Boxed future returned by [`Grant::request_new_access_token`].
pub type GrantFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawToken, AuthenticationError>> + 'a + Send>>;

/// Strategy that obtains a new token, given the token currently held (if any).
///
/// Implementations perform whatever exchange they need and fail with an
/// [`AuthenticationError`] when no token can be obtained. The current token is passed so
/// strategies that rotate refresh tokens can read them.
pub trait Grant
where
	Self: Send + Sync,
{
	/// Requests a new token.
	fn request_new_access_token<'a>(&'a self, current: Option<&'a RawToken>) -> GrantFuture<'a>;
}

/// Grant that never produces tokens; for managers fed exclusively through `set_access_token`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullGrant;
impl Grant for NullGrant {
	fn request_new_access_token<'a>(&'a self, _current: Option<&'a RawToken>) -> GrantFuture<'a> {
		Box::pin(async {
			Err(AuthenticationError::Unavailable {
				reason: "no grant is configured; set an access token explicitly".into(),
			})
		})
	}
}
