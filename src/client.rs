//! Reqwest pipeline that signs every request with a managed access token.

// crates.io
use reqwest::{IntoUrl, Method, RequestBuilder, Response, StatusCode};
// self
use crate::{
	_prelude::*,
	error::TransportError,
	manager::TokenManager,
	signer::{AccessTokenSigner, BearerAuth},
};

/// HTTP client that fetches a token from a [`TokenManager`] before each request.
///
/// A `401 Unauthorized` answer invalidates the token that was sent and the request is replayed
/// once with a fresh token, provided its body can be cloned.
#[derive(Clone)]
pub struct BearerClient<S = BearerAuth> {
	http: ReqwestClient,
	manager: Arc<TokenManager>,
	signer: S,
}
impl BearerClient {
	/// Creates a client that sends tokens in the `Authorization` header.
	pub fn new(http: ReqwestClient, manager: Arc<TokenManager>) -> Self {
		Self { http, manager, signer: BearerAuth }
	}
}
impl<S> BearerClient<S>
where
	S: AccessTokenSigner<RequestBuilder>,
{
	/// Swaps the strategy used to attach tokens.
	pub fn with_signer<T>(self, signer: T) -> BearerClient<T>
	where
		T: AccessTokenSigner<RequestBuilder>,
	{
		BearerClient { http: self.http, manager: self.manager, signer }
	}

	/// Token manager backing this client.
	pub fn manager(&self) -> &Arc<TokenManager> {
		&self.manager
	}

	/// Starts a request; pass the builder to [`send`](Self::send) to dispatch it.
	pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
		self.http.request(method, url)
	}

	/// Shorthand for a `GET` [`request`](Self::request).
	pub fn get(&self, url: impl IntoUrl) -> RequestBuilder {
		self.request(Method::GET, url)
	}

	/// Signs and sends `request`.
	///
	/// Non-401 responses, error statuses included, are returned untouched.
	pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
		let replay = request.try_clone();
		let token = self.manager.get_access_token().await?;
		let response =
			self.signer.sign(request, &token).send().await.map_err(TransportError::from)?;

		if response.status() != StatusCode::UNAUTHORIZED {
			return Ok(response);
		}

		let Some(replay) = replay else {
			return Ok(response);
		};

		self.manager.invalidate(&token);

		let token = self.manager.get_access_token().await?;

		Ok(self.signer.sign(replay, &token).send().await.map_err(TransportError::from)?)
	}
}
impl<S> Debug for BearerClient<S> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerClient").field("manager", &self.manager).finish_non_exhaustive()
	}
}
