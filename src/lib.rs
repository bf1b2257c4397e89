//! OAuth 2.0 bearer-token lifecycle management: hold a token, hand it to every outgoing request,
//! and transparently re-run a pluggable grant when the token is missing or expired.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

#[cfg(feature = "reqwest")] pub mod client;
pub mod clock;
pub mod error;
pub mod grant;
pub mod http;
pub mod manager;
pub mod oauth;
pub mod obs;
pub mod signer;
pub mod store;
pub mod token;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::Result;
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
