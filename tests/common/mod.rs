#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
use time::{OffsetDateTime, macros};
// self
use oauth2_bearer::{
	grant::{GrantConfig, GrantConfigBuilder},
	http::ReqwestHttpClient,
	reqwest::Client,
	url::Url,
};

pub const NOW: OffsetDateTime = macros::datetime!(2025-01-01 00:00 UTC);

/// Builds a reqwest client that accepts the self-signed certificates produced by `httpmock`.
pub fn test_reqwest_client() -> Client {
	Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.")
}

/// Token endpoint transport on top of [`test_reqwest_client`].
pub fn test_http_client() -> ReqwestHttpClient {
	ReqwestHttpClient::with_client(test_reqwest_client())
}

/// Starts a grant config pointing at the mock server's `/token` endpoint.
pub fn config_builder(server: &MockServer) -> GrantConfigBuilder {
	GrantConfig::builder("client-id")
		.client_secret("client-secret")
		.token_endpoint(Url::parse(&server.url("/token")).expect("Mock token endpoint should parse."))
}

pub fn token_body(access_token: &str, expires_in: u64) -> String {
	format!(
		"{{\"access_token\":\"{access_token}\",\"token_type\":\"bearer\",\"expires_in\":{expires_in}}}"
	)
}
