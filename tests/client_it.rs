#![cfg(feature = "reqwest")]

mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use common::{config_builder, test_http_client, test_reqwest_client, token_body};
use oauth2_bearer::{
	client::BearerClient,
	grant::{ClientCredentialsGrant, NullGrant},
	manager::TokenManager,
	reqwest::StatusCode,
	signer::QueryString,
};

fn managed_client(server: &MockServer) -> BearerClient {
	let config = config_builder(server).build().expect("Config should build.");
	let grant = ClientCredentialsGrant::with_http_client(&config, test_http_client())
		.expect("Grant should build.");

	BearerClient::new(test_reqwest_client(), Arc::new(TokenManager::new(Arc::new(grant))))
}

#[tokio::test]
async fn requests_carry_the_managed_bearer_token() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("api-token", 3600));
		})
		.await;
	let resource = server
		.mock_async(|when, then| {
			when.method(GET).path("/me").header("authorization", "Bearer api-token");
			then.status(200).body("hello");
		})
		.await;
	let client = managed_client(&server);

	for _ in 0..2 {
		let response = client
			.send(client.get(server.url("/me")))
			.await
			.expect("Signed request should be sent.");

		assert_eq!(response.status(), StatusCode::OK);
	}

	token.assert_calls_async(1).await;
	resource.assert_calls_async(2).await;
}

#[tokio::test]
async fn unauthorized_responses_retry_once_with_a_fresh_token() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("fresh-token", 3600));
		})
		.await;
	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/me").header("authorization", "Bearer revoked-token");
			then.status(401);
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(GET).path("/me").header("authorization", "Bearer fresh-token");
			then.status(200);
		})
		.await;
	let client = managed_client(&server);

	client.manager().set_access_token("revoked-token").expect("Bare strings should be accepted.");

	let response =
		client.send(client.get(server.url("/me"))).await.expect("Retried request should be sent.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		client.manager().current_token().map(|token| token.access_token().expose().to_owned()),
		Some("fresh-token".to_owned())
	);

	token.assert_calls_async(1).await;
	rejected.assert_calls_async(1).await;
	accepted.assert_calls_async(1).await;
}

#[tokio::test]
async fn persistent_unauthorized_responses_are_returned_after_one_retry() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("still-rejected", 3600));
		})
		.await;
	let resource = server
		.mock_async(|when, then| {
			when.method(GET).path("/me");
			then.status(401);
		})
		.await;
	let client = managed_client(&server);
	let response =
		client.send(client.get(server.url("/me"))).await.expect("Request should be sent.");

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	token.assert_calls_async(2).await;
	resource.assert_calls_async(2).await;
}

#[tokio::test]
async fn query_string_signer_appends_the_token() {
	let server = MockServer::start_async().await;
	let resource = server
		.mock_async(|when, then| {
			when.method(GET).path("/feed").query_param("token", "preset-token");
			then.status(204);
		})
		.await;
	let manager = Arc::new(TokenManager::new(Arc::new(NullGrant)));

	manager.set_access_token("preset-token").expect("Bare strings should be accepted.");

	let client =
		BearerClient::new(test_reqwest_client(), manager).with_signer(QueryString::new("token"));
	let response =
		client.send(client.get(server.url("/feed"))).await.expect("Signed request should be sent.");

	assert_eq!(response.status(), StatusCode::NO_CONTENT);

	resource.assert_async().await;
}

#[tokio::test]
async fn grant_failures_surface_before_sending() {
	let server = MockServer::start_async().await;
	let resource = server
		.mock_async(|when, then| {
			when.method(GET).path("/me");
			then.status(200);
		})
		.await;
	let manager = Arc::new(TokenManager::new(Arc::new(NullGrant)));
	let client = BearerClient::new(test_reqwest_client(), manager);

	assert!(client.send(client.get(server.url("/me"))).await.is_err());

	resource.assert_calls_async(0).await;
}
