//! Fetches a protected resource with a client-credentials token.
//!
//! ```sh
//! TOKEN_URL=https://auth.example.com/oauth/token \
//! CLIENT_ID=demo CLIENT_SECRET=secret \
//! API_URL=https://api.example.com/me \
//! cargo run --example bearer_client
//! ```

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::WrapErr};
use oauth2_bearer::{
	client::BearerClient,
	grant::{ClientCredentialsGrant, GrantConfig, ScopeSet},
	manager::TokenManager,
	reqwest::Client,
	url::Url,
};
use time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let token_url = Url::parse(&env::var("TOKEN_URL").wrap_err("TOKEN_URL must be set")?)?;
	let scope = env::var("SCOPE").unwrap_or_default().parse::<ScopeSet>()?;
	let config = GrantConfig::builder(env::var("CLIENT_ID").wrap_err("CLIENT_ID must be set")?)
		.client_secret(env::var("CLIENT_SECRET").wrap_err("CLIENT_SECRET must be set")?)
		.token_endpoint(token_url)
		.scope(scope)
		.build()?;
	let manager = TokenManager::new(Arc::new(ClientCredentialsGrant::new(&config)?))
		.with_refresh_window(Duration::seconds(30));
	let client = BearerClient::new(Client::new(), Arc::new(manager));
	let response = client
		.send(client.get(env::var("API_URL").wrap_err("API_URL must be set")?))
		.await?;

	println!("{} {}", response.status(), response.text().await?);
	println!("{:?}", client.manager().metrics());

	Ok(())
}
