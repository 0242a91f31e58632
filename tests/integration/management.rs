//! Management API calls against a mocked tenant.

// crates.io
use auth0_kit::{Error, ManagementClient, Permission, Result, Role, Scope};
use serde_json::json;
use wiremock::{
	Mock, MockServer, ResponseTemplate,
	matchers::{body_json, header, method, path},
};

const CLIENT_ID: &str = "m2m-client";
const CLIENT_SECRET: &str = "m2m-secret";
const ACCESS_TOKEN: &str = "management-token";

async fn mount_token_endpoint(server: &MockServer, expected_grants: u64) {
	Mock::given(method("POST"))
		.and(path("/oauth/token"))
		.and(body_json(json!({
			"grant_type": "client_credentials",
			"client_id": CLIENT_ID,
			"client_secret": CLIENT_SECRET,
			"audience": format!("{}/api/v2/", server.uri()),
		})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"access_token": ACCESS_TOKEN,
			"token_type": "Bearer",
			"expires_in": 86400,
		})))
		.expect(expected_grants)
		.mount(server)
		.await;
}

fn client(server: &MockServer) -> Result<ManagementClient> {
	ManagementClient::builder(server.uri(), CLIENT_ID, CLIENT_SECRET).with_require_https(false).build()
}

#[tokio::test]
async fn get_token_performs_client_credentials_grant() -> Result<()> {
	let _ = tracing_subscriber::fmt::try_init();

	let server = MockServer::start().await;

	mount_token_endpoint(&server, 1).await;

	let token = client(&server)?.get_token().await?;

	assert_eq!(token, ACCESS_TOKEN);

	server.verify().await;
	Ok(())
}

#[tokio::test]
async fn get_roles_accepts_both_response_shapes() -> Result<()> {
	let _ = tracing_subscriber::fmt::try_init();

	let server = MockServer::start().await;

	mount_token_endpoint(&server, 2).await;
	Mock::given(method("GET"))
		.and(path("/api/v2/roles"))
		.and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([
			{ "id": "rol_1", "name": "admin", "description": "Administrators" }
		])))
		.up_to_n_times(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/api/v2/roles"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"roles": [{ "id": "rol_2", "name": "viewer", "description": null }],
			"start": 0,
			"limit": 50,
			"total": 1,
		})))
		.mount(&server)
		.await;

	let client = client(&server)?;
	let bare = client.get_roles().await?;
	let paged = client.get_roles().await?;

	assert_eq!(bare, vec![Role {
		id: "rol_1".into(),
		name: "admin".into(),
		description: "Administrators".into()
	}]);
	assert_eq!(paged, vec![Role {
		id: "rol_2".into(),
		name: "viewer".into(),
		description: String::new()
	}]);

	server.verify().await;
	Ok(())
}

#[tokio::test]
async fn create_role_posts_name_and_description() -> Result<()> {
	let _ = tracing_subscriber::fmt::try_init();

	let server = MockServer::start().await;

	mount_token_endpoint(&server, 1).await;
	Mock::given(method("POST"))
		.and(path("/api/v2/roles"))
		.and(body_json(json!({ "name": "editor", "description": "Can edit reports" })))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"id": "rol_3",
			"name": "editor",
			"description": "Can edit reports",
		})))
		.expect(1)
		.mount(&server)
		.await;

	let role = client(&server)?.create_role("editor", "Can edit reports").await?;

	assert_eq!(role.id, "rol_3");

	server.verify().await;
	Ok(())
}

#[tokio::test]
async fn delete_user_encodes_the_identifier() -> Result<()> {
	let _ = tracing_subscriber::fmt::try_init();

	let server = MockServer::start().await;

	mount_token_endpoint(&server, 1).await;
	Mock::given(method("DELETE"))
		.and(path("/api/v2/users/a%20b"))
		.respond_with(ResponseTemplate::new(204))
		.expect(1)
		.mount(&server)
		.await;

	client(&server)?.delete_user("a b").await?;

	server.verify().await;
	Ok(())
}

#[tokio::test]
async fn add_scopes_and_permissions_send_their_lists() -> Result<()> {
	let _ = tracing_subscriber::fmt::try_init();

	let server = MockServer::start().await;

	mount_token_endpoint(&server, 2).await;
	Mock::given(method("PATCH"))
		.and(path("/api/v2/resource-servers/api_123"))
		.and(body_json(json!({
			"scopes": [{ "value": "read:reports", "description": "Read reports" }]
		})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/api/v2/roles/rol_1/permissions"))
		.and(body_json(json!({
			"permissions": [{
				"resource_server_identifier": "https://api.example.com",
				"permission_name": "read:reports",
			}]
		})))
		.respond_with(ResponseTemplate::new(201))
		.expect(1)
		.mount(&server)
		.await;

	let client = client(&server)?;

	client.add_scopes(&[Scope::new("read:reports", "Read reports")], "api_123").await?;
	client
		.add_permissions(
			&[Permission::new("https://api.example.com", "read:reports")],
			"rol_1",
		)
		.await?;

	server.verify().await;
	Ok(())
}

#[tokio::test]
async fn upstream_failures_keep_their_status() -> Result<()> {
	let _ = tracing_subscriber::fmt::try_init();

	let server = MockServer::start().await;

	mount_token_endpoint(&server, 1).await;
	Mock::given(method("DELETE"))
		.and(path("/api/v2/users/missing"))
		.respond_with(ResponseTemplate::new(404).set_body_string("user not found"))
		.mount(&server)
		.await;

	let err = client(&server)?.delete_user("missing").await.unwrap_err();

	assert_eq!(err.status().map(|status| status.as_u16()), Some(404));
	assert!(matches!(err, Error::HttpStatus { body: Some(ref body), .. } if body == "user not found"));

	Ok(())
}

#[tokio::test]
async fn rejected_grant_fails_the_operation() -> Result<()> {
	let _ = tracing_subscriber::fmt::try_init();

	let server = MockServer::start().await;

	Mock::given(method("POST"))
		.and(path("/oauth/token"))
		.respond_with(ResponseTemplate::new(401).set_body_json(json!({
			"error": "access_denied",
			"error_description": "Unauthorized",
		})))
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/api/v2/roles"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
		.expect(0)
		.mount(&server)
		.await;

	let err = client(&server)?.get_roles().await.unwrap_err();

	assert_eq!(err.status().map(|status| status.as_u16()), Some(401));

	server.verify().await;
	Ok(())
}

#[tokio::test]
async fn token_cache_shares_one_grant() -> Result<()> {
	let _ = tracing_subscriber::fmt::try_init();

	let server = MockServer::start().await;

	mount_token_endpoint(&server, 1).await;
	Mock::given(method("GET"))
		.and(path("/api/v2/roles"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
		.expect(3)
		.mount(&server)
		.await;

	let client = ManagementClient::builder(server.uri(), CLIENT_ID, CLIENT_SECRET)
		.with_require_https(false)
		.with_token_cache(true)
		.build()?;

	for _ in 0..3 {
		assert!(client.get_roles().await?.is_empty());
	}

	server.verify().await;
	Ok(())
}
