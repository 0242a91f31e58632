//! Axum routes protected by the auth layer.

// std
use std::sync::Arc;
// crates.io
use auth0_kit::{
	Algorithm, Audience, AuthLayer, RequireToken, SigningKey, TokenClaims, TokenVerifier,
};
use axum::{
	Router,
	body::Body,
	http::{Request, StatusCode, header::AUTHORIZATION},
	response::Response,
	routing::get,
};
use jsonwebtoken::{EncodingKey, Header};
use tower::ServiceExt;

const ISSUER: &str = "https://tenant.auth0.com/";
const AUDIENCE: &str = "https://api.example.com";
const SECRET: &str = "integration-signing-secret";

fn verifier() -> Arc<TokenVerifier> {
	Arc::new(
		TokenVerifier::new(ISSUER, AUDIENCE, Algorithm::HS256, &SigningKey::secret(SECRET))
			.expect("verifier"),
	)
}

fn token(aud: Audience, exp_offset: i64) -> String {
	let now = chrono::Utc::now().timestamp();
	let claims = TokenClaims {
		iss: ISSUER.into(),
		sub: "auth0|integration".into(),
		aud,
		iat: now,
		exp: now + exp_offset,
	};

	jsonwebtoken::encode(
		&Header::new(Algorithm::HS256),
		&claims,
		&EncodingKey::from_secret(SECRET.as_bytes()),
	)
	.expect("token")
}

fn app(requires_authentication: bool) -> Router {
	async fn me(RequireToken(claims): RequireToken) -> String {
		claims.sub
	}

	async fn health() -> &'static str {
		"ok"
	}

	Router::new()
		.route("/me", get(me))
		.route("/health", get(health))
		.layer(AuthLayer::new(verifier(), requires_authentication))
}

async fn call(app: Router, uri: &str, token: Option<&str>) -> Response {
	let mut builder = Request::builder().uri(uri);

	if let Some(token) = token {
		builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
	}

	app.oneshot(builder.body(Body::empty()).expect("request")).await.expect("infallible")
}

async fn body_text(response: Response) -> String {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");

	String::from_utf8(bytes.to_vec()).expect("utf-8")
}

#[tokio::test]
async fn handler_receives_verified_claims() {
	let _ = tracing_subscriber::fmt::try_init();

	let multi = Audience::Multiple(vec![AUDIENCE.into(), format!("{ISSUER}userinfo")]);
	let response = call(app(true), "/me", Some(&token(multi, 300))).await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_text(response).await, "auth0|integration");
}

#[tokio::test]
async fn required_mode_rejects_missing_token() {
	let _ = tracing_subscriber::fmt::try_init();

	let response = call(app(true), "/health", None).await;

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let body: serde_json::Value =
		serde_json::from_str(&body_text(response).await).expect("json body");

	assert_eq!(body["error"], "You're not authenticated.");
}

#[tokio::test]
async fn optional_mode_lets_anonymous_requests_reach_public_routes() {
	let _ = tracing_subscriber::fmt::try_init();

	let public = call(app(false), "/health", None).await;

	assert_eq!(public.status(), StatusCode::OK);

	let protected = call(app(false), "/me", None).await;

	assert_eq!(protected.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_tokens_are_rejected() {
	let _ = tracing_subscriber::fmt::try_init();

	for bad in [token(AUDIENCE.into(), -60), token("https://other.example.com".into(), 300)] {
		let response = call(app(false), "/me", Some(&bad)).await;

		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	}
}
