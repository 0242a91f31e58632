//! Access-token verification against a configured issuer, audience, and signing key.

// std
use std::fmt::{Debug, Formatter, Result as FmtResult};
// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, Validation, jwk::JwkSet};
use serde::Deserialize;
use url::Url;
// self
use crate::{_prelude::*, endpoint, error::AuthError, token::TokenClaims};

/// Claims every accepted token must carry.
const REQUIRED_CLAIMS: [&str; 4] = ["exp", "iss", "aud", "sub"];

/// Key material used to check token signatures.
#[derive(Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SigningKey {
	/// Shared HMAC secret (`HS256`/`HS384`/`HS512`).
	Secret {
		/// Raw secret bytes, as configured.
		secret: String,
	},
	/// PEM-encoded RSA public key.
	RsaPem {
		/// PEM document.
		pem: String,
	},
	/// PEM-encoded EC public key.
	EcPem {
		/// PEM document.
		pem: String,
	},
	/// PEM-encoded Ed25519 public key.
	EdPem {
		/// PEM document.
		pem: String,
	},
	/// JWK set; the key is chosen by the token header's `kid`.
	Jwks {
		/// Tenant signing keys, usually fetched from `/.well-known/jwks.json`.
		jwks: JwkSet,
	},
}
impl SigningKey {
	/// Shared HMAC secret.
	pub fn secret(secret: impl Into<String>) -> Self {
		Self::Secret { secret: secret.into() }
	}

	/// PEM-encoded RSA public key.
	pub fn rsa_pem(pem: impl Into<String>) -> Self {
		Self::RsaPem { pem: pem.into() }
	}

	fn to_keys(&self) -> Result<KeyStore> {
		let store = match self {
			Self::Secret { secret } => KeyStore::Single(DecodingKey::from_secret(secret.as_bytes())),
			Self::RsaPem { pem } => KeyStore::Single(DecodingKey::from_rsa_pem(pem.as_bytes())?),
			Self::EcPem { pem } => KeyStore::Single(DecodingKey::from_ec_pem(pem.as_bytes())?),
			Self::EdPem { pem } => KeyStore::Single(DecodingKey::from_ed_pem(pem.as_bytes())?),
			Self::Jwks { jwks } => {
				let mut keys = Vec::with_capacity(jwks.keys.len());

				for jwk in &jwks.keys {
					keys.push((jwk.common.key_id.clone(), DecodingKey::from_jwk(jwk)?));
				}
				if keys.is_empty() {
					return Err(Error::Validation {
						field: "signing_key.jwks",
						reason: "Must contain at least one key.".into(),
					});
				}

				KeyStore::Set(keys)
			},
		};

		Ok(store)
	}
}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		match self {
			Self::Secret { .. } => f.write_str("SigningKey::Secret(..)"),
			Self::RsaPem { .. } => f.write_str("SigningKey::RsaPem(..)"),
			Self::EcPem { .. } => f.write_str("SigningKey::EcPem(..)"),
			Self::EdPem { .. } => f.write_str("SigningKey::EdPem(..)"),
			Self::Jwks { jwks } => write!(f, "SigningKey::Jwks({} keys)", jwks.keys.len()),
		}
	}
}

enum KeyStore {
	Single(DecodingKey),
	Set(Vec<(Option<String>, DecodingKey)>),
}
impl KeyStore {
	fn select(&self, token: &str) -> std::result::Result<&DecodingKey, AuthError> {
		let keys = match self {
			Self::Single(key) => return Ok(key),
			Self::Set(keys) => keys,
		};
		let kid = jsonwebtoken::decode_header(token)?.kid;

		match kid.as_deref() {
			Some(kid) => keys
				.iter()
				.find(|(id, _)| id.as_deref() == Some(kid))
				.map(|(_, key)| key)
				.ok_or(AuthError::UnknownKey(Some(kid.to_owned()))),
			None if keys.len() == 1 => Ok(&keys[0].1),
			None => Err(AuthError::UnknownKey(None)),
		}
	}
}

/// Validates bearer tokens and returns their [`TokenClaims`].
///
/// Verification is a pure function of the token, the issuer, the audience, and the key.
pub struct TokenVerifier {
	issuer: Url,
	audience: String,
	keys: KeyStore,
	validation: Validation,
}
impl TokenVerifier {
	/// Build a verifier for `issuer` and `audience`.
	///
	/// The issuer is normalised to a single trailing slash, matching the `iss` claim Auth0 emits.
	pub fn new(
		issuer: &str,
		audience: impl Into<String>,
		algorithm: Algorithm,
		key: &SigningKey,
	) -> Result<Self> {
		let issuer = endpoint::normalize_base_url(issuer)?;
		let audience = audience.into();

		if audience.is_empty() {
			return Err(Error::Validation { field: "audience", reason: "Must not be empty.".into() });
		}

		let mut validation = Validation::new(algorithm);

		validation.leeway = 0;
		// `exp` must lie strictly in the future; the upstream check alone admits `exp == now`.
		validation.reject_tokens_expiring_in_less_than = 1;
		validation.set_issuer(&[issuer.as_str()]);
		validation.set_audience(&[audience.as_str()]);
		validation.set_required_spec_claims(&REQUIRED_CLAIMS);

		Ok(Self { issuer, audience, keys: key.to_keys()?, validation })
	}

	/// Allow `leeway` of clock skew when checking `exp`.
	pub fn with_leeway(mut self, leeway: Duration) -> Self {
		self.validation.leeway = leeway.as_secs();

		self
	}

	/// Normalised issuer URL.
	pub fn issuer(&self) -> &Url {
		&self.issuer
	}

	/// Expected audience.
	pub fn audience(&self) -> &str {
		&self.audience
	}

	/// Verify signature, issuer, audience, and expiry, returning the decoded claims.
	pub fn verify(&self, token: &str) -> Result<TokenClaims> {
		let outcome = self.verify_inner(token);

		#[cfg(feature = "metrics")]
		crate::metrics::record_verification(outcome.as_ref().err());

		match outcome {
			Ok(claims) => {
				tracing::debug!(sub = %claims.sub, "access token verified");

				Ok(claims)
			},
			Err(err) => {
				tracing::debug!(reason = %err, "access token rejected");

				Err(err.into())
			},
		}
	}

	fn verify_inner(&self, token: &str) -> std::result::Result<TokenClaims, AuthError> {
		if token.trim().is_empty() {
			return Err(AuthError::MissingToken);
		}

		let key = self.keys.select(token)?;
		let data = jsonwebtoken::decode::<TokenClaims>(token, key, &self.validation)?;

		Ok(data.claims)
	}
}
impl Debug for TokenVerifier {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		let keys = match &self.keys {
			KeyStore::Single(_) => 1,
			KeyStore::Set(keys) => keys.len(),
		};

		f.debug_struct("TokenVerifier")
			.field("issuer", &self.issuer.as_str())
			.field("audience", &self.audience)
			.field("algorithms", &self.validation.algorithms)
			.field("keys", &keys)
			.finish()
	}
}
