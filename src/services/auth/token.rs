//! Access token (JWT, HMAC) issuance and verification.
//!
//! Claim set: `{ "userID": "<decimal id>", "expiredAt": <unix seconds> }`.
//!
//! Verification order:
//! 1. header decode (alg を取り出す)。jsonwebtoken が知らない alg (`none` など) も
//!    header の JSON から読んで UnexpectedAlgorithm にする
//! 2. key resolution: HMAC family 以外の alg はここで拒否する (algorithm confusion 対策)
//! 3. signature
//! 4. expiry (`now >= expiredAt` is expired)

use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("malformed token")]
    Malformed,
    #[error("token signature is invalid")]
    Signature,
    #[error("unexpected signing method: {0}")]
    UnexpectedAlgorithm(String),
    #[error("token is expired")]
    Expired,
}

/// `userID` claim could not be turned into a user id.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimError {
    #[error("missing 'userID' claim")]
    MissingSubject,
    #[error("invalid 'userID' claim (expected numeric string)")]
    InvalidSubject,
}

#[derive(Debug, Serialize)]
struct IssueClaims {
    #[serde(rename = "userID")]
    user_id: String,
    #[serde(rename = "expiredAt")]
    expired_at: i64,
}

/// Claims of a token that passed signature, algorithm and expiry checks.
///
/// `userID` is kept untyped here; `subject()` is the typed decoding step so a
/// bad subject is reported separately from a bad token.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "userID", default)]
    user_id: Option<serde_json::Value>,
    #[serde(rename = "expiredAt")]
    pub expired_at: i64,
}

impl AccessClaims {
    pub fn subject(&self) -> Result<i64, ClaimError> {
        match &self.user_id {
            None | Some(serde_json::Value::Null) => Err(ClaimError::MissingSubject),
            Some(serde_json::Value::String(s)) => {
                s.parse::<i64>().map_err(|_| ClaimError::InvalidSubject)
            }
            Some(_) => Err(ClaimError::InvalidSubject),
        }
    }
}

pub fn is_hmac(alg: Algorithm) -> bool {
    matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// `alg` as written in the header segment, without requiring jsonwebtoken to know it.
fn declared_alg(token: &str) -> Option<String> {
    let segment = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
    serde_json::from_slice::<RawHeader>(&bytes)
        .ok()
        .map(|header| header.alg)
}

fn header_error(token: &str) -> TokenError {
    match declared_alg(token) {
        Some(alg) if !matches!(alg.as_str(), "HS256" | "HS384" | "HS512") => {
            TokenError::UnexpectedAlgorithm(alg)
        }
        _ => TokenError::Malformed,
    }
}

/// Sign a new token for `user_id`, expiring `ttl_seconds` after `now`.
pub fn issue_at(
    secret: &[u8],
    user_id: i64,
    ttl_seconds: i64,
    now: i64,
) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::Signing("empty secret".to_string()));
    }

    let claims = IssueClaims {
        user_id: user_id.to_string(),
        expired_at: now.saturating_add(ttl_seconds),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Parse and verify `token` as of `now`.
///
/// `resolve_key` receives the algorithm declared in the token header and must
/// return an error for any algorithm it does not accept.
pub fn parse_at<F>(token: &str, resolve_key: F, now: i64) -> Result<AccessClaims, TokenError>
where
    F: FnOnce(Algorithm) -> Result<DecodingKey, TokenError>,
{
    let header = jsonwebtoken::decode_header(token).map_err(|_| header_error(token))?;
    let key = resolve_key(header.alg)?;

    // exp is checked below against the injected clock, under our own claim name.
    let mut validation = Validation::new(header.alg);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data =
        jsonwebtoken::decode::<AccessClaims>(token, &key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::Signature,
                ErrorKind::InvalidAlgorithm => {
                    TokenError::UnexpectedAlgorithm(format!("{:?}", header.alg))
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            },
        )?;

    if now >= data.claims.expired_at {
        return Err(TokenError::Expired);
    }

    Ok(data.claims)
}

/// Key resolver that only accepts the HMAC family.
pub fn hmac_resolver(secret: &[u8]) -> impl FnOnce(Algorithm) -> Result<DecodingKey, TokenError> {
    move |alg| {
        if !is_hmac(alg) {
            return Err(TokenError::UnexpectedAlgorithm(format!("{alg:?}")));
        }
        Ok(DecodingKey::from_secret(secret))
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Process-wide codec built once from `Config` (secret + ttl).
///
/// - Key material is intentionally not printable via Debug.
pub struct TokenCodec {
    secret: Vec<u8>,
    ttl_seconds: i64,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>, ttl_seconds: i64) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(TokenError::Signing("empty secret".to_string()));
        }
        Ok(Self {
            secret,
            ttl_seconds,
        })
    }

    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue_at(user_id, now_unix())
    }

    pub fn issue_at(&self, user_id: i64, now: i64) -> Result<String, TokenError> {
        issue_at(&self.secret, user_id, self.ttl_seconds, now)
    }

    pub fn parse(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.parse_at(token, now_unix())
    }

    pub fn parse_at(&self, token: &str, now: i64) -> Result<AccessClaims, TokenError> {
        parse_at(token, hmac_resolver(&self.secret), now)
    }
}
