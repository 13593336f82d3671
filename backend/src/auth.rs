use crate::error::AppError;
use crate::routes::AppState;
use crate::store::Store;
use axum::{
    extract::{Json, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
// password hashing (argon2)
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterReq>,
) -> Result<(StatusCode, Json<RegisterResp>), AppError> {
    let username = create_account(&state.store, &payload.username, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(RegisterResp { username })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginReq>,
) -> Result<(StatusCode, Json<LoginResp>), AppError> {
    let username = payload.username.trim();
    match authenticate(&state.store, username, &payload.password).await? {
        Access::Denied => {
            tracing::warn!(username, "login denied");
            return Err(AppError::Unauthorized("invalid username or password".into()));
        }
        Access::Allowed => {}
    }
    // first login creates the budget from the defaults
    state.store.ensure_budget(username).await?;
    let token = state.keys.issue(username)?;
    tracing::info!(username, "login");
    Ok((
        StatusCode::OK,
        Json(LoginResp {
            username: username.to_string(),
            token,
        }),
    ))
}

/// Create an account with a salted Argon2 password hash. Returns the
/// stored (trimmed) username.
pub async fn create_account(store: &Store, username: &str, password: &str) -> Result<String, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::InvalidInput("username must not be empty".into()));
    }
    if username.chars().any(char::is_control) {
        return Err(AppError::InvalidInput("username contains control characters".into()));
    }
    if password.is_empty() {
        return Err(AppError::InvalidInput("password must not be empty".into()));
    }
    let password_hash = hash_password(password)
        .map_err(|e| AppError::Internal(format!("hash error: {e}")))?;
    store.create_user(username, &password_hash).await?;
    Ok(username.to_string())
}

/// Unknown usernames are denied the same way as wrong passwords.
pub async fn authenticate(store: &Store, username: &str, password: &str) -> Result<Access, AppError> {
    let Some(stored) = store.password_hash(username.trim()).await? else {
        return Ok(Access::Denied);
    };
    let is_valid = verify_password(password, &stored)
        .map_err(|e| AppError::Internal(format!("verify error: {e}")))?;
    Ok(if is_valid { Access::Allowed } else { Access::Denied })
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(
    password: &str,
    stored_hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored_hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Signing material and lifetime for login tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> anyhow::Result<Self> {
        let ttl = Duration::try_hours(ttl_hours)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| anyhow::anyhow!("token lifetime of {ttl_hours} hours is out of range"))?;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn issue(&self, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("token expiry out of range".into()))?;
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("jwt encode error: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| AppError::Unauthorized(format!("invalid token: {e}")))?;
        Ok(data.claims)
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing Authorization header".into()))?;

    let token = auth
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("invalid Authorization scheme".into()))?;

    let claims = state.keys.verify(token)?;
    req.extensions_mut().insert(AuthUser {
        username: claims.sub,
    });

    Ok(next.run(req).await)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize,
    pub iat: usize,
    /// username
    pub sub: String,
}

#[derive(Deserialize)]
pub struct RegisterReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResp {
    pub username: String,
}

#[derive(Deserialize)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResp {
    pub token: String,
    pub username: String,
}

#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}
