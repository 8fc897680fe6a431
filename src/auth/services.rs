use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

pub(crate) use crate::auth::claims::{Claims, TokenKind};
use crate::auth::dto::{RegisterRequest, TokenPair, UpdateProfileRequest};
use crate::auth::password::MIN_PASSWORD_LEN;
use crate::auth::repo_types::{ProfileChanges, User};
use crate::config::JwtConfig;
use crate::error::FieldErrors;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[\w.@+-]{1,150}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

/// Username derived from an email's local part, for accounts created by social login.
pub(crate) fn username_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let cleaned: String = local
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'))
        .take(140)
        .collect();
    if cleaned.is_empty() {
        "user".into()
    } else {
        cleaned
    }
}

/// Normalizes the registration payload in place and collects field errors.
pub(crate) fn validate_registration(payload: &mut RegisterRequest) -> FieldErrors {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    let mut errors = FieldErrors::new();
    if !is_valid_username(&payload.username) {
        errors.add(
            "username",
            "Enter a valid username of letters, digits and @/./+/-/_ only.",
        );
    }
    if !is_valid_email(&payload.email) {
        errors.add("email", "Enter a valid email address.");
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("Ensure this field has at least {MIN_PASSWORD_LEN} characters."),
        );
    }
    if payload.password != payload.password2 {
        errors.add("password", "Passwords do not match.");
    }
    errors
}

/// Applies a profile update onto the stored user. `require_username` is set for
/// PUT, where the username must be sent.
pub(crate) fn merge_profile(
    current: &User,
    req: UpdateProfileRequest,
    require_username: bool,
) -> Result<ProfileChanges, FieldErrors> {
    let mut errors = FieldErrors::new();
    let username = match req.username {
        Some(u) => {
            let u = u.trim().to_string();
            if !is_valid_username(&u) {
                errors.add(
                    "username",
                    "Enter a valid username of letters, digits and @/./+/-/_ only.",
                );
            }
            u
        }
        None if require_username => {
            errors.add("username", "This field is required.");
            current.username.clone()
        }
        None => current.username.clone(),
    };
    let avatar = match req.avatar {
        Some(v) => v.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
        None => current.avatar.clone(),
    };
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ProfileChanges {
        username,
        first_name: req.first_name.unwrap_or_else(|| current.first_name.clone()),
        last_name: req.last_name.unwrap_or_else(|| current.last_name.clone()),
        bio: req.bio.unwrap_or_else(|| current.bio.clone()),
        avatar,
    })
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::from_secs((cfg.ttl_minutes.max(1) as u64) * 60),
            refresh_ttl: Duration::from_secs((cfg.refresh_ttl_minutes.max(1) as u64) * 60),
        }
    }

    fn sign_with_kind(&self, user_id: Uuid, kind: TokenKind) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            jti: Uuid::new_v4(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_kind(user_id, TokenKind::Access)
    }
    pub fn sign_refresh(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_kind(user_id, TokenKind::Refresh)
    }

    pub fn issue_pair(&self, user_id: Uuid) -> anyhow::Result<TokenPair> {
        Ok(TokenPair {
            access: self.sign_access(user_id)?,
            refresh: self.sign_refresh(user_id)?,
        })
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Refresh {
            anyhow::bail!("not a refresh token");
        }
        Ok(claims)
    }
}

/// Expiry of a verified token as a timestamp, for the blacklist row.
pub(crate) fn expires_at(claims: &Claims) -> anyhow::Result<OffsetDateTime> {
    Ok(OffsetDateTime::from_unix_timestamp(claims.exp as i64)?)
}
