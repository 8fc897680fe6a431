use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{
            AccessResponse, AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse,
            RefreshRequest, RegisterRequest, SocialLoginRequest, SocialLoginResponse, SocialUser,
            UpdateProfileRequest, UserProfile,
        },
        extractors::AuthUser,
        google::ProviderError,
        password::{hash_password, matches_stored, MIN_PASSWORD_LEN},
        repo::{is_revoked, revoke_token},
        repo_types::{NewUser, User},
        services::{
            expires_at, is_valid_email, merge_profile, username_from_email, validate_registration,
            JwtKeys,
        },
    },
    error::{AppError, AppResult, FieldErrors},
    extract::AppJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/token/refresh", post(refresh))
        .route("/google", post(google_login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).put(put_me).patch(patch_me))
        .route("/change-password", post(change_password))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let mut errors = validate_registration(&mut payload);
    if errors.is_empty() {
        if User::username_taken(&state.db, &payload.username, None).await? {
            errors.add("username", "A user with that username already exists.");
        }
        if User::find_by_email(&state.db, &payload.email).await?.is_some() {
            errors.add("email", "A user with that email already exists.");
        }
    }
    if !errors.is_empty() {
        warn!(email = %payload.email, "registration rejected");
        return Err(AppError::Validation(errors));
    }

    let hash = hash_password(&payload.password)?;
    let first_name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    let user = User::create(
        &state.db,
        NewUser {
            username: &payload.username,
            email: &payload.email,
            password_hash: Some(&hash),
            first_name,
            last_name: "",
        },
    )
    .await?;

    let tokens = JwtKeys::from_ref(&state).issue_pair(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            tokens,
            message: "Account created successfully.",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation(FieldErrors::single(
            "email",
            "Enter a valid email address.",
        )));
    }

    let invalid = || AppError::Unauthorized("Invalid email or password.".into());

    let Some(user) = User::find_by_email(&state.db, &payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        return Err(invalid());
    };

    if !matches_stored(&payload.password, user.password_hash.as_deref())? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    let tokens = JwtKeys::from_ref(&state).issue_pair(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        user: user.into(),
        tokens,
        message: "Login successful.",
    }))
}

#[instrument(skip(state, payload))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<RefreshRequest>,
) -> AppResult<Json<MessageResponse>> {
    let invalid = || AppError::BadRequest("Invalid token.".into());

    let claims = JwtKeys::from_ref(&state)
        .verify_refresh(&payload.refresh)
        .map_err(|e| {
            warn!(error = %e, %user_id, "logout with unusable token");
            invalid()
        })?;
    if claims.sub != user_id {
        warn!(%user_id, token_owner = %claims.sub, "logout with someone else's token");
        return Err(invalid());
    }

    let exp = expires_at(&claims)?;
    if !revoke_token(&state.db, claims.jti, user_id, exp).await? {
        warn!(%user_id, jti = %claims.jti, "token already blacklisted");
        return Err(invalid());
    }

    info!(%user_id, jti = %claims.jti, "refresh token blacklisted");
    Ok(Json(MessageResponse {
        message: "Logout successful.",
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshRequest>,
) -> AppResult<Json<AccessResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh)
        .map_err(|_| AppError::InvalidToken("Token is invalid or expired".into()))?;

    if is_revoked(&state.db, claims.jti).await? {
        warn!(user_id = %claims.sub, jti = %claims.jti, "refresh with blacklisted token");
        return Err(AppError::InvalidToken("Token is blacklisted".into()));
    }
    if User::find_by_id(&state.db, claims.sub).await?.is_none() {
        return Err(AppError::InvalidToken("User not found".into()));
    }

    let access = keys.sign_access(claims.sub)?;
    Ok(Json(AccessResponse { access }))
}

async fn load_caller(state: &AppState, user_id: Uuid) -> AppResult<User> {
    User::find_by_id(&state.db, user_id).await?.ok_or_else(|| {
        error!(%user_id, "token subject has no user");
        AppError::Unauthorized("User not found".into())
    })
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(load_caller(&state, user_id).await?.into()))
}

#[instrument(skip(state, payload))]
pub async fn put_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    update_me(state, user_id, payload, true).await
}

#[instrument(skip(state, payload))]
pub async fn patch_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    update_me(state, user_id, payload, false).await
}

async fn update_me(
    state: AppState,
    user_id: Uuid,
    payload: UpdateProfileRequest,
    require_username: bool,
) -> AppResult<Json<UserProfile>> {
    let current = load_caller(&state, user_id).await?;
    let changes = merge_profile(&current, payload, require_username).map_err(AppError::Validation)?;

    if changes.username != current.username
        && User::username_taken(&state.db, &changes.username, Some(user_id)).await?
    {
        return Err(AppError::Validation(FieldErrors::single(
            "username",
            "A user with that username already exists.",
        )));
    }

    let user = User::update_profile(&state.db, user_id, &changes).await?;
    info!(%user_id, "profile updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = load_caller(&state, user_id).await?;

    let mut errors = FieldErrors::new();
    if !matches_stored(&payload.old_password, user.password_hash.as_deref())? {
        errors.add("old_password", "Old password is incorrect.");
    }
    if payload.new_password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "new_password",
            format!("Ensure this field has at least {MIN_PASSWORD_LEN} characters."),
        );
    }
    errors.into_result()?;

    let hash = hash_password(&payload.new_password)?;
    User::set_password(&state.db, user_id, &hash).await?;

    // Outstanding tokens stay valid.
    info!(%user_id, "password changed");
    Ok(Json(MessageResponse {
        message: "Password changed successfully.",
    }))
}

#[instrument(skip(state, payload))]
pub async fn google_login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SocialLoginRequest>,
) -> AppResult<Json<SocialLoginResponse>> {
    let token = payload
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Token required".into()))?;

    let identity = state.identity.verify(&token).await.map_err(|e| match e {
        ProviderError::Rejected(msg) => {
            warn!(reason = %msg, "google token rejected");
            AppError::BadRequest(msg)
        }
        ProviderError::Unavailable(e) => AppError::Internal(e),
    })?;

    let (user, created) = match User::find_by_email(&state.db, &identity.email).await? {
        Some(user) => (user, false),
        None => {
            let username = free_username(&state, &username_from_email(&identity.email)).await?;
            let user = User::create(
                &state.db,
                NewUser {
                    username: &username,
                    email: &identity.email,
                    password_hash: None,
                    first_name: &identity.first_name,
                    last_name: &identity.last_name,
                },
            )
            .await?;
            info!(user_id = %user.id, email = %user.email, "user created by social login");
            (user, true)
        }
    };

    let tokens = JwtKeys::from_ref(&state).issue_pair(user.id)?;
    info!(user_id = %user.id, created, "social login");
    Ok(Json(SocialLoginResponse {
        tokens,
        user: SocialUser {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
        },
        created,
    }))
}

/// `base` if unused, otherwise `base` plus a short random suffix.
async fn free_username(state: &AppState, base: &str) -> AppResult<String> {
    if !User::username_taken(&state.db, base, None).await? {
        return Ok(base.to_string());
    }
    for _ in 0..5 {
        let suffix = Uuid::new_v4().simple().to_string();
        let candidate = format!("{base}_{}", &suffix[..6]);
        if !User::username_taken(&state.db, &candidate, None).await? {
            return Ok(candidate);
        }
    }
    Err(AppError::Internal(anyhow::anyhow!(
        "could not find a free username for {base}"
    )))
}
