//! JWT based authentication: token issue/verify, the claims extractor used
//! by protected routes, and the account endpoints (register, login,
//! profile).

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts, State},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    models::{User, UserID},
    response::ApiResponse,
    stores::{NewUser, ProfilePatch, UserStore},
};

/// The contents of a JSON Web Token.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the authenticated user.
    pub sub: i64,
    /// The time the token was issued, as a unix timestamp.
    pub iat: i64,
    /// The expiry time of the token, as a unix timestamp.
    pub exp: i64,
}

impl Claims {
    /// The authenticated user's ID.
    pub fn user_id(&self) -> UserID {
        UserID::new(self.sub)
    }
}

impl<S> FromRequestParts<S> for Claims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::MissingToken)?;

        let state = AppState::from_ref(state);

        decode_token(bearer.token(), state.decoding_key())
    }
}

/// Sign a token for `user_id` that expires after `duration`.
///
/// # Errors
/// Returns [Error::TokenCreation] if signing fails.
pub fn encode_token(
    user_id: UserID,
    encoding_key: &EncodingKey,
    duration: Duration,
) -> Result<String, Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.as_i64(),
        iat: now.timestamp(),
        exp: (now + duration).timestamp(),
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|error| {
        tracing::error!("could not sign auth token: {}", error);
        Error::TokenCreation
    })
}

/// Verify a token and return its claims.
///
/// # Errors
/// Returns [Error::ExpiredToken] for tokens past their expiry and
/// [Error::InvalidToken] for everything else that fails verification.
pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|error| match error.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Error::ExpiredToken,
            _ => Error::InvalidToken,
        })
}

/// The credentials sent to the register and login endpoints.
///
/// Fields are optional so that missing input surfaces as a business error in
/// the response envelope rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// The sign-in name.
    pub username: Option<String>,
    /// The plaintext password. Never logged or stored.
    pub password: Option<String>,
    /// An optional display name, used at registration only.
    pub nickname: Option<String>,
}

/// The payload returned by register and login: the account plus a fresh
/// token.
#[derive(Serialize)]
pub struct AuthData {
    /// The account, without its password hash.
    pub user: User,
    /// A signed bearer token for subsequent requests.
    pub token: String,
}

/// The payload returned by the profile endpoints.
#[derive(Serialize)]
pub struct UserData {
    /// The account, without its password hash.
    pub user: User,
}

fn validate_credentials(credentials: &Credentials) -> Result<(String, String), Error> {
    let username = credentials
        .username
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_string();
    let password = credentials.password.clone().unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        return Err(Error::MissingCredentials);
    }

    Ok((username, password))
}

/// A route handler for registering a new account.
///
/// Returns the new account and a signed token so clients can skip a separate
/// login round trip.
pub async fn register(
    State(mut state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<ApiResponse<AuthData>, Error> {
    let (username, password) = validate_credentials(&credentials)?;

    let username_length = username.chars().count();
    if !(3..=50).contains(&username_length) {
        return Err(Error::InvalidUsername);
    }

    if password.chars().count() < 6 {
        return Err(Error::PasswordTooShort);
    }

    let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    let nickname = credentials
        .nickname
        .filter(|nickname| !nickname.trim().is_empty())
        .or_else(|| Some(username.clone()));

    let user = state.user_store.create(NewUser {
        username,
        password_hash,
        nickname,
    })?;

    let token = encode_token(user.id, state.encoding_key(), state.token_duration)?;

    Ok(ApiResponse::ok("registered", AuthData { user, token }))
}

/// A route handler for signing in with a username and password.
///
/// Unknown usernames and wrong passwords produce the same response, so the
/// endpoint cannot be used to probe which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<ApiResponse<AuthData>, Error> {
    let (username, password) = validate_credentials(&credentials)?;

    let user = state
        .user_store
        .get_by_username(&username)
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?;

    let password_is_correct = bcrypt::verify(&password, &user.password_hash)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(user.id, state.encoding_key(), state.token_duration)?;

    Ok(ApiResponse::ok("logged in", AuthData { user, token }))
}

/// A route handler for fetching the authenticated user's profile.
pub async fn get_current_user(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<ApiResponse<UserData>, Error> {
    let user = state
        .user_store
        .get_by_id(claims.user_id())
        .map_err(|error| match error {
            // The account behind a still-valid token may have been removed.
            Error::NotFound => Error::InvalidToken,
            error => error,
        })?;

    Ok(ApiResponse::ok("ok", UserData { user }))
}

/// The body of a profile update request.
#[derive(Debug, Deserialize)]
pub struct ProfileBody {
    /// A replacement display name.
    pub nickname: Option<String>,
    /// A replacement avatar URL.
    pub avatar: Option<String>,
}

/// A route handler for updating the authenticated user's profile.
pub async fn update_profile(
    State(mut state): State<AppState>,
    claims: Claims,
    Json(body): Json<ProfileBody>,
) -> Result<ApiResponse<UserData>, Error> {
    let user = state.user_store.update_profile(
        claims.user_id(),
        ProfilePatch {
            nickname: body.nickname,
            avatar: body.avatar,
        },
    )?;

    Ok(ApiResponse::ok("updated", UserData { user }))
}
