use crate::application::forms::account::RegisterForm;
use crate::application::use_cases::auth::activate::{Activate, ActivationOutcome};
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::register::Register as RegisterUc;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::users::user::User;
use crate::presentation::http::error::ApiError;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_true")]
    pub send_messages: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub send_messages: bool,
    pub is_activated: bool,
    pub date_joined: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            send_messages: u.send_messages,
            is_activated: u.is_activated,
            date_joined: u.date_joined,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterDoneResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivationResponse {
    /// `activation_done`, `activation_done_earlier` or `activation_failed`
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserResponse,
}

const SESSION_PURPOSE: &str = "session";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Always `session`; activation signs carry another purpose.
    pub purpose: String,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/register/done", get(register_done))
        .route("/activate/:sign", get(activate))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .with_state(ctx)
}

const REGISTER_DONE_MESSAGE: &str =
    "Registration complete. An activation letter has been sent to the email address you provided.";

#[utoipa::path(post, path = "/api/accounts/register", tag = "Accounts", request_body = RegisterRequest, security(()), responses(
    (status = 201, body = RegisterResponse),
    (status = 422, description = "Invalid form")
))]
pub async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let repo = ctx.user_repo();
    let notifier = ctx.activation_notifier();
    let signer = ctx.activation_signer();
    let base_url = ctx.cfg.site_base_url();
    let uc = RegisterUc {
        repo: repo.as_ref(),
        notifier: notifier.as_ref(),
        signer: &signer,
        base_url: &base_url,
    };
    let form = RegisterForm {
        username: req.username,
        email: req.email,
        password1: req.password1,
        password2: req.password2,
        first_name: req.first_name,
        last_name: req.last_name,
        send_messages: req.send_messages,
    };
    let user = uc.execute(&form).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: user.into(),
            message: REGISTER_DONE_MESSAGE.into(),
        }),
    ))
}

#[utoipa::path(get, path = "/api/accounts/register/done", tag = "Accounts", security(()), responses(
    (status = 200, body = RegisterDoneResponse)
))]
pub async fn register_done() -> Json<RegisterDoneResponse> {
    Json(RegisterDoneResponse {
        message: REGISTER_DONE_MESSAGE.into(),
    })
}

#[utoipa::path(get, path = "/api/accounts/activate/{sign}", tag = "Accounts", security(()),
    params(("sign" = String, Path, description = "Signed activation token")),
    responses(
        (status = 200, body = ActivationResponse),
        (status = 400, body = ActivationResponse),
        (status = 404, description = "User no longer exists")
    ))]
pub async fn activate(
    State(ctx): State<AppContext>,
    Path(sign): Path<String>,
) -> Result<(StatusCode, Json<ActivationResponse>), ApiError> {
    let repo = ctx.user_repo();
    let signer = ctx.activation_signer();
    let uc = Activate {
        repo: repo.as_ref(),
        signer: &signer,
    };
    let outcome = uc.execute(&sign).await?.ok_or(ApiError::NotFound)?;
    let (status, code, message) = match outcome {
        ActivationOutcome::Activated => (
            StatusCode::OK,
            "activation_done",
            "Your account has been activated.",
        ),
        ActivationOutcome::AlreadyActivated => (
            StatusCode::OK,
            "activation_done_earlier",
            "This account was activated earlier.",
        ),
        ActivationOutcome::Failed => (
            StatusCode::BAD_REQUEST,
            "activation_failed",
            "Activation failed: the link is invalid or has expired.",
        ),
    };
    Ok((
        status,
        Json(ActivationResponse {
            status: code.into(),
            message: message.into(),
        }),
    ))
}

#[utoipa::path(post, path = "/api/accounts/login", tag = "Accounts", request_body = LoginRequest, security(()), responses(
    (status = 200, body = LoginResponse),
    (status = 401, description = "Wrong credentials or inactive account")
))]
pub async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        username: req.username,
        password: req.password,
    };
    let user = uc.execute(&dto).await?.ok_or(ApiError::Unauthorized)?;
    let token = issue_token(&ctx.cfg, user.id)?;

    // Set HttpOnly cookie with the access token
    let mut headers = HeaderMap::new();
    let cookie = build_access_cookie(&token, ctx.cfg.jwt_expires_secs, ctx.cfg.secure_cookies());
    headers.insert(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_str(&cookie)
            .unwrap_or(axum::http::HeaderValue::from_static("")),
    );
    tracing::info!(user_id = %user.id, "user_logged_in");

    Ok((
        headers,
        Json(LoginResponse {
            access_token: token,
            user: user.into(),
        }),
    ))
}

pub fn issue_token(cfg: &Config, user_id: Uuid) -> anyhow::Result<String> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        purpose: SESSION_PURPOSE.to_string(),
        exp: now + (cfg.jwt_expires_secs.max(0) as usize),
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret_pem.as_bytes()),
    )?;
    Ok(token)
}

// --- Bearer extractor & JWT utils ---
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // 1) Prefer Authorization header if present
        if let Some(auth) = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(t) = auth.strip_prefix("Bearer ") {
                return Ok(Bearer(t.to_string()));
            }
        }

        // 2) Fallback to HttpOnly cookie `access_token`
        if let Some(cookie_hdr) = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(token) = get_cookie(cookie_hdr, "access_token") {
                return Ok(Bearer(token));
            }
        }

        Err(ApiError::Unauthorized)
    }
}

/// Id of the user a session token was issued to.
pub(crate) fn session_user_id(cfg: &Config, token: &str) -> Result<Uuid, ApiError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret_pem.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized)?;
    if data.claims.purpose != SESSION_PURPOSE {
        return Err(ApiError::Unauthorized);
    }
    Uuid::parse_str(&data.claims.sub).map_err(|_| ApiError::Unauthorized)
}

/// The active account behind the request's session token. Tokens of
/// deleted or deactivated accounts are rejected with 401.
pub struct CurrentUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppContext> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let Bearer(token) = Bearer::from_request_parts(parts, ctx).await?;
        let user_id = session_user_id(&ctx.cfg, &token)?;
        match ctx.user_repo().find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(CurrentUser(user)),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

// --- Cookie helpers & logout ---

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

fn build_access_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "access_token={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        token,
        secure_attr,
        max_age_secs.max(0)
    )
}

pub(crate) fn expired_cookie_headers(cfg: &Config) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let cookie = if cfg.secure_cookies() {
        "access_token=; HttpOnly; Secure; Path=/; Max-Age=0; SameSite=Lax"
    } else {
        "access_token=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax"
    };
    headers.insert(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_static(cookie),
    );
    headers
}

#[utoipa::path(post, path = "/api/accounts/logout", tag = "Accounts", responses((status = 204)))]
pub async fn logout(State(ctx): State<AppContext>) -> (HeaderMap, StatusCode) {
    (expired_cookie_headers(&ctx.cfg), StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::signing::ActivationSigner;

    #[test]
    fn reads_named_cookie() {
        let hdr = "theme=dark; access_token=abc.def ; other=1";
        assert_eq!(get_cookie(hdr, "access_token").as_deref(), Some("abc.def"));
        assert_eq!(get_cookie(hdr, "missing"), None);
    }

    fn cfg() -> Config {
        Config {
            api_port: 8888,
            frontend_url: None,
            database_url: String::new(),
            jwt_secret_pem: "unit-secret".into(),
            jwt_expires_secs: 60,
            activation_expires_secs: 60,
            uploads_dir: "./uploads".into(),
            pages_dir: "./pages".into(),
            upload_max_bytes: 1024,
            public_base_url: None,
            listings_per_page: 2,
            latest_listings_limit: 10,
            is_production: false,
        }
    }

    #[test]
    fn session_tokens_round_trip() {
        let cfg = cfg();
        let id = Uuid::new_v4();
        let token = issue_token(&cfg, id).unwrap();
        assert_eq!(session_user_id(&cfg, &token).unwrap(), id);
    }

    #[test]
    fn activation_signs_are_not_sessions() {
        let cfg = cfg();
        let id = Uuid::new_v4();
        let sign = ActivationSigner::new(cfg.jwt_secret_pem.clone(), 60)
            .sign(&id.to_string())
            .unwrap();
        assert!(matches!(
            session_user_id(&cfg, &sign),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn access_cookie_attributes() {
        let c = build_access_cookie("tok", 60, true);
        assert!(c.starts_with("access_token=tok; HttpOnly; Secure;"));
        assert!(c.contains("Max-Age=60"));
        let c = build_access_cookie("tok", -5, false);
        assert!(!c.contains("Secure"));
        assert!(c.contains("Max-Age=0"));
    }
}
