//! Sign-in, sign-up and the locally known session

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{AuthResponse, Role, SignInData, SignUpData, User};

/// Create a company and its first admin account, then keep the issued tokens.
pub async fn signup(client: &ApiClient, data: &SignUpData) -> Result<AuthResponse, ApiError> {
    let auth: AuthResponse = client
        .fetch(ApiRequest::post("/auth/admin/signup/").json(data)?)
        .await?;
    client.tokens().set_pair(&auth.access, &auth.refresh);
    tracing::info!("Signed up as {}", auth.user.login_id);
    Ok(auth)
}

/// Sign in with an email or login ID, then keep the issued tokens.
pub async fn signin(client: &ApiClient, data: &SignInData) -> Result<AuthResponse, ApiError> {
    let auth: AuthResponse = client
        .fetch(ApiRequest::post("/auth/signin/").json(data)?)
        .await?;
    client.tokens().set_pair(&auth.access, &auth.refresh);
    tracing::info!("Signed in as {}", auth.user.login_id);
    Ok(auth)
}

/// Forget both tokens. Nothing is sent to the server.
pub fn signout(client: &ApiClient) {
    client.tokens().clear();
}

pub fn is_authenticated(client: &ApiClient) -> bool {
    client.tokens().access().is_some()
}

/// Claims carried in the access token payload.
#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    user_id: serde_json::Value,
    #[serde(default)]
    login_id: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    role: serde_json::Value,
}

/// User described by the stored access token, without asking the server.
///
/// The signature is not verified; this is for display only.
pub fn current_user(client: &ApiClient) -> Option<User> {
    let token = client.tokens().access()?;
    match decode_claims(&token) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!("Failed to decode access token: {}", e);
            None
        }
    }
}

fn decode_claims(token: &str) -> Result<User, String> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| "token has no payload segment".to_string())?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| e.to_string())?;
    let claims: Claims = serde_json::from_slice(&bytes).map_err(|e| e.to_string())?;

    let id = match claims.user_id {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };
    // Unrecognised roles get the least privileged one.
    let role = serde_json::from_value::<Role>(claims.role).unwrap_or_default();
    Ok(User {
        id,
        login_id: claims.login_id.unwrap_or_default(),
        company_name: claims.company_name.unwrap_or_default(),
        full_name: claims.full_name.unwrap_or_default(),
        email: claims.email.unwrap_or_default(),
        phone: claims.phone.unwrap_or_default(),
        role,
    })
}
