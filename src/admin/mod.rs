// src/admin/mod.rs
//! Client for the hosted auth / admin-function backend.
//!
//! The client is built once from [`BackendConfig`] and handed to whatever
//! needs it. Request and response bodies belong to the remote service; this
//! module only shapes requests and surfaces failures.

mod users;

pub use users::{
    render_users, users_from_payload, AdminUser, Credentials, InputError, NewUser,
    MIN_PASSWORD_LEN,
};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_FUNCTION: &str = "admin-create-user";

/// Where the backend lives and which function manages users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: Option<Url>,
    pub anon_key: Option<String>,
    pub function: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            function: DEFAULT_FUNCTION.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("backend not configured: missing {0}")]
    NotConfigured(&'static str),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),

    /// The service answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Remote { status: StatusCode, message: String },

    #[error("sign-in failed: no session returned")]
    NoSession,
}

/// Authenticated session from a password sign-in.
#[derive(Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

pub struct AdminClient {
    http: Client,
    base: Url,
    anon_key: String,
    function: String,
    session: Option<Session>,
}

impl AdminClient {
    pub fn new(http: Client, config: &BackendConfig) -> Result<Self, AdminError> {
        let mut base = config
            .url
            .clone()
            .ok_or(AdminError::NotConfigured("backend url"))?;
        let anon_key = config
            .anon_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AdminError::NotConfigured("anon key"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http,
            base,
            anon_key,
            function: config.function.clone(),
            session: None,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        let token = self
            .session
            .as_ref()
            .map(|s| s.access_token.as_str())
            .unwrap_or(self.anon_key.as_str());
        req.header("apikey", &self.anon_key).bearer_auth(token)
    }

    /// Password sign-in; the session is kept for later calls.
    pub async fn sign_in(&mut self, credentials: &Credentials) -> Result<&Session, AdminError> {
        let mut url = self.base.join("auth/v1/token")?;
        url.set_query(Some("grant_type=password"));
        debug!(email = %credentials.email(), "signing in");

        let resp = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;
        let body = read_body(resp).await?;

        let has_token = body
            .get("access_token")
            .and_then(Value::as_str)
            .is_some_and(|t| !t.is_empty());
        if !has_token {
            return Err(AdminError::NoSession);
        }
        let session: Session = serde_json::from_value(body).map_err(|_| AdminError::NoSession)?;
        info!(email = %credentials.email(), "signed in");
        Ok(&*self.session.insert(session))
    }

    /// Call the admin function with `body` and return its JSON reply.
    pub async fn invoke(&self, body: &Value) -> Result<Value, AdminError> {
        let url = self
            .base
            .join(&format!("functions/v1/{}", self.function))?;
        debug!(function = %self.function, "invoking admin function");
        let resp = self
            .authorized(self.http.post(url))
            .json(body)
            .send()
            .await?;
        read_body(resp).await
    }

    pub async fn list_users(&self) -> Result<Vec<AdminUser>, AdminError> {
        let payload = self.invoke(&json!({ "action": "list" })).await?;
        let users = users_from_payload(&payload);
        info!(count = users.len(), "listed users");
        Ok(users)
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<Value, AdminError> {
        let reply = self
            .invoke(&json!({
                "action": "create",
                "email": user.email,
                "password": user.password,
                "full_name": user.full_name,
                "is_active": user.is_active,
            }))
            .await?;
        info!(email = %user.email, "user created");
        Ok(reply)
    }
}

/// Decode a reply; non-success statuses become [`AdminError::Remote`].
async fn read_body(resp: Response) -> Result<Value, AdminError> {
    let status = resp.status();
    let text = resp.text().await?;
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    if status.is_success() {
        return Ok(body);
    }
    Err(AdminError::Remote {
        status,
        message: error_message(&body, status),
    })
}

fn error_message(body: &Value, status: StatusCode) -> String {
    ["error_description", "message", "msg", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .or_else(|| body.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> BackendConfig {
        BackendConfig {
            url: Some(Url::parse(&server.uri()).unwrap()),
            anon_key: Some("anon-key".into()),
            ..BackendConfig::default()
        }
    }

    #[test]
    fn test_requires_url_and_key() {
        let err = AdminClient::new(Client::new(), &BackendConfig::default()).err().unwrap();
        assert!(matches!(err, AdminError::NotConfigured("backend url")));

        let cfg = BackendConfig {
            url: Some(Url::parse("https://x.example.co").unwrap()),
            anon_key: Some("  ".into()),
            ..BackendConfig::default()
        };
        let err = AdminClient::new(Client::new(), &cfg).err().unwrap();
        assert!(matches!(err, AdminError::NotConfigured("anon key")));
    }

    #[tokio::test]
    async fn test_sign_in_stores_session() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon-key"))
            .and(body_partial_json(json!({"email": "admin@example.it", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-1",
                "token_type": "bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = AdminClient::new(Client::new(), &config(&server))?;
        let creds = Credentials::new("Admin@Example.it", "secret")?;
        let session = client.sign_in(&creds).await?;
        assert_eq!(session.access_token, "tok-1");
        assert_eq!(session.expires_in, Some(3600));
        assert!(client.session().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_in_rejected() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let mut client = AdminClient::new(Client::new(), &config(&server))?;
        let err = client
            .sign_in(&Credentials::new("a@b.it", "wrong")?)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials (HTTP 400 Bad Request)");
        assert!(client.session().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_in_without_token() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": null})))
            .mount(&server)
            .await;

        let mut client = AdminClient::new(Client::new(), &config(&server))?;
        let err = client
            .sign_in(&Credentials::new("a@b.it", "pw")?)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::NoSession));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_users_uses_session_token() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/admin-create-user"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer user-token"))
            .and(body_partial_json(json!({"action": "list"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": [
                {"id": "u1", "full_name": "Mario", "email": "m@x.it", "role": "admin"},
                {"id": "u2", "email": "s@x.it", "is_active": false}
            ]})))
            .expect(1)
            .mount(&server)
            .await;

        let session = Session {
            access_token: "user-token".into(),
            refresh_token: None,
            expires_in: None,
        };
        let client = AdminClient::new(Client::new(), &config(&server))?.with_session(session);

        let users = client.list_users().await?;
        assert_eq!(users.len(), 2);
        assert!(!users[1].is_active());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_payload() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/admin-create-user"))
            .and(header("authorization", "Bearer anon-key"))
            .and(body_partial_json(json!({
                "action": "create",
                "email": "new@example.it",
                "password": "123456",
                "full_name": "Nuovo Utente",
                "is_active": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = AdminClient::new(Client::new(), &config(&server))?;
        let user = NewUser::new("New@Example.it", "123456", Some("Nuovo Utente"), false)?;
        let reply = client.create_user(&user).await?;
        assert_eq!(reply["ok"], true);
        Ok(())
    }

    #[tokio::test]
    async fn test_remote_error_message() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "not an admin"})))
            .mount(&server)
            .await;

        let client = AdminClient::new(Client::new(), &config(&server))?;
        match client.list_users().await.unwrap_err() {
            AdminError::Remote { status, message } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(message, "not an admin");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_error_message_fallbacks() {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        assert_eq!(error_message(&json!({"msg": "boom"}), status), "boom");
        assert_eq!(error_message(&Value::String("plain".into()), status), "plain");
        assert_eq!(error_message(&Value::Null, status), "Internal Server Error");
    }

    #[test]
    fn test_base_path_gets_trailing_slash() -> Result<()> {
        let cfg = BackendConfig {
            url: Some(Url::parse("https://x.example.co/proxy")?),
            anon_key: Some("anon-key".into()),
            ..BackendConfig::default()
        };
        let client = AdminClient::new(Client::new(), &cfg)?;
        assert_eq!(client.base.join("auth/v1/token")?.path(), "/proxy/auth/v1/token");
        Ok(())
    }
}
