//! [`Backend`] over HTTP.

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::types::{
    ChartResponse, HistoryResponse, MessageBody, NotificationId, ProfileResponse,
    RecentUsersResponse, UserEnvelope, UserId, UserPassword, UsersResponse,
};
use super::{
    AdminUser, Backend, ChartRecord, Credentials, DashboardStats, FilingHistoryRecord,
    GeneratedFiling, LoginResponse, NotificationList, PasswordChange, Profile, Registration,
    UserForm,
};
use crate::config::Config;
use crate::error::{Error, Result};

/// Check an HTTP response for a non-success status.
///
/// Returns the response unchanged on success. Otherwise the body's
/// `message` (or `error`) field becomes the [`Error::Api`] message, falling
/// back to the raw body text.
///
/// # Errors
///
/// Returns [`Error::Api`] for any non-2xx status.
pub async fn check_response(resp: Response) -> Result<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Api {
        status,
        message: error_message(&body),
    })
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => ["message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str))
            .map_or_else(|| body.trim().to_string(), str::to_string),
        Err(_) => body.trim().to_string(),
    }
}

/// Percent-encode each segment of a file path, keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// REST client for the filing backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    /// Build a client from configuration, sending `token` as a bearer
    /// credential when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &Config, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.api.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            token,
        })
    }

    /// Full URL for an endpoint path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "Backend request");
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        check_response(builder.send().await?).await
    }

    async fn parse<T: DeserializeOwned>(resp: Response, path: &str) -> Result<T> {
        let text = resp.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| Error::UnexpectedResponse(format!("{path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.send(self.request(Method::GET, path)).await?;
        Self::parse(resp, path).await
    }

    async fn send_json<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Response> {
        self.send(self.request(method, path).json(body)).await
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self.send(self.request(Method::GET, path)).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    async fn get_unit(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::GET, path)).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let resp = self
            .send_json(Method::POST, "/auth/login", credentials)
            .await?;
        Self::parse(resp, "/auth/login").await
    }

    async fn register(&self, registration: &Registration) -> Result<()> {
        let resp = self
            .send_json(Method::POST, "/auth/register", registration)
            .await?;
        let body: MessageBody = Self::parse(resp, "/auth/register").await?;
        debug!(message = %body.message, "Registered");
        Ok(())
    }

    async fn profile(&self) -> Result<Profile> {
        let body: ProfileResponse = self.get_json("/profile/get").await?;
        Ok(body.profile)
    }

    async fn update_profile(&self, profile: &Profile) -> Result<()> {
        self.send_json(Method::POST, "/profile/update", profile)
            .await?;
        Ok(())
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        self.send_json(Method::POST, "/profile/change-password", change)
            .await?;
        Ok(())
    }

    async fn lookup_carrier(&self, usdot: &str) -> Result<Value> {
        let path = format!(
            "/filing/get_by_usdot_number?usdot_number={}",
            urlencoding::encode(usdot)
        );
        self.get_json(&path).await
    }

    async fn generate_pdf(&self, payload: &Value) -> Result<GeneratedFiling> {
        let resp = self
            .send_json(Method::POST, "/filing/generate_pdf", payload)
            .await?;
        let generated: GeneratedFiling = Self::parse(resp, "/filing/generate_pdf").await?;
        if generated.filing_name.trim().is_empty() {
            return Err(Error::UnexpectedResponse(
                "/filing/generate_pdf: no filing_name in response".to_string(),
            ));
        }
        Ok(generated)
    }

    async fn download_generated(&self, name: &str) -> Result<Vec<u8>> {
        self.get_bytes(&format!("/filing/generated/{}", encode_path(name)))
            .await
    }

    async fn check_generated(&self, path: &str) -> Result<()> {
        let path = format!("/filing/generated/{}", encode_path(path));
        self.send(self.request(Method::HEAD, &path)).await?;
        Ok(())
    }

    async fn filing_history(&self) -> Result<Vec<FilingHistoryRecord>> {
        let body: HistoryResponse = self.get_json("/filing/get_filing_history").await?;
        Ok(body.filing_histories)
    }

    async fn export_history(&self) -> Result<Vec<u8>> {
        self.get_bytes("/filing/export_history").await
    }

    async fn pdf_statistics(&self) -> Result<Vec<ChartRecord>> {
        let body: ChartResponse = self.get_json("/filing/get_pdf_statistics").await?;
        Ok(body.chart_data)
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get_json("/dashboard/get_stats").await
    }

    async fn recent_users(&self) -> Result<Vec<AdminUser>> {
        let body: RecentUsersResponse = self.get_json("/dashboard/get_recent_users").await?;
        Ok(body.recent_users)
    }

    async fn users(&self) -> Result<Vec<AdminUser>> {
        let body: UsersResponse = self.get_json("/user/get_users").await?;
        Ok(body.users)
    }

    async fn add_user(&self, user: &UserForm) -> Result<()> {
        self.send_json(Method::POST, "/user/add_user", &UserEnvelope { user })
            .await?;
        Ok(())
    }

    async fn update_user(&self, user: &UserForm) -> Result<()> {
        self.send_json(Method::PUT, "/user/update_user", &UserEnvelope { user })
            .await?;
        Ok(())
    }

    async fn reset_password(&self, id: i64, password: &str) -> Result<()> {
        let body = UserEnvelope {
            user: UserPassword { id, password },
        };
        self.send_json(Method::PUT, "/user/reset_password", &body)
            .await?;
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<()> {
        let body = UserEnvelope { user: UserId { id } };
        self.send_json(Method::POST, "/user/delete_user", &body)
            .await?;
        Ok(())
    }

    async fn notifications(&self) -> Result<NotificationList> {
        self.get_json("/notification/get").await
    }

    async fn mark_read(&self, id: i64) -> Result<()> {
        self.send_json(Method::POST, "/notification/mark_read", &NotificationId { id })
            .await?;
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<()> {
        self.get_unit("/notification/mark_all_read").await
    }

    async fn dismiss(&self, id: i64) -> Result<()> {
        self.send_json(Method::POST, "/notification/dismiss", &NotificationId { id })
            .await?;
        Ok(())
    }

    async fn dismiss_all(&self) -> Result<()> {
        self.get_unit("/notification/dismiss_all").await
    }
}
