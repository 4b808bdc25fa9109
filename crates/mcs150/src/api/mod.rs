//! The filing backend's REST contract.
//!
//! Everything above this module talks to a [`Backend`]; the binary wires in
//! [`HttpBackend`] and the tests wire in an in-memory implementation.

mod http;
#[cfg(test)]
pub(crate) mod mock;
pub mod types;

pub use http::{check_response, HttpBackend};
pub use types::{
    AdminUser, ChartRecord, Credentials, DashboardStats, FilingHistoryRecord, GeneratedFiling,
    LoginResponse, Notification, NotificationList, PasswordChange, Profile, Registration,
    UserForm,
};

use serde_json::Value;

use crate::error::Result;

/// One method per backend endpoint the client consumes.
///
/// No method retries; a failure is returned to the caller as-is.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    // === Authentication ===

    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    /// `POST /auth/register`
    async fn register(&self, registration: &Registration) -> Result<()>;

    // === Profile ===

    /// `GET /profile/get`
    async fn profile(&self) -> Result<Profile>;

    /// `POST /profile/update`
    async fn update_profile(&self, profile: &Profile) -> Result<()>;

    /// `POST /profile/change-password`
    async fn change_password(&self, change: &PasswordChange) -> Result<()>;

    // === Filing ===

    /// `GET /filing/get_by_usdot_number?usdot_number=`
    ///
    /// Returns the raw body; field resolution happens in
    /// [`crate::carrier::sources`].
    async fn lookup_carrier(&self, usdot: &str) -> Result<Value>;

    /// `POST /filing/generate_pdf`
    async fn generate_pdf(&self, payload: &Value) -> Result<GeneratedFiling>;

    /// `GET /filing/generated/{name}`
    async fn download_generated(&self, name: &str) -> Result<Vec<u8>>;

    /// `HEAD /filing/generated/{path}`; succeeds only when the file exists.
    async fn check_generated(&self, path: &str) -> Result<()>;

    /// `GET /filing/get_filing_history`
    async fn filing_history(&self) -> Result<Vec<FilingHistoryRecord>>;

    /// `GET /filing/export_history`, CSV bytes.
    async fn export_history(&self) -> Result<Vec<u8>>;

    /// `GET /filing/get_pdf_statistics`
    async fn pdf_statistics(&self) -> Result<Vec<ChartRecord>>;

    // === Dashboard ===

    /// `GET /dashboard/get_stats`
    async fn dashboard_stats(&self) -> Result<DashboardStats>;

    /// `GET /dashboard/get_recent_users`
    async fn recent_users(&self) -> Result<Vec<AdminUser>>;

    // === User administration ===

    /// `GET /user/get_users`
    async fn users(&self) -> Result<Vec<AdminUser>>;

    /// `POST /user/add_user`
    async fn add_user(&self, user: &UserForm) -> Result<()>;

    /// `PUT /user/update_user`
    async fn update_user(&self, user: &UserForm) -> Result<()>;

    /// `PUT /user/reset_password`
    async fn reset_password(&self, id: i64, password: &str) -> Result<()>;

    /// `POST /user/delete_user`
    async fn delete_user(&self, id: i64) -> Result<()>;

    // === Notifications ===

    /// `GET /notification/get`
    async fn notifications(&self) -> Result<NotificationList>;

    /// `POST /notification/mark_read`
    async fn mark_read(&self, id: i64) -> Result<()>;

    /// `GET /notification/mark_all_read`
    async fn mark_all_read(&self) -> Result<()>;

    /// `POST /notification/dismiss`
    async fn dismiss(&self, id: i64) -> Result<()>;

    /// `GET /notification/dismiss_all`
    async fn dismiss_all(&self) -> Result<()>;
}
