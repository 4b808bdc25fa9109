//! Request and response bodies of the filing backend.
//!
//! The backend is loose about scalar types (ids and counts arrive as numbers
//! or strings, flags as booleans or 0/1), so the readers here accept both.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => matches!(s.trim(), "1" | "true" | "True"),
        _ => false,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

fn lenient_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = lenient_string(deserializer)?;
    Ok((!s.is_empty()).then_some(s))
}

/// Generic `{ "message": ... }` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageBody {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

/// `POST /auth/login` request.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// `POST /auth/login` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed access token.
    pub access_token: String,
}

/// `POST /auth/register` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// The signed-in user's editable profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account email.
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileResponse {
    pub(crate) profile: Profile,
}

/// `POST /profile/change-password` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    /// Password currently in use.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

/// `POST /filing/generate_pdf` response.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedFiling {
    /// Name of the generated file, used to download it.
    #[serde(default)]
    pub filing_name: String,
}

/// One generated filing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilingHistoryRecord {
    /// Row id.
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// USDOT number the filing was made for.
    #[serde(deserialize_with = "lenient_string")]
    pub usdot_number: String,
    /// Carrier email on the filing.
    #[serde(deserialize_with = "lenient_string")]
    pub carrier_email: String,
    /// Mileage on the filing.
    #[serde(deserialize_with = "lenient_string")]
    pub carrier_mileage: String,
    /// Employer number on the filing.
    #[serde(deserialize_with = "lenient_string")]
    pub carrier_ein: String,
    /// Generated file path, relative to the backend's output directory.
    #[serde(deserialize_with = "lenient_string")]
    pub filing_path: String,
    /// 1 once the file is complete.
    #[serde(deserialize_with = "lenient_i64")]
    pub status: i64,
    /// Creation time as sent by the backend.
    #[serde(rename = "created_at", deserialize_with = "lenient_string")]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub(crate) filing_histories: Vec<FilingHistoryRecord>,
}

/// One PDF generation event, pre-split into date parts by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartRecord {
    /// Event id.
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// USDOT number of the filing.
    #[serde(deserialize_with = "lenient_string")]
    pub usdot: String,
    /// Who generated it.
    #[serde(deserialize_with = "lenient_string")]
    pub user: String,
    /// Full timestamp.
    #[serde(deserialize_with = "lenient_string")]
    pub timestamp: String,
    /// Day of month.
    #[serde(deserialize_with = "lenient_string")]
    pub day: String,
    /// Three-letter month (`Jan` .. `Dec`).
    #[serde(deserialize_with = "lenient_string")]
    pub month: String,
    /// Four-digit year.
    #[serde(deserialize_with = "lenient_string")]
    pub year: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChartResponse {
    #[serde(default)]
    pub(crate) chart_data: Vec<ChartRecord>,
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    /// All accounts.
    #[serde(deserialize_with = "lenient_i64")]
    pub total_users: i64,
    /// Accounts allowed to sign in.
    #[serde(deserialize_with = "lenient_i64")]
    pub active_users: i64,
    /// PDFs generated so far.
    #[serde(deserialize_with = "lenient_i64")]
    pub pdf_generated: i64,
}

/// A user as listed in the admin console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminUser {
    /// User id.
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
    /// Given name.
    #[serde(deserialize_with = "lenient_string")]
    pub first_name: String,
    /// Family name.
    #[serde(deserialize_with = "lenient_string")]
    pub last_name: String,
    /// Account email.
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    /// Administrator flag.
    #[serde(deserialize_with = "lenient_bool")]
    pub is_admin: bool,
    /// Active (may sign in) or inactive.
    #[serde(deserialize_with = "lenient_bool")]
    pub status: bool,
    /// Account creation time.
    #[serde(deserialize_with = "lenient_opt_string")]
    pub created_at: Option<String>,
    /// Last successful sign-in.
    #[serde(deserialize_with = "lenient_opt_string")]
    pub last_login: Option<String>,
}

impl AdminUser {
    /// Full display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// `Active` or `Inactive`.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.status {
            "Active"
        } else {
            "Inactive"
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersResponse {
    #[serde(default)]
    pub(crate) users: Vec<AdminUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecentUsersResponse {
    #[serde(default)]
    pub(crate) recent_users: Vec<AdminUser>,
}

/// Fields sent when creating or updating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    /// Set when updating an existing user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account email.
    pub email: String,
    /// Administrator flag.
    pub is_admin: bool,
    /// Active flag.
    pub status: bool,
    /// Initial password; only sent when creating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Wrapper the user endpoints expect: `{ "user": { ... } }`.
#[derive(Debug, Serialize)]
pub(crate) struct UserEnvelope<T: Serialize> {
    pub(crate) user: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserId {
    pub(crate) id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserPassword<'a> {
    pub(crate) id: i64,
    pub(crate) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NotificationId {
    pub(crate) id: i64,
}

/// A notification as sent by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    /// Notification id.
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
    /// Category name (`user`, `document`, `system`, `alert`).
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub category: String,
    /// Headline.
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    /// Body text.
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    /// Whether it has been read.
    #[serde(deserialize_with = "lenient_bool")]
    pub read: bool,
    /// Where the notification points.
    #[serde(deserialize_with = "lenient_string")]
    pub link: String,
    /// Creation time as sent by the backend.
    #[serde(deserialize_with = "lenient_string")]
    pub time: String,
}

/// `GET /notification/get` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationList {
    /// Every notification for the signed-in user.
    pub notifications: Vec<Notification>,
    /// Unread count as computed by the backend.
    #[serde(deserialize_with = "lenient_i64")]
    pub unread_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_admin_user_accepts_int_flags() {
        let user: AdminUser = serde_json::from_value(json!({
            "id": "7",
            "firstName": "Ana",
            "lastName": "Ortiz",
            "email": "ana@example.com",
            "isAdmin": 0,
            "status": 1,
            "createdAt": "Mon, 03 Mar 2025 10:00:00 GMT",
            "lastLogin": null,
        }))
        .unwrap();

        assert_eq!(user.id, 7);
        assert!(!user.is_admin);
        assert!(user.status);
        assert_eq!(user.status_label(), "Active");
        assert!(user.last_login.is_none());
        assert_eq!(user.display_name(), "Ana Ortiz");
    }

    #[test]
    fn test_history_record_numbers_as_strings() {
        let record: FilingHistoryRecord = serde_json::from_value(json!({
            "id": 3,
            "usdotNumber": "1234567",
            "carrierEmail": "ops@example.com",
            "carrierMileage": 120000,
            "carrierEin": "12-3456789",
            "filingPath": "MCS150_1234567.pdf",
            "status": 1,
            "created_at": "2025-03-03T10:00:00",
        }))
        .unwrap();

        assert_eq!(record.id, "3");
        assert_eq!(record.carrier_mileage, "120000");
        assert_eq!(record.status, 1);
    }

    #[test]
    fn test_notification_type_is_category() {
        let list: NotificationList = serde_json::from_value(json!({
            "notifications": [{ "id": 1, "type": "alert", "title": "T", "description": "D", "read": false, "link": "", "time": "x" }],
            "unread_count": 1,
        }))
        .unwrap();

        assert_eq!(list.notifications[0].category, "alert");
        assert_eq!(list.unread_count, 1);
    }

    #[test]
    fn test_user_form_omits_absent_fields() {
        let form = UserForm {
            first_name: "Ana".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(UserEnvelope { user: &form }).unwrap();

        assert_eq!(value["user"]["firstName"], "Ana");
        assert!(value["user"].get("id").is_none());
        assert!(value["user"].get("password").is_none());
    }
}
