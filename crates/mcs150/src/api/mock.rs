//! In-memory [`Backend`] for unit tests.

use std::sync::Mutex;

use serde_json::Value;

use super::{
    AdminUser, Backend, ChartRecord, Credentials, DashboardStats, FilingHistoryRecord,
    GeneratedFiling, LoginResponse, Notification, NotificationList, PasswordChange, Profile,
    Registration, UserForm,
};
use crate::error::{Error, Result};

fn not_found() -> Error {
    Error::Api {
        status: 404,
        message: "Not found".to_string(),
    }
}

fn server_error() -> Error {
    Error::Api {
        status: 500,
        message: String::new(),
    }
}

/// Canned responses plus a log of every call made.
#[derive(Debug, Default)]
pub(crate) struct MockBackend {
    pub(crate) token: Option<String>,
    pub(crate) login_error: Option<String>,
    pub(crate) profile: Mutex<Profile>,
    pub(crate) current_password: Option<String>,
    pub(crate) carrier: Option<Value>,
    pub(crate) filing_name: Option<String>,
    pub(crate) pdf: Option<Vec<u8>>,
    pub(crate) history: Vec<FilingHistoryRecord>,
    pub(crate) csv: Option<Vec<u8>>,
    pub(crate) chart: Vec<ChartRecord>,
    pub(crate) stats: DashboardStats,
    pub(crate) users: Mutex<Vec<AdminUser>>,
    pub(crate) notifications: Mutex<Vec<Notification>>,
    pub(crate) fail_writes: bool,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl MockBackend {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn write(&self, call: impl Into<String>) -> Result<()> {
        self.record(call);
        if self.fail_writes {
            Err(server_error())
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl Backend for MockBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.record(format!("login {}", credentials.email));
        if let Some(message) = &self.login_error {
            return Err(Error::Api {
                status: 401,
                message: message.clone(),
            });
        }
        let access_token = self.token.clone().ok_or_else(server_error)?;
        Ok(LoginResponse { access_token })
    }

    async fn register(&self, registration: &Registration) -> Result<()> {
        self.write(format!("register {}", registration.email))
    }

    async fn profile(&self) -> Result<Profile> {
        self.record("profile");
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<()> {
        self.write("update_profile")?;
        *self.profile.lock().unwrap() = profile.clone();
        Ok(())
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        self.record("change_password");
        match &self.current_password {
            Some(current) if *current == change.current_password => Ok(()),
            _ => Err(Error::Api {
                status: 401,
                message: "Invalid credentials".to_string(),
            }),
        }
    }

    async fn lookup_carrier(&self, usdot: &str) -> Result<Value> {
        self.record(format!("lookup {usdot}"));
        self.carrier.clone().ok_or_else(not_found)
    }

    async fn generate_pdf(&self, payload: &Value) -> Result<GeneratedFiling> {
        self.record(format!("generate {}", payload["line16_19"]["line19"]));
        self.filing_name
            .clone()
            .map(|filing_name| GeneratedFiling { filing_name })
            .ok_or_else(server_error)
    }

    async fn download_generated(&self, name: &str) -> Result<Vec<u8>> {
        self.record(format!("download {name}"));
        self.pdf.clone().ok_or_else(not_found)
    }

    async fn check_generated(&self, path: &str) -> Result<()> {
        self.record(format!("check {path}"));
        if self.history.iter().any(|h| h.filing_path == path) && self.pdf.is_some() {
            Ok(())
        } else {
            Err(not_found())
        }
    }

    async fn filing_history(&self) -> Result<Vec<FilingHistoryRecord>> {
        self.record("history");
        Ok(self.history.clone())
    }

    async fn export_history(&self) -> Result<Vec<u8>> {
        self.record("export");
        self.csv.clone().ok_or_else(server_error)
    }

    async fn pdf_statistics(&self) -> Result<Vec<ChartRecord>> {
        self.record("statistics");
        Ok(self.chart.clone())
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.record("stats");
        Ok(self.stats)
    }

    async fn recent_users(&self) -> Result<Vec<AdminUser>> {
        self.record("recent_users");
        Ok(self.users.lock().unwrap().iter().take(5).cloned().collect())
    }

    async fn users(&self) -> Result<Vec<AdminUser>> {
        self.record("users");
        Ok(self.users.lock().unwrap().clone())
    }

    async fn add_user(&self, user: &UserForm) -> Result<()> {
        self.write(format!("add_user {}", user.email))?;
        let mut users = self.users.lock().unwrap();
        let id = users.iter().map(|u| u.id).max().unwrap_or_default() + 1;
        users.push(AdminUser {
            id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            status: user.status,
            ..AdminUser::default()
        });
        Ok(())
    }

    async fn update_user(&self, user: &UserForm) -> Result<()> {
        self.write(format!("update_user {:?}", user.id))?;
        let mut users = self.users.lock().unwrap();
        let existing = users
            .iter_mut()
            .find(|u| Some(u.id) == user.id)
            .ok_or_else(not_found)?;
        existing.first_name.clone_from(&user.first_name);
        existing.last_name.clone_from(&user.last_name);
        existing.email.clone_from(&user.email);
        existing.is_admin = user.is_admin;
        existing.status = user.status;
        Ok(())
    }

    async fn reset_password(&self, id: i64, _password: &str) -> Result<()> {
        self.write(format!("reset_password {id}"))
    }

    async fn delete_user(&self, id: i64) -> Result<()> {
        self.write(format!("delete_user {id}"))?;
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }

    async fn notifications(&self) -> Result<NotificationList> {
        self.record("notifications");
        let notifications = self.notifications.lock().unwrap().clone();
        let unread_count = notifications.iter().filter(|n| !n.read).count();
        Ok(NotificationList {
            notifications,
            unread_count: i64::try_from(unread_count).unwrap_or_default(),
        })
    }

    async fn mark_read(&self, id: i64) -> Result<()> {
        self.write(format!("mark_read {id}"))?;
        for n in self.notifications.lock().unwrap().iter_mut() {
            if n.id == id {
                n.read = true;
            }
        }
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<()> {
        self.write("mark_all_read")?;
        for n in self.notifications.lock().unwrap().iter_mut() {
            n.read = true;
        }
        Ok(())
    }

    async fn dismiss(&self, id: i64) -> Result<()> {
        self.write(format!("dismiss {id}"))?;
        self.notifications.lock().unwrap().retain(|n| n.id != id);
        Ok(())
    }

    async fn dismiss_all(&self) -> Result<()> {
        self.write("dismiss_all")?;
        self.notifications.lock().unwrap().clear();
        Ok(())
    }
}
