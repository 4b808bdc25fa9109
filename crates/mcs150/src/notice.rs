//! User-facing notices.
//!
//! Every outcome the user should see (a saved step, a rejected form, a failed
//! backend call) is reported as a [`Notice`]. Failures of backend calls are
//! worded per [`Action`] so that a failed export reads differently from a
//! failed download.

use std::fmt;

use serde::Serialize;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// The action completed.
    Success,
    /// Informational, nothing went wrong.
    Info,
    /// The action was rejected or failed.
    Error,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "ok"),
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A dismissible message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Short headline.
    pub title: String,
    /// Longer explanation.
    pub description: String,
}

impl Notice {
    /// Create a success notice.
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Create an informational notice.
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Create an error notice.
    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Check if this notice reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.title, self.description)
    }
}

/// A user-triggered operation that calls the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Sign in.
    Login,
    /// Create an account.
    Register,
    /// Fetch the signed-in user's profile.
    LoadProfile,
    /// Update the signed-in user's profile.
    UpdateProfile,
    /// Change the signed-in user's password.
    ChangePassword,
    /// Resolve a USDOT number to a carrier record.
    Lookup,
    /// Render the filing to PDF.
    GeneratePdf,
    /// Download a generated PDF.
    DownloadPdf,
    /// Check that a generated file exists.
    ViewFile,
    /// Fetch the filing history.
    LoadHistory,
    /// Export the filing history as CSV.
    ExportHistory,
    /// Fetch dashboard counters or recent users.
    LoadDashboard,
    /// Fetch PDF generation statistics.
    LoadStatistics,
    /// Fetch the user list.
    LoadUsers,
    /// Create a user.
    AddUser,
    /// Update a user.
    UpdateUser,
    /// Reset a user's password.
    ResetPassword,
    /// Delete a user.
    DeleteUser,
    /// Fetch or update notifications.
    Notifications,
}

/// Fallback description when the server sent no message of its own.
const CONNECTION_ERROR: &str = "There is a connection error with the server.";

impl Action {
    /// Whether the server's own error message should be shown to the user.
    #[must_use]
    pub fn shows_server_message(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// The generic notice shown when this action fails.
    #[must_use]
    pub fn failure_notice(self) -> Notice {
        let (title, description) = match self {
            Self::Login => ("Login failed", CONNECTION_ERROR),
            Self::Register => ("Registration failed", CONNECTION_ERROR),
            Self::LoadProfile => ("Error", "Failed to load your profile."),
            Self::UpdateProfile => ("Error", "Failed to update your profile."),
            Self::ChangePassword => (
                "Authentication Error",
                "The current password you entered is incorrect.",
            ),
            Self::Lookup => ("Error", "The USDOT number provided was not found."),
            Self::GeneratePdf => ("Error", "Failed to generate PDF. Please try again."),
            Self::DownloadPdf => ("Download failed", "A download file is not available."),
            Self::ViewFile => ("Not Found", "This file does not exist."),
            Self::LoadHistory => ("Error", "Failed to load the filing history."),
            Self::ExportHistory => ("Export failed", "An error occurred during export."),
            Self::LoadDashboard => ("Error", "Failed to load dashboard statistics."),
            Self::LoadStatistics => ("Error", "Failed to load PDF statistics."),
            Self::LoadUsers => ("Error", "Failed to load users."),
            Self::AddUser => (
                "Error",
                "An error occurred while adding the user information.",
            ),
            Self::UpdateUser => (
                "Error",
                "An error occurred while updating the user information.",
            ),
            Self::ResetPassword => ("Error", "An error occurred while updating the password."),
            Self::DeleteUser => ("Error", "An error occurred while deleting the user."),
            Self::Notifications => ("Error", "Failed to update notifications."),
        };
        Notice::error(title, description)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::LoadProfile => "load profile",
            Self::UpdateProfile => "update profile",
            Self::ChangePassword => "change password",
            Self::Lookup => "carrier lookup",
            Self::GeneratePdf => "PDF generation",
            Self::DownloadPdf => "PDF download",
            Self::ViewFile => "file check",
            Self::LoadHistory => "load history",
            Self::ExportHistory => "history export",
            Self::LoadDashboard => "load dashboard",
            Self::LoadStatistics => "load statistics",
            Self::LoadUsers => "load users",
            Self::AddUser => "add user",
            Self::UpdateUser => "update user",
            Self::ResetPassword => "reset password",
            Self::DeleteUser => "delete user",
            Self::Notifications => "notifications",
        };
        f.write_str(label)
    }
}
