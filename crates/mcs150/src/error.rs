//! Error types for mcs150.
//!
//! This module defines all error types used throughout the mcs150 crate and
//! maps them onto what the user sees: a silent redirect, a validation notice,
//! or a generic per-action failure notice.

use std::path::PathBuf;
use thiserror::Error;

use crate::notice::{Action, Notice};
use crate::wizard::Step;

/// Route the user is sent to when no usable session exists.
pub const LOGIN_ROUTE: &str = "/login";

/// Route a signed-in non-admin is sent to from admin-only commands.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// The main error type for mcs150 operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Session Errors ===
    /// No stored credential, or it could not be decoded.
    #[error("not signed in")]
    NotAuthenticated,

    /// The signed-in user may not use an admin-only command.
    #[error("administrator access required")]
    NotAuthorized,

    // === Wizard Errors ===
    /// A wizard step was entered without the state it depends on.
    #[error("missing wizard state, restart at {redirect}")]
    MissingPrerequisite {
        /// Earliest step that produces the missing state.
        redirect: Step,
    },

    /// Client-side validation rejected the input before any request was made.
    #[error("{title}: {message}")]
    Validation {
        /// Short headline.
        title: String,
        /// What needs fixing.
        message: String,
    },

    // === Backend Errors ===
    /// The HTTP request could not be completed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The backend answered successfully but the body was not what we expected.
    #[error("unexpected backend response: {0}")]
    UnexpectedResponse(String),

    /// A user-triggered backend call failed.
    #[error("{action} failed: {source}")]
    ActionFailed {
        /// What the user was trying to do.
        action: Action,
        /// Why it failed.
        #[source]
        source: Box<Error>,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for mcs150 operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error with the generic "Error" headline.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    /// Create a validation error with a specific headline.
    #[must_use]
    pub fn validation_titled(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Wrap a backend failure with the user action it interrupted.
    ///
    /// Errors that already carry their own user-facing meaning (validation,
    /// missing session, an earlier action wrapper) pass through unchanged.
    #[must_use]
    pub fn action_failed(action: Action, source: Error) -> Self {
        match source {
            Self::Validation { .. }
            | Self::NotAuthenticated
            | Self::NotAuthorized
            | Self::MissingPrerequisite { .. }
            | Self::ActionFailed { .. } => source,
            other => Self::ActionFailed {
                action,
                source: Box::new(other),
            },
        }
    }

    /// The route the user should be sent to, if this error is a redirect.
    #[must_use]
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            Self::NotAuthenticated => Some(LOGIN_ROUTE),
            Self::NotAuthorized => Some(DASHBOARD_ROUTE),
            Self::MissingPrerequisite { redirect } => Some(redirect.route()),
            _ => None,
        }
    }

    /// Check if this error only redirects the user.
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        self.redirect().is_some()
    }

    /// Check if this error is a client-side validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if the backend rejected the credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 401,
            Self::ActionFailed { source, .. } => source.is_unauthorized(),
            _ => false,
        }
    }

    /// The notice the user sees for this error.
    ///
    /// Redirects are silent and return `None`.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::NotAuthenticated | Self::NotAuthorized | Self::MissingPrerequisite { .. } => {
                None
            }
            Self::Validation { title, message } => Some(Notice::error(title, message)),
            Self::ActionFailed { action, source } => {
                let mut notice = action.failure_notice();
                if action.shows_server_message() {
                    if let Self::Api { message, .. } = source.as_ref() {
                        if !message.is_empty() {
                            notice.description.clone_from(message);
                        }
                    }
                }
                Some(notice)
            }
            other => Some(Notice::error("Error", other.to_string())),
        }
    }
}
