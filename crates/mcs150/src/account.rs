//! Sign-in, registration and the signed-in user's profile.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::api::{Backend, Credentials, PasswordChange, Profile, Registration};
use crate::error::{Error, Result, LOGIN_ROUTE};
use crate::notice::{Action, Notice};
use crate::session::{self, Session};
use crate::storage::Store;

const REQUIRED: &str = "This field is required.";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Loose email syntax check: something, `@`, something with a dot.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

/// Check a first or last name: 2 to 50 characters after trimming.
pub(crate) fn check_name(label: &str, value: &str) -> Result<()> {
    let len = value.trim().chars().count();
    if len < 2 {
        return Err(Error::validation(format!("{label}: {REQUIRED}")));
    }
    if len > 50 {
        return Err(Error::validation(format!(
            "{label} must be at most 50 characters."
        )));
    }
    Ok(())
}

pub(crate) fn check_email(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("Email: {REQUIRED}")));
    }
    if !is_valid_email(value) {
        return Err(Error::validation("Invalid email."));
    }
    Ok(())
}

fn passwords_mismatch() -> Error {
    Error::validation_titled(
        "Passwords don't match",
        "Please make sure your passwords match.",
    )
}

/// Where to go next and what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Route to show next.
    pub route: &'static str,
    /// Notice to show.
    pub notice: Notice,
}

/// A successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    /// The user decoded from the new token.
    pub session: Session,
    /// Landing route for the user's role plus the greeting.
    pub outcome: Outcome,
}

/// Sign in and store the returned token.
///
/// # Errors
///
/// Returns a validation error when either field is blank and an
/// [`Action::Login`] failure carrying the server's message otherwise.
pub async fn login(
    store: &Store,
    backend: &dyn Backend,
    email: &str,
    password: &str,
) -> Result<SignedIn> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(Error::validation_titled(
            "Login failed",
            "Please enter both email and password",
        ));
    }

    let credentials = Credentials {
        email: email.to_string(),
        password: password.to_string(),
    };
    let response = backend
        .login(&credentials)
        .await
        .map_err(|e| {
            warn!(error = %e, "Login rejected");
            Error::action_failed(Action::Login, e)
        })?;

    let session = session::decode_token(&response.access_token).ok_or_else(|| {
        Error::action_failed(
            Action::Login,
            Error::UnexpectedResponse("/auth/login: access token could not be decoded".to_string()),
        )
    })?;
    store.set_credential(&response.access_token)?;
    info!(admin = session.is_admin, "Signed in");

    let outcome = Outcome {
        route: session.landing(),
        notice: Notice::success("Login successful", session.greeting()),
    };
    Ok(SignedIn { session, outcome })
}

/// Fields of the registration form.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account email.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// The password again.
    pub confirm_password: String,
}

impl RegistrationForm {
    fn validate(&self) -> Result<()> {
        if self.password != self.confirm_password {
            return Err(passwords_mismatch());
        }
        check_name("First name", &self.first_name)?;
        check_name("Last name", &self.last_name)?;
        check_email(&self.email)?;
        if self.password.chars().count() < 8 {
            return Err(Error::validation(
                "Password must be at least 8 characters.",
            ));
        }
        Ok(())
    }
}

/// Request an account. The administrator approves it later.
///
/// # Errors
///
/// Returns a validation error for a bad form and an [`Action::Register`]
/// failure carrying the server's message when the backend refuses.
pub async fn register(backend: &dyn Backend, form: &RegistrationForm) -> Result<Outcome> {
    form.validate()?;
    let registration = Registration {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    };
    backend
        .register(&registration)
        .await
        .map_err(|e| Error::action_failed(Action::Register, e))?;
    info!("Registration submitted");
    Ok(Outcome {
        route: LOGIN_ROUTE,
        notice: Notice::info(
            "Registration successful",
            "Access will be granted once the admin has approved your request.",
        ),
    })
}

/// Forget the credential and every wizard slot.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn logout(store: &Store) -> Result<&'static str> {
    store.clear_all()?;
    info!("Signed out");
    Ok(LOGIN_ROUTE)
}

/// Fetch the signed-in user's profile.
///
/// # Errors
///
/// Returns [`Error::NotAuthenticated`] without a session and an
/// [`Action::LoadProfile`] failure when the backend call fails.
pub async fn profile(store: &Store, backend: &dyn Backend) -> Result<Profile> {
    session::gate(store)?;
    backend
        .profile()
        .await
        .map_err(|e| Error::action_failed(Action::LoadProfile, e))
}

/// Update the signed-in user's names and email.
///
/// # Errors
///
/// Returns a validation error for a bad form and an
/// [`Action::UpdateProfile`] failure when the backend call fails.
pub async fn update_profile(store: &Store, backend: &dyn Backend, profile: &Profile) -> Result<Notice> {
    session::gate(store)?;
    check_name("First name", &profile.first_name)?;
    check_name("Last name", &profile.last_name)?;
    check_email(&profile.email)?;

    let profile = Profile {
        first_name: profile.first_name.trim().to_string(),
        last_name: profile.last_name.trim().to_string(),
        email: profile.email.trim().to_string(),
    };
    backend
        .update_profile(&profile)
        .await
        .map_err(|e| Error::action_failed(Action::UpdateProfile, e))?;
    Ok(Notice::info(
        "Profile updated",
        "Your profile has been updated successfully.",
    ))
}

/// Change the signed-in user's password.
///
/// # Errors
///
/// Returns a validation error for a bad form and an
/// [`Action::ChangePassword`] failure ("The current password you entered is
/// incorrect.") when the backend refuses.
pub async fn change_password(
    store: &Store,
    backend: &dyn Backend,
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<Notice> {
    session::gate(store)?;
    if current.chars().count() < 6 {
        return Err(Error::validation("Current password is required."));
    }
    if new.chars().count() < 8 {
        return Err(Error::validation(
            "New password must be at least 8 characters.",
        ));
    }
    if confirm.chars().count() < 8 {
        return Err(Error::validation(
            "Confirm password must be at least 8 characters.",
        ));
    }
    if new != confirm {
        return Err(passwords_mismatch());
    }

    let change = PasswordChange {
        current_password: current.to_string(),
        new_password: new.to_string(),
    };
    backend
        .change_password(&change)
        .await
        .map_err(|e| Error::action_failed(Action::ChangePassword, e))?;
    info!("Password changed");
    Ok(Notice::info(
        "Password changed",
        "Your password has been updated successfully.",
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::mock::MockBackend;
    use crate::session::make_token;
    use crate::wizard::testing::signed_in_store;

    fn admin_token() -> String {
        make_token(&json!({
            "firstName": " Ada ",
            "lastName": "Admin",
            "email": "ada@example.com",
            "isAdmin": true,
        }))
    }

    #[test]
    fn test_email_check() {
        assert!(is_valid_email("ops@example.com"));
        assert!(is_valid_email("  ops@example.co.uk "));
        assert!(!is_valid_email("ops@example"));
        assert!(!is_valid_email("ops example.com"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn test_login_stores_token_and_routes_by_role() {
        let store = Store::open_in_memory().unwrap();
        let backend = MockBackend {
            token: Some(admin_token()),
            ..Default::default()
        };

        let signed_in = login(&store, &backend, "ada@example.com", "secret123")
            .await
            .unwrap();

        assert!(signed_in.session.is_admin);
        assert_eq!(signed_in.outcome.route, "/admin/dashboard");
        assert_eq!(signed_in.outcome.notice.description, "Welcome back, Ada!");
        assert_eq!(store.credential().unwrap(), Some(admin_token()));
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let store = Store::open_in_memory().unwrap();
        let backend = MockBackend::default();

        let err = login(&store, &backend, "", "x").await.unwrap_err();
        assert_eq!(
            err.notice().unwrap().description,
            "Please enter both email and password"
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_shows_server_message() {
        let store = Store::open_in_memory().unwrap();
        let backend = MockBackend {
            login_error: Some("Your account is pending approval".to_string()),
            ..Default::default()
        };

        let err = login(&store, &backend, "a@b.co", "pw").await.unwrap_err();
        let notice = err.notice().unwrap();
        assert_eq!(notice.title, "Login failed");
        assert_eq!(notice.description, "Your account is pending approval");
        assert!(store.credential().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_checks_passwords_first() {
        let backend = MockBackend::default();
        let form = RegistrationForm {
            password: "abcdefgh".to_string(),
            confirm_password: "abcdefgX".to_string(),
            ..Default::default()
        };

        let err = register(&backend, &form).await.unwrap_err();
        assert_eq!(err.notice().unwrap().title, "Passwords don't match");
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_register_success() {
        let backend = MockBackend::default();
        let form = RegistrationForm {
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            email: "dana@example.com".to_string(),
            password: "abcdefgh".to_string(),
            confirm_password: "abcdefgh".to_string(),
        };

        let outcome = register(&backend, &form).await.unwrap();
        assert_eq!(outcome.route, "/login");
        assert_eq!(outcome.notice.title, "Registration successful");
        assert_eq!(backend.calls(), vec!["register dana@example.com"]);
    }

    #[test]
    fn test_logout_clears_everything() {
        let store = signed_in_store();
        store
            .set(crate::storage::Slot::UsdotNumber, "1234567")
            .unwrap();

        assert_eq!(logout(&store).unwrap(), "/login");
        assert!(store.credential().unwrap().is_none());
        assert!(store
            .slot_status()
            .unwrap()
            .iter()
            .all(|(_, present)| !present));
    }

    #[tokio::test]
    async fn test_update_profile_validates() {
        let store = signed_in_store();
        let backend = MockBackend::default();
        let bad = Profile {
            first_name: "D".to_string(),
            last_name: "Reyes".to_string(),
            email: "dana@example.com".to_string(),
        };
        assert!(update_profile(&store, &backend, &bad).await.unwrap_err().is_validation());

        let good = Profile {
            first_name: "Dana ".to_string(),
            ..bad
        };
        let notice = update_profile(&store, &backend, &good).await.unwrap();
        assert_eq!(notice.title, "Profile updated");
        assert_eq!(profile(&store, &backend).await.unwrap().first_name, "Dana");
    }

    #[tokio::test]
    async fn test_change_password_wrong_current() {
        let store = signed_in_store();
        let backend = MockBackend {
            current_password: Some("oldpass1".to_string()),
            ..Default::default()
        };

        let err = change_password(&store, &backend, "wrongpw", "newpass12", "newpass12")
            .await
            .unwrap_err();
        let notice = err.notice().unwrap();
        assert_eq!(notice.title, "Authentication Error");
        assert_eq!(
            notice.description,
            "The current password you entered is incorrect."
        );

        let notice = change_password(&store, &backend, "oldpass1", "newpass12", "newpass12")
            .await
            .unwrap();
        assert_eq!(notice.title, "Password changed");
    }

    #[tokio::test]
    async fn test_change_password_mismatch_is_local() {
        let store = signed_in_store();
        let backend = MockBackend::default();

        let err = change_password(&store, &backend, "oldpass1", "newpass12", "newpass13")
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let store = Store::open_in_memory().unwrap();
        let err = profile(&store, &MockBackend::default()).await.unwrap_err();
        assert_eq!(err.redirect(), Some("/login"));
    }
}
