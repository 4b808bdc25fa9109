//! User administration.

use tracing::info;

use crate::account::{check_email, check_name};
use crate::api::{AdminUser, Backend, UserForm};
use crate::error::{Error, Result};
use crate::notice::{Action, Notice};
use crate::session;
use crate::storage::Store;

fn check_new_password(password: &str, confirm: &str) -> Result<()> {
    if password.chars().count() < 8 {
        return Err(Error::validation(
            "Password must be at least 8 characters.",
        ));
    }
    if password != confirm {
        return Err(Error::validation_titled(
            "Passwords don't match",
            "Please make sure your passwords match.",
        ));
    }
    Ok(())
}

fn done(description: &str) -> Notice {
    Notice::info("Success", description)
}

/// Fetch every user.
///
/// # Errors
///
/// Returns a redirect without an admin session and an [`Action::LoadUsers`]
/// failure when the backend call fails.
pub async fn list(store: &Store, backend: &dyn Backend) -> Result<Vec<AdminUser>> {
    session::gate_admin(store)?;
    backend
        .users()
        .await
        .map_err(|e| Error::action_failed(Action::LoadUsers, e))
}

/// The add-user form.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Initial password again.
    pub confirm_password: String,
    /// Grant administrator access.
    pub is_admin: bool,
    /// Allow sign-in right away.
    pub active: bool,
}

/// Create a user.
///
/// # Errors
///
/// Returns a validation error for a bad form and an [`Action::AddUser`]
/// failure when the backend refuses.
pub async fn add(store: &Store, backend: &dyn Backend, user: &NewUser) -> Result<Notice> {
    session::gate_admin(store)?;
    check_name("First name", &user.first_name)?;
    check_name("Last name", &user.last_name)?;
    check_email(&user.email)?;
    check_new_password(&user.password, &user.confirm_password)?;

    let form = UserForm {
        id: None,
        first_name: user.first_name.trim().to_string(),
        last_name: user.last_name.trim().to_string(),
        email: user.email.trim().to_string(),
        is_admin: user.is_admin,
        status: user.active,
        password: Some(user.password.clone()),
    };
    backend
        .add_user(&form)
        .await
        .map_err(|e| Error::action_failed(Action::AddUser, e))?;
    info!(admin = user.is_admin, "User added");
    Ok(done("The user was added successfully."))
}

/// Changes to an existing user; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New administrator flag.
    pub is_admin: Option<bool>,
    /// New active flag.
    pub active: Option<bool>,
}

impl UserPatch {
    fn apply(&self, user: &AdminUser) -> UserForm {
        let pick = |new: &Option<String>, old: &str| {
            new.as_deref().unwrap_or(old).trim().to_string()
        };
        UserForm {
            id: Some(user.id),
            first_name: pick(&self.first_name, &user.first_name),
            last_name: pick(&self.last_name, &user.last_name),
            email: pick(&self.email, &user.email),
            is_admin: self.is_admin.unwrap_or(user.is_admin),
            status: self.active.unwrap_or(user.status),
            password: None,
        }
    }
}

/// Update user `id`.
///
/// The current record is fetched first so that unchanged fields are sent as
/// they are.
///
/// # Errors
///
/// Returns a validation error for an unknown id or bad values and an
/// [`Action::UpdateUser`] failure when the backend refuses.
pub async fn update(store: &Store, backend: &dyn Backend, id: i64, patch: &UserPatch) -> Result<Notice> {
    let users = list(store, backend).await?;
    let current = users
        .iter()
        .find(|u| u.id == id)
        .ok_or_else(|| Error::validation(format!("No user with id {id}.")))?;

    let form = patch.apply(current);
    check_name("First name", &form.first_name)?;
    check_name("Last name", &form.last_name)?;
    check_email(&form.email)?;

    backend
        .update_user(&form)
        .await
        .map_err(|e| Error::action_failed(Action::UpdateUser, e))?;
    info!(id, "User updated");
    Ok(done("User information updated successfully."))
}

/// The reset-password form.
#[derive(Debug, Clone, Default)]
pub struct PasswordReset {
    /// Target user.
    pub id: i64,
    /// New password.
    pub password: String,
    /// New password again.
    pub confirm_password: String,
}

/// Set a user's password.
///
/// # Errors
///
/// Returns a validation error when the passwords are short or differ and an
/// [`Action::ResetPassword`] failure when the backend refuses.
pub async fn reset_password(store: &Store, backend: &dyn Backend, reset: &PasswordReset) -> Result<Notice> {
    session::gate_admin(store)?;
    check_new_password(&reset.password, &reset.confirm_password)?;
    backend
        .reset_password(reset.id, &reset.password)
        .await
        .map_err(|e| Error::action_failed(Action::ResetPassword, e))?;
    info!(id = reset.id, "Password reset");
    Ok(done("The password was updated successfully."))
}

/// Delete user `id`.
///
/// # Errors
///
/// Returns an [`Action::DeleteUser`] failure when the backend refuses.
pub async fn delete(store: &Store, backend: &dyn Backend, id: i64) -> Result<Notice> {
    session::gate_admin(store)?;
    backend
        .delete_user(id)
        .await
        .map_err(|e| Error::action_failed(Action::DeleteUser, e))?;
    info!(id, "User deleted");
    Ok(done("The user was deleted successfully."))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::api::mock::MockBackend;
    use crate::session::make_token;

    pub(crate) fn admin_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store
            .set_credential(&make_token(&json!({
                "firstName": "Ada",
                "lastName": "Admin",
                "email": "ada@example.com",
                "isAdmin": true,
            })))
            .unwrap();
        store
    }

    pub(crate) fn sample_users() -> Vec<AdminUser> {
        ["ana", "ben", "cy"]
            .iter()
            .zip(1..)
            .map(|(name, id)| AdminUser {
                id,
                first_name: (*name).to_string(),
                last_name: "Tester".to_string(),
                email: format!("{name}@example.com"),
                status: id != 2,
                ..Default::default()
            })
            .collect()
    }

    fn backend() -> MockBackend {
        MockBackend {
            users: Mutex::new(sample_users()),
            ..Default::default()
        }
    }

    fn new_user() -> NewUser {
        NewUser {
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            email: "dana@example.com".to_string(),
            password: "abcdefgh".to_string(),
            confirm_password: "abcdefgh".to_string(),
            is_admin: false,
            active: true,
        }
    }

    #[tokio::test]
    async fn test_add_user() {
        let store = admin_store();
        let backend = backend();

        let notice = add(&store, &backend, &new_user()).await.unwrap();
        assert_eq!(notice.title, "Success");
        assert_eq!(notice.description, "The user was added successfully.");
        assert_eq!(list(&store, &backend).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_add_user_validation() {
        let store = admin_store();
        let backend = backend();

        let mismatch = NewUser {
            confirm_password: "abcdefgX".to_string(),
            ..new_user()
        };
        assert!(add(&store, &backend, &mismatch).await.unwrap_err().is_validation());

        let short = NewUser {
            password: "abc".to_string(),
            confirm_password: "abc".to_string(),
            ..new_user()
        };
        assert!(add(&store, &backend, &short).await.is_err());

        let bad_email = NewUser {
            email: "dana".to_string(),
            ..new_user()
        };
        assert!(add(&store, &backend, &bad_email).await.is_err());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_user_backend_failure() {
        let store = admin_store();
        let backend = MockBackend {
            fail_writes: true,
            ..backend()
        };
        let err = add(&store, &backend, &new_user()).await.unwrap_err();
        assert_eq!(
            err.notice().unwrap().description,
            "An error occurred while adding the user information."
        );
    }

    #[tokio::test]
    async fn test_update_keeps_unchanged_fields() {
        let store = admin_store();
        let backend = backend();
        let patch = UserPatch {
            active: Some(true),
            last_name: Some("Bishop ".to_string()),
            ..Default::default()
        };

        let notice = update(&store, &backend, 2, &patch).await.unwrap();
        assert_eq!(notice.description, "User information updated successfully.");

        let users = list(&store, &backend).await.unwrap();
        let ben = users.iter().find(|u| u.id == 2).unwrap();
        assert_eq!(ben.first_name, "ben");
        assert_eq!(ben.last_name, "Bishop");
        assert!(ben.status);
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let err = update(&admin_store(), &backend(), 99, &UserPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_reset_and_delete() {
        let store = admin_store();
        let backend = backend();
        let reset = PasswordReset {
            id: 1,
            password: "newpass12".to_string(),
            confirm_password: "newpass12".to_string(),
        };

        let notice = reset_password(&store, &backend, &reset).await.unwrap();
        assert_eq!(notice.description, "The password was updated successfully.");

        let notice = delete(&store, &backend, 3).await.unwrap();
        assert_eq!(notice.description, "The user was deleted successfully.");
        assert_eq!(list(&store, &backend).await.unwrap().len(), 2);
        assert!(backend.calls().contains(&"reset_password 1".to_string()));
    }

    #[tokio::test]
    async fn test_reset_mismatch() {
        let reset = PasswordReset {
            id: 1,
            password: "newpass12".to_string(),
            confirm_password: "newpass13".to_string(),
        };
        let err = reset_password(&admin_store(), &backend(), &reset)
            .await
            .unwrap_err();
        assert_eq!(err.notice().unwrap().title, "Passwords don't match");
    }
}
