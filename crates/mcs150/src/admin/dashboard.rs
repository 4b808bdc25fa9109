//! Dashboard counters and recent sign-ups.

use serde::Serialize;

use crate::api::{AdminUser, Backend, DashboardStats};
use crate::error::{Error, Result};
use crate::notice::Action;
use crate::session;
use crate::storage::Store;

/// Everything the dashboard page shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// Aggregate counters.
    pub stats: DashboardStats,
    /// Most recently created accounts, as ordered by the backend.
    pub recent_users: Vec<AdminUser>,
}

/// Load the dashboard.
///
/// # Errors
///
/// Returns a redirect without an admin session and an
/// [`Action::LoadDashboard`] failure when either backend call fails.
pub async fn dashboard(store: &Store, backend: &dyn Backend) -> Result<Dashboard> {
    session::gate_admin(store)?;
    let fail = |e| Error::action_failed(Action::LoadDashboard, e);
    let stats = backend.dashboard_stats().await.map_err(fail)?;
    let recent_users = backend.recent_users().await.map_err(fail)?;
    Ok(Dashboard {
        stats,
        recent_users,
    })
}
