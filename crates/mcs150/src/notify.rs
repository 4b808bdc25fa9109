//! Notifications: filtering, actions and background polling.
//!
//! [`NotificationPoller`] refreshes the list on a fixed interval and publishes
//! a new [`Inbox`] on a watch channel whenever the fetched content changes.
//! Consumers subscribe to the channel instead of listening for ad-hoc events.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::{Backend, Notification, NotificationList};
use crate::error::{Error, Result};
use crate::notice::Action;
use crate::session;
use crate::storage::Store;

/// Notification tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    /// Every notification.
    #[default]
    All,
    /// Account events.
    User,
    /// Generated documents.
    Document,
    /// System messages.
    System,
    /// Alerts.
    Alert,
}

impl NotificationCategory {
    /// Every tab, `All` first.
    pub const ALL: [NotificationCategory; 5] = [
        NotificationCategory::All,
        NotificationCategory::User,
        NotificationCategory::Document,
        NotificationCategory::System,
        NotificationCategory::Alert,
    ];

    /// The `type` value the backend uses.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::User => "user",
            Self::Document => "document",
            Self::System => "system",
            Self::Alert => "alert",
        }
    }

    /// Whether `notification` belongs on this tab.
    #[must_use]
    pub fn matches(self, notification: &Notification) -> bool {
        self == Self::All || notification.category.eq_ignore_ascii_case(self.key())
    }
}

impl FromStr for NotificationCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| Error::validation(format!("unknown notification category '{s}'")))
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Parse a notification timestamp (RFC 3339, RFC 2822 or naive UTC).
#[must_use]
pub fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
                .map(|naive| naive.and_utc())
        })
}

/// Coarse "how long ago" text, e.g. `30 minutes ago`.
#[must_use]
pub fn time_ago(raw: &str, now: DateTime<Utc>) -> String {
    let Some(at) = parse_time(raw) else {
        return raw.to_string();
    };
    let minutes = (now - at).num_minutes().max(0);
    let (n, unit) = match minutes {
        0 => return "just now".to_string(),
        m if m < 60 => (m, "minute"),
        m if m < 60 * 24 => (m / 60, "hour"),
        m if m < 60 * 24 * 30 => (m / (60 * 24), "day"),
        m => (m / (60 * 24 * 30), "month"),
    };
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// A fetched notification list, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inbox {
    notifications: Vec<Notification>,
}

impl Inbox {
    /// Sort a fetched list newest first. Unparseable times sort last.
    #[must_use]
    pub fn new(list: NotificationList) -> Self {
        let mut notifications = list.notifications;
        notifications.sort_by_key(|n| Reverse(parse_time(&n.time)));
        Self { notifications }
    }

    /// Every notification, newest first.
    #[must_use]
    pub fn all(&self) -> &[Notification] {
        &self.notifications
    }

    /// Notifications on one tab.
    #[must_use]
    pub fn filter(&self, category: NotificationCategory) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| category.matches(n))
            .collect()
    }

    /// Unread notifications on one tab.
    #[must_use]
    pub fn unread_count(&self, category: NotificationCategory) -> usize {
        self.notifications
            .iter()
            .filter(|n| !n.read && category.matches(n))
            .count()
    }
}

/// Fetch the notification list.
///
/// # Errors
///
/// Returns a redirect without a session and an
/// [`Action::Notifications`] failure when the backend call fails.
pub async fn fetch(store: &Store, backend: &dyn Backend) -> Result<Inbox> {
    session::gate(store)?;
    refetch(backend).await
}

async fn refetch(backend: &dyn Backend) -> Result<Inbox> {
    backend
        .notifications()
        .await
        .map(Inbox::new)
        .map_err(|e| Error::action_failed(Action::Notifications, e))
}

/// Mark one notification read and re-fetch.
///
/// # Errors
///
/// Returns an [`Action::Notifications`] failure when either call fails.
pub async fn mark_read(store: &Store, backend: &dyn Backend, id: i64) -> Result<Inbox> {
    session::gate(store)?;
    backend
        .mark_read(id)
        .await
        .map_err(|e| Error::action_failed(Action::Notifications, e))?;
    refetch(backend).await
}

/// Mark everything read and re-fetch.
///
/// # Errors
///
/// Returns an [`Action::Notifications`] failure when either call fails.
pub async fn mark_all_read(store: &Store, backend: &dyn Backend) -> Result<Inbox> {
    session::gate(store)?;
    backend
        .mark_all_read()
        .await
        .map_err(|e| Error::action_failed(Action::Notifications, e))?;
    refetch(backend).await
}

/// Dismiss one notification and re-fetch.
///
/// # Errors
///
/// Returns an [`Action::Notifications`] failure when either call fails.
pub async fn dismiss(store: &Store, backend: &dyn Backend, id: i64) -> Result<Inbox> {
    session::gate(store)?;
    backend
        .dismiss(id)
        .await
        .map_err(|e| Error::action_failed(Action::Notifications, e))?;
    refetch(backend).await
}

/// Dismiss everything and re-fetch.
///
/// # Errors
///
/// Returns an [`Action::Notifications`] failure when either call fails.
pub async fn dismiss_all(store: &Store, backend: &dyn Backend) -> Result<Inbox> {
    session::gate(store)?;
    backend
        .dismiss_all()
        .await
        .map_err(|e| Error::action_failed(Action::Notifications, e))?;
    refetch(backend).await
}

/// Content fingerprint of a fetched list.
fn fingerprint(list: &NotificationList) -> Result<blake3::Hash> {
    Ok(blake3::hash(&serde_json::to_vec(list)?))
}

/// A cloneable handle for stopping a running poller.
#[derive(Debug, Clone, Default)]
pub struct PollerHandle {
    stop_signal: Arc<AtomicBool>,
}

impl PollerHandle {
    /// Create a new handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal the poller to stop after its current tick.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }
}

/// Periodic notification refresh.
pub struct NotificationPoller {
    backend: Arc<dyn Backend>,
    interval: Duration,
    handle: PollerHandle,
    tx: watch::Sender<Option<Inbox>>,
    last: Option<blake3::Hash>,
}

impl fmt::Debug for NotificationPoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationPoller")
            .field("interval", &self.interval)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl NotificationPoller {
    /// Create a poller and the receiving end of its snapshot channel.
    ///
    /// The channel holds `None` until the first successful fetch.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, interval: Duration) -> (Self, watch::Receiver<Option<Inbox>>) {
        let (tx, rx) = watch::channel(None);
        let poller = Self {
            backend,
            interval,
            handle: PollerHandle::new(),
            tx,
            last: None,
        };
        (poller, rx)
    }

    /// A handle that stops this poller.
    #[must_use]
    pub fn handle(&self) -> PollerHandle {
        self.handle.clone()
    }

    /// Fetch once and publish if the content changed.
    ///
    /// Returns whether a new snapshot was published.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the fetch fails.
    pub async fn poll_once(&mut self) -> Result<bool> {
        let list = self.backend.notifications().await?;
        let hash = fingerprint(&list)?;
        if self.last == Some(hash) {
            debug!("Notifications unchanged");
            return Ok(false);
        }
        self.last = Some(hash);
        let inbox = Inbox::new(list);
        debug!(
            total = inbox.all().len(),
            unread = inbox.unread_count(NotificationCategory::All),
            "Notifications changed"
        );
        self.tx.send_replace(Some(inbox));
        Ok(true)
    }

    /// Poll until stopped or until every receiver is gone.
    ///
    /// The first fetch happens immediately. Failed fetches are logged and the
    /// loop carries on.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_ms = self.interval.as_millis(), "Notification polling started");

        loop {
            ticker.tick().await;
            if self.handle.should_stop() {
                break;
            }
            if self.tx.is_closed() {
                debug!("No notification subscribers left");
                break;
            }
            if let Err(e) = self.poll_once().await {
                warn!(error = %e, "Notification poll failed");
            }
        }

        info!("Notification polling stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;

    use super::*;
    use crate::api::mock::MockBackend;
    use crate::session::make_token;

    fn note(id: i64, category: &str, read: bool, time: &str) -> Notification {
        Notification {
            id,
            category: category.to_string(),
            title: format!("n{id}"),
            read,
            time: time.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Notification> {
        vec![
            note(1, "user", true, "2025-03-01T10:00:00Z"),
            note(2, "document", false, "2025-03-03T10:00:00Z"),
            note(3, "alert", false, "2025-03-02T10:00:00Z"),
            note(4, "user", false, "garbage"),
        ]
    }

    fn admin_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store
            .set_credential(&make_token(&serde_json::json!({
                "firstName": "Ada",
                "lastName": "Admin",
                "email": "ada@example.com",
                "isAdmin": true,
            })))
            .unwrap();
        store
    }

    fn backend() -> MockBackend {
        MockBackend {
            notifications: Mutex::new(sample()),
            ..Default::default()
        }
    }

    #[test]
    fn test_inbox_sorts_newest_first() {
        let inbox = Inbox::new(NotificationList {
            notifications: sample(),
            unread_count: 3,
        });
        let ids: Vec<i64> = inbox.all().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_filter_and_unread_counts() {
        let inbox = Inbox::new(NotificationList {
            notifications: sample(),
            unread_count: 3,
        });

        assert_eq!(inbox.filter(NotificationCategory::All).len(), 4);
        assert_eq!(inbox.filter(NotificationCategory::User).len(), 2);
        assert!(inbox.filter(NotificationCategory::System).is_empty());
        assert_eq!(inbox.unread_count(NotificationCategory::All), 3);
        assert_eq!(inbox.unread_count(NotificationCategory::User), 1);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "Document".parse::<NotificationCategory>().unwrap(),
            NotificationCategory::Document
        );
        assert!("billing".parse::<NotificationCategory>().is_err());
    }

    #[test]
    fn test_time_ago() {
        let now = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();
        assert_eq!(time_ago("2025-03-03T11:30:00Z", now), "30 minutes ago");
        assert_eq!(time_ago("2025-03-03T11:00:00Z", now), "1 hour ago");
        assert_eq!(time_ago("Sat, 01 Mar 2025 12:00:00 GMT", now), "2 days ago");
        assert_eq!(time_ago("2025-03-03 12:00:00", now), "just now");
        assert_eq!(time_ago("whenever", now), "whenever");
    }

    #[tokio::test]
    async fn test_actions_refetch() {
        let store = admin_store();
        let backend = backend();

        let inbox = mark_read(&store, &backend, 2).await.unwrap();
        assert_eq!(inbox.unread_count(NotificationCategory::All), 2);

        let inbox = dismiss(&store, &backend, 3).await.unwrap();
        assert_eq!(inbox.all().len(), 3);

        let inbox = mark_all_read(&store, &backend).await.unwrap();
        assert_eq!(inbox.unread_count(NotificationCategory::All), 0);

        let inbox = dismiss_all(&store, &backend).await.unwrap();
        assert!(inbox.all().is_empty());

        assert_eq!(
            backend.calls(),
            vec![
                "mark_read 2",
                "notifications",
                "dismiss 3",
                "notifications",
                "mark_all_read",
                "notifications",
                "dismiss_all",
                "notifications",
            ]
        );
    }

    #[tokio::test]
    async fn test_regular_user_reaches_notifications() {
        let store = crate::wizard::testing::signed_in_store();
        let backend = backend();

        let inbox = fetch(&store, &backend).await.unwrap();
        assert_eq!(inbox.all().len(), 4);

        let inbox = dismiss(&store, &backend, 1).await.unwrap();
        assert_eq!(inbox.all().len(), 3);
    }

    #[tokio::test]
    async fn test_actions_need_session() {
        let store = Store::open_in_memory().unwrap();
        let err = fetch(&store, &backend()).await.unwrap_err();
        assert_eq!(err.redirect(), Some("/login"));
    }

    #[tokio::test]
    async fn test_failed_action_notice() {
        let store = admin_store();
        let backend = MockBackend {
            fail_writes: true,
            ..backend()
        };
        let err = mark_all_read(&store, &backend).await.unwrap_err();
        assert_eq!(
            err.notice().unwrap().description,
            "Failed to update notifications."
        );
    }

    #[tokio::test]
    async fn test_poll_once_publishes_only_changes() {
        let backend = Arc::new(backend());
        let (mut poller, rx) = NotificationPoller::new(backend.clone(), Duration::from_secs(60));

        assert!(rx.borrow().is_none());
        assert!(poller.poll_once().await.unwrap());
        assert_eq!(rx.borrow().as_ref().unwrap().all().len(), 4);

        assert!(!poller.poll_once().await.unwrap());

        backend.notifications.lock().unwrap().push(note(5, "system", false, "2025-03-04T00:00:00Z"));
        assert!(poller.poll_once().await.unwrap());
        assert_eq!(rx.borrow().as_ref().unwrap().all()[0].id, 5);
    }

    #[tokio::test]
    async fn test_run_stops_on_signal() {
        crate::logging::init_test_logging();
        let backend: Arc<dyn Backend> = Arc::new(backend());
        let (poller, mut rx) = NotificationPoller::new(backend, Duration::from_millis(10));
        let handle = poller.handle();
        let task = tokio::spawn(poller.run());

        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(rx.borrow().is_some());

        handle.stop();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_ends_without_subscribers() {
        let backend: Arc<dyn Backend> = Arc::new(backend());
        let (poller, rx) = NotificationPoller::new(backend, Duration::from_millis(10));
        drop(rx);

        tokio::time::timeout(Duration::from_secs(5), poller.run())
            .await
            .unwrap();
    }
}
