//! The admin console.
//!
//! Every operation here first checks for an administrator session with
//! [`crate::session::gate_admin`].

pub mod dashboard;
pub mod paginate;
pub mod stats;
pub mod users;

pub use dashboard::{dashboard, Dashboard};
pub use paginate::Page;
pub use stats::{Dimension, StatsFilter, Summary};
pub use users::{NewUser, PasswordReset, UserPatch};
