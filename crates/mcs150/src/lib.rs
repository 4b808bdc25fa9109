//! `mcs150` - MCS-150 filings against the filing backend
//!
//! This library provides the filing wizard (USDOT lookup, carrier info, form
//! preview, changes and PDF download), the account pages, filing history and
//! the admin console. Wizard state lives in a local SQLite store so a filing
//! can be picked up again across invocations.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod account;
pub mod admin;
pub mod api;
pub mod carrier;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod history;
pub mod logging;
pub mod notice;
pub mod notify;
pub mod session;
pub mod storage;
pub mod wizard;

pub use api::{Backend, HttpBackend};
pub use carrier::CarrierData;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use notice::{Action, Notice, NoticeKind};
pub use session::Session;
pub use storage::{Slot, Store};
pub use wizard::{Advance, Step};
