//! `SQLite` schema definitions for the wizard state database.

/// Named wizard slots. One row per slot, overwritten in place.
pub const CREATE_SLOTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS slots (
    name TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// Authentication credential, kept apart from the wizard slots so that
/// clearing a filing can never touch it.
pub const CREATE_CREDENTIALS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS credentials (
    name TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// Key-value pairs for schema bookkeeping.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_SLOTS_TABLE,
    CREATE_CREDENTIALS_TABLE,
    CREATE_METADATA_TABLE,
];
