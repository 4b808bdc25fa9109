//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands. Values such as
//! section names and vehicle classes are taken as strings and parsed by the
//! library so that the error wording is the same everywhere.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Sign-in arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long)]
    pub password: String,
}

/// Registration arguments.
#[derive(Debug, Args)]
pub struct RegisterCommand {
    /// Given name
    #[arg(long)]
    pub first_name: String,

    /// Family name
    #[arg(long)]
    pub last_name: String,

    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Password (at least 8 characters)
    #[arg(short, long)]
    pub password: String,

    /// Password again
    #[arg(long)]
    pub confirm_password: String,
}

/// Profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the signed-in user's profile
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Update names and email
    Update {
        /// Given name
        #[arg(long)]
        first_name: String,

        /// Family name
        #[arg(long)]
        last_name: String,

        /// Account email
        #[arg(short, long)]
        email: String,
    },

    /// Change the password
    Password {
        /// Current password
        #[arg(long)]
        current: String,

        /// New password
        #[arg(long)]
        new: String,

        /// New password again
        #[arg(long)]
        confirm: String,
    },
}

/// Filing wizard commands.
#[derive(Debug, Subcommand)]
pub enum FilingCommand {
    /// Step 1: look up a carrier by USDOT number
    New {
        /// USDOT number
        #[arg(short, long)]
        usdot: String,

        /// Carrier contact email
        #[arg(short, long)]
        email: String,
    },

    /// Step 2: show or submit mileage and employer number
    Info {
        /// Miles driven last year
        #[arg(short, long)]
        mileage: Option<String>,

        /// Employer identification number (ignored when already known)
        #[arg(long)]
        ein: Option<String>,
    },

    /// Step 3: show the form
    Preview {
        /// Output the carrier data as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Step 3: generate the PDF
    Generate,

    /// Step 4: list sections, or select the given ones and start editing
    Changes {
        /// Sections to change, in order
        sections: Vec<String>,
    },

    /// Step 5: edit the selected sections
    #[command(subcommand)]
    Edit(EditCommand),

    /// Step 6: show the generated filing
    Success,

    /// Step 6: download the generated PDF
    Download {
        /// Directory to save into (defaults to the configured download directory)
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Clear the wizard and start a new filing
    StartOver,

    /// Show which wizard slots are filled and where to resume
    Status {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Edit-step commands.
#[derive(Debug, Subcommand)]
pub enum EditCommand {
    /// Show the current section
    Show,

    /// Go to the next section
    Next,

    /// Go to the previous section
    Prev,

    /// Jump to a selected section
    Goto {
        /// Section name
        section: String,
    },

    /// Set a text field (legal-name, dba-name, physical-street, phone, ...)
    Set {
        /// Field name
        field: String,

        /// New value (may be empty)
        value: String,
    },

    /// Set whether the mailing address is the principal address
    MailingSame {
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        same: bool,
    },

    /// Correct the employer identification number
    Ein {
        /// New employer number
        value: String,
    },

    /// Choose the company operation by letter or label ("" clears)
    Operation {
        /// Letter or label
        value: String,
    },

    /// Toggle an operation classification by letter or label
    Classification {
        /// Letter or label
        value: String,
    },

    /// Toggle a cargo classification by letter or label
    Cargo {
        /// Letter or label
        value: String,
    },

    /// Check or uncheck the "Other" cargo box
    OtherCargo {
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        checked: bool,
    },

    /// Set a vehicle count
    Vehicle {
        /// owned, term-leased or trip-leased
        ownership: String,

        /// Vehicle class (truck, tract, trail, haz_truck, school_1_8, ...)
        class: String,

        /// Count
        value: String,
    },

    /// Set a driver count
    Driver {
        /// Driver field (interstate_within_100_miles, total_cdl, ...)
        field: String,

        /// Count
        value: String,
    },

    /// Save the edits
    Save {
        /// Return to section selection instead of the preview
        #[arg(long)]
        more: bool,
    },
}

/// Filing history commands.
#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List past filings
    List {
        /// Filter by USDOT number or email
        #[arg(short, long)]
        search: Option<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Download a past filing
    Download {
        /// File path as listed
        path: String,

        /// Directory to save into
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Check that a past filing is still available and print its URL
    View {
        /// File path as listed
        path: String,
    },

    /// Export the history as CSV
    Export {
        /// Directory to save into
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

/// Admin console commands.
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Show counters and recent users
    Dashboard {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Manage users
    #[command(subcommand)]
    Users(UsersCommand),

    /// PDF generation statistics
    Stats(StatsCommand),
}

/// User management commands.
#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Add a user
    Add {
        /// Given name
        #[arg(long)]
        first_name: String,

        /// Family name
        #[arg(long)]
        last_name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Initial password
        #[arg(short, long)]
        password: String,

        /// Initial password again
        #[arg(long)]
        confirm_password: String,

        /// Grant administrator access
        #[arg(long)]
        admin: bool,

        /// Allow sign-in right away
        #[arg(long)]
        active: bool,
    },

    /// Update a user
    Update {
        /// User id
        id: i64,

        /// New given name
        #[arg(long)]
        first_name: Option<String>,

        /// New family name
        #[arg(long)]
        last_name: Option<String>,

        /// New email
        #[arg(short, long)]
        email: Option<String>,

        /// Administrator flag
        #[arg(long)]
        admin: Option<bool>,

        /// Active flag
        #[arg(long)]
        active: Option<bool>,
    },

    /// Set a user's password
    ResetPassword {
        /// User id
        id: i64,

        /// New password
        #[arg(short, long)]
        password: String,

        /// New password again
        #[arg(long)]
        confirm_password: String,
    },

    /// Delete a user
    Delete {
        /// User id
        id: i64,
    },
}

/// Statistics arguments. Every filter defaults to "all".
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Dimension to count by (user, day, usdot, month, year)
    #[arg(short, long, default_value = "user")]
    pub by: String,

    /// Only this user
    #[arg(long, default_value = "all")]
    pub user: String,

    /// Only this year
    #[arg(long, default_value = "all")]
    pub year: String,

    /// Only this month (Jan..Dec)
    #[arg(long, default_value = "all")]
    pub month: String,

    /// Only this day of month
    #[arg(long, default_value = "all")]
    pub day: String,

    /// Only this USDOT number
    #[arg(long, default_value = "all")]
    pub usdot: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Notification commands.
#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List notifications, newest first
    List {
        /// Tab to show (all, user, document, system, alert)
        #[arg(short = 't', long, default_value = "all")]
        category: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Mark one notification read
    Read {
        /// Notification id
        id: i64,
    },

    /// Mark every notification read
    ReadAll,

    /// Dismiss one notification
    Dismiss {
        /// Notification id
        id: i64,
    },

    /// Dismiss every notification
    DismissAll,

    /// Poll and print the unread count whenever it changes (Ctrl-C stops)
    Watch,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_edit_command_debug() {
        let cmd = EditCommand::Save { more: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Save"));
        assert!(debug_str.contains("more"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
