//! Command-line interface for mcs150.
//!
//! This module provides the CLI structure for the `mcs150` binary. Each page
//! of the filing site is a subcommand; the binary prints notices and the route
//! the user lands on next.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AdminCommand, ConfigCommand, EditCommand, FilingCommand, HistoryCommand, LoginCommand,
    NotificationsCommand, OutputFormat, ProfileCommand, RegisterCommand, StatsCommand,
    UsersCommand,
};

/// mcs150 - MCS-150 filings from the command line
///
/// Looks up a motor carrier by USDOT number, walks through the MCS-150 form,
/// and has the filing backend render the PDF. Administrators can manage
/// users, notifications and usage statistics.
#[derive(Debug, Parser)]
#[command(name = "mcs150")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in
    Login(LoginCommand),

    /// Request an account
    Register(RegisterCommand),

    /// Sign out and clear the wizard
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// View or change the signed-in user's profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// The MCS-150 filing wizard
    #[command(subcommand)]
    Filing(FilingCommand),

    /// Past filings
    #[command(subcommand)]
    History(HistoryCommand),

    /// Notifications for the signed-in user
    #[command(subcommand)]
    Notifications(NotificationsCommand),

    /// Admin console
    #[command(subcommand)]
    Admin(AdminCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "mcs150");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&["mcs150", "-q", "logout"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["mcs150", "logout"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["mcs150", "-v", "logout"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["mcs150", "-vv", "logout"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["mcs150", "-c", "/custom/config.toml", "logout"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_filing_new() {
        let cli = parse(&["mcs150", "filing", "new", "-u", "1234567", "-e", "ops@example.com"]);
        match cli.command {
            Command::Filing(FilingCommand::New { usdot, email }) => {
                assert_eq!(usdot, "1234567");
                assert_eq!(email, "ops@example.com");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_changes_keeps_order() {
        let cli = parse(&["mcs150", "filing", "changes", "phone", "name"]);
        assert!(matches!(
            cli.command,
            Command::Filing(FilingCommand::Changes { ref sections }) if sections == &["phone", "name"]
        ));
    }

    #[test]
    fn test_parse_edit_commands() {
        let cli = parse(&["mcs150", "filing", "edit", "set", "legal-name", "ACME LLC"]);
        assert!(matches!(
            cli.command,
            Command::Filing(FilingCommand::Edit(EditCommand::Set { .. }))
        ));

        let cli = parse(&["mcs150", "filing", "edit", "mailing-same", "true"]);
        assert!(matches!(
            cli.command,
            Command::Filing(FilingCommand::Edit(EditCommand::MailingSame { same: true }))
        ));

        let cli = parse(&["mcs150", "filing", "edit", "save", "--more"]);
        assert!(matches!(
            cli.command,
            Command::Filing(FilingCommand::Edit(EditCommand::Save { more: true }))
        ));
    }

    #[test]
    fn test_parse_admin_stats_defaults() {
        let cli = parse(&["mcs150", "admin", "stats", "--by", "month", "--year", "2025"]);
        match cli.command {
            Command::Admin(AdminCommand::Stats(stats)) => {
                assert_eq!(stats.by, "month");
                assert_eq!(stats.year, "2025");
                assert_eq!(stats.user, "all");
                assert_eq!(stats.format, OutputFormat::Table);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_user_update_flags() {
        let cli = parse(&["mcs150", "admin", "users", "update", "7", "--active", "false"]);
        assert!(matches!(
            cli.command,
            Command::Admin(AdminCommand::Users(UsersCommand::Update {
                id: 7,
                active: Some(false),
                admin: None,
                ..
            }))
        ));
    }

    #[test]
    fn test_parse_notifications_outside_admin() {
        let cli = parse(&["mcs150", "notifications", "list", "-t", "document"]);
        assert!(matches!(
            cli.command,
            Command::Notifications(NotificationsCommand::List { ref category, .. })
                if category == "document"
        ));

        assert!(Cli::try_parse_from(["mcs150", "admin", "notifications", "list"]).is_err());
    }

    #[test]
    fn test_parse_history_list_format() {
        let cli = parse(&["mcs150", "history", "list", "-f", "json", "-p", "2"]);
        assert!(matches!(
            cli.command,
            Command::History(HistoryCommand::List {
                page: 2,
                format: OutputFormat::Json,
                ..
            })
        ));
    }
}
