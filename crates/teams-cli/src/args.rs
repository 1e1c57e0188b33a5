//! CLI argument definitions using clap
//!
//! - teams notifications [--limit N]
//! - teams messages <conversationId> [--limit N]
//! - teams channel messages <channelId> [--limit N]
//! - teams teams list | teams teams channels <teamId>
//! - teams me
//! - teams login

use clap::{Parser, Subcommand};
use teams_core::config::DEFAULT_PROFILE_NAME;
use teams_core::config::credential::CliOverrides;

/// Default number of messages fetched per command
pub const DEFAULT_MESSAGE_LIMIT: u32 = 20;

#[derive(Parser, Debug, Clone)]
#[command(name = "teams")]
#[command(about = "teams cli - a small Teams helper for human + LLM workflows")]
#[command(
    long_about = r#"teams cli - a small Teams helper for human + LLM workflows

USAGE:
  teams login --ests-auth-persistent <cookie>   # Store session credentials (recommended)
  teams notifications --limit 10                # Latest activity feed entries
  teams messages <conversationId>               # Messages in a chat
  teams channel messages <channelId>            # Posts in a team channel
  teams teams list                              # Teams you belong to
  teams me                                      # Snapshot of teams/chats/feeds

Credentials come from the flags, then ~/.teams-cli/<profile>.json, then the
ESTSAUTHPERSISTENT / REFRESH_TOKEN environment variables."#
)]
#[command(version)]
pub struct Cli {
    /// Use ~/.teams-cli/<name>.json
    #[arg(long, global = true, value_name = "NAME", default_value = DEFAULT_PROFILE_NAME)]
    pub profile: String,

    /// Use a custom profile JSON path
    #[arg(long, global = true, value_name = "PATH")]
    pub profile_json: Option<String>,

    /// ESTSAUTHPERSISTENT session cookie (preferred credential)
    #[arg(long, global = true, value_name = "COOKIE")]
    pub ests_auth_persistent: Option<String>,

    /// Refresh token (deprecated: use --ests-auth-persistent instead)
    #[arg(long, global = true, value_name = "TOKEN")]
    pub refresh_token: Option<String>,

    /// Output machine-readable JSON only (default when not attached to a terminal)
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            refresh_token: self.refresh_token.clone(),
            ests_auth_persistent: self.ests_auth_persistent.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch latest notifications
    Notifications {
        #[command(flatten)]
        limit: LimitArg,
    },

    /// Fetch messages in a conversation
    Messages {
        /// Conversation id (e.g. 19:...@thread.v2)
        conversation_id: String,

        #[command(flatten)]
        limit: LimitArg,
    },

    /// Channel commands
    Channel {
        #[command(subcommand)]
        action: ChannelAction,
    },

    /// Team commands
    Teams {
        #[command(subcommand)]
        action: TeamsAction,
    },

    /// Show current user snapshot
    Me,

    /// Save session credentials to the selected profile
    Login,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ChannelAction {
    /// Fetch messages in a team channel using the channel id
    Messages {
        channel_id: String,

        #[command(flatten)]
        limit: LimitArg,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TeamsAction {
    /// List all teams for the current user
    List,

    /// List channels in a team
    Channels { team_id: String },
}

#[derive(clap::Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitArg {
    /// Number of items to fetch
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_MESSAGE_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["teams", "notifications"]).unwrap();
        assert_eq!(cli.profile, "default");
        assert!(!cli.json);
        assert_eq!(
            cli.command,
            Some(Commands::Notifications {
                limit: LimitArg { limit: 20 }
            })
        );
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "teams",
            "channel",
            "messages",
            "19:abc@thread.tacv2",
            "--limit=5",
            "--json",
            "--profile",
            "work",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.profile, "work");
        assert_eq!(
            cli.command,
            Some(Commands::Channel {
                action: ChannelAction::Messages {
                    channel_id: "19:abc@thread.tacv2".to_string(),
                    limit: LimitArg { limit: 5 },
                }
            })
        );
    }

    #[test]
    fn test_limit_must_be_positive() {
        assert!(Cli::try_parse_from(["teams", "notifications", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["teams", "notifications", "--limit", "-3"]).is_err());
        assert!(Cli::try_parse_from(["teams", "notifications", "--limit", "abc"]).is_err());
    }

    #[test]
    fn test_no_command_is_allowed() {
        let cli = Cli::try_parse_from(["teams", "--no-color"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.no_color);
    }

    #[test]
    fn test_credential_overrides() {
        let cli = Cli::try_parse_from([
            "teams",
            "--ests-auth-persistent",
            "cookie",
            "--refresh-token=tok",
            "me",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.ests_auth_persistent.as_deref(), Some("cookie"));
        assert_eq!(overrides.refresh_token.as_deref(), Some("tok"));
        assert_eq!(cli.command, Some(Commands::Me));
    }
}
