mod client;
mod commands;
mod output;

use clap::{Parser, Subcommand};
use client::{Credentials, FeedboardClient};
use feedboard::config;
use output::{OutputConfig, OutputFormat};
use std::process;

/// CLI for the Feedboard server
#[derive(Parser, Debug)]
#[clap(name = "feedboard-cli", about = "CLI for the Feedboard feedback server")]
struct Cli {
    /// Server URL to connect to
    #[clap(long, env = "FEEDBOARD_URL", global = true)]
    server_url: Option<String>,

    /// Act as this user id
    #[clap(long, env = "FEEDBOARD_USER", global = true)]
    user: Option<String>,

    /// Act as this anonymous session id
    #[clap(long, env = "FEEDBOARD_ANONYMOUS_ID", global = true)]
    anonymous: Option<String>,

    /// Active organization id
    #[clap(long, env = "FEEDBOARD_ORG", global = true)]
    org: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs or counts)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage users
    #[command(subcommand)]
    User(commands::user::UserCommands),
    /// Manage organizations
    #[command(subcommand)]
    Org(commands::org::OrgCommands),
    /// Manage members of the active organization
    #[command(subcommand)]
    Member(commands::member::MemberCommands),
    /// Manage teams
    #[command(subcommand)]
    Team(commands::team::TeamCommands),
    /// Manage boards
    #[command(subcommand)]
    Board(commands::board::BoardCommands),
    /// Manage statuses
    #[command(subcommand)]
    Status(commands::status::StatusCommands),
    /// Manage feedback posts
    #[command(subcommand)]
    Feedback(commands::feedback::FeedbackCommands),
    /// Manage tags
    #[command(subcommand)]
    Tag(commands::tag::TagCommands),
    /// Manage comments
    #[command(subcommand)]
    Comment(commands::comment::CommentCommands),
    /// Vote on feedback and comments
    #[command(subcommand)]
    Vote(commands::vote::VoteCommands),
    /// Manage the changelog
    #[command(subcommand)]
    Changelog(commands::changelog::ChangelogCommands),
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > default
fn resolve_server_url(cli_url: Option<String>) -> String {
    if let Some(url) = cli_url {
        return url;
    }

    let config_dir = config::get_config_dir_path();
    let from_file = config_dir
        .map(|dir| dir.join("config.toml"))
        .and_then(|path| config::config_from_file(Some(path)).ok())
        .and_then(|update| update.server_url);

    from_file.unwrap_or_else(|| config::base_config(None).server_url)
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    if err_string.contains("error sending request")
        || err_string.contains("onnection refused")
        || err_string.contains("tcp connect error")
    {
        return format!("Could not connect to server. Is feedboard running?\n  {}", err_string);
    }

    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let server_url = resolve_server_url(cli.server_url);
    let credentials = Credentials {
        user_id: cli.user,
        anonymous_id: cli.anonymous,
        organization_id: cli.org,
    };
    let client = FeedboardClient::new(server_url, credentials);
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::User(cmd) => commands::user::execute(&client, cmd, &output_config).await,
        Commands::Org(cmd) => commands::org::execute(&client, cmd, &output_config).await,
        Commands::Member(cmd) => commands::member::execute(&client, cmd, &output_config).await,
        Commands::Team(cmd) => commands::team::execute(&client, cmd, &output_config).await,
        Commands::Board(cmd) => commands::board::execute(&client, cmd, &output_config).await,
        Commands::Status(cmd) => commands::status::execute(&client, cmd, &output_config).await,
        Commands::Feedback(cmd) => commands::feedback::execute(&client, cmd, &output_config).await,
        Commands::Tag(cmd) => commands::tag::execute(&client, cmd, &output_config).await,
        Commands::Comment(cmd) => commands::comment::execute(&client, cmd, &output_config).await,
        Commands::Vote(cmd) => commands::vote::execute(&client, cmd, &output_config).await,
        Commands::Changelog(cmd) => commands::changelog::execute(&client, cmd, &output_config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
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
    fn test_explicit_server_url_wins() {
        assert_eq!(resolve_server_url(Some("http://example.com".to_string())), "http://example.com");
    }

    #[test]
    fn test_global_identity_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "feedboard-cli", "feedback", "list", "--tag", "t1", "--tag", "t2", "--org", "o1", "--user", "u1",
        ])
        .unwrap();

        assert_eq!(cli.org.as_deref(), Some("o1"));
        assert_eq!(cli.user.as_deref(), Some("u1"));
        match cli.command {
            Commands::Feedback(commands::feedback::FeedbackCommands::List { tags, .. }) => {
                assert_eq!(tags, vec!["t1".to_string(), "t2".to_string()]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
