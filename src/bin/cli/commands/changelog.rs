use clap::Subcommand;
use feedboard::dto::UpdateChangelogDto;

use super::CommandResult;
use crate::client::FeedboardClient;
use crate::output::{self, OutputConfig};

/// Changelog commands
#[derive(Subcommand, Debug)]
pub enum ChangelogCommands {
    /// List all entries, drafts included
    List,
    /// Draft a new entry
    Draft {
        #[clap(long)]
        title: String,
        #[clap(long, default_value = "")]
        body: String,
    },
    Edit {
        id: String,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        body: Option<String>,
    },
    Publish { id: String },
    Unpublish { id: String },
    Delete { id: String },
}

pub async fn execute(client: &FeedboardClient, cmd: ChangelogCommands, config: &OutputConfig) -> CommandResult {
    match cmd {
        ChangelogCommands::List => {
            let entries = client.list_changelog().await?;
            output::print_entries(&entries, config);
        }
        ChangelogCommands::Draft { title, body } => {
            let entry = client.create_changelog(title, body).await?;
            output::print_entry(&entry, config);
        }
        ChangelogCommands::Edit { id, title, body } => {
            let entry = client.update_changelog(&id, &UpdateChangelogDto { title, body }).await?;
            output::print_entry(&entry, config);
        }
        ChangelogCommands::Publish { id } => {
            let entry = client.set_changelog_published(&id, true).await?;
            output::print_entry(&entry, config);
        }
        ChangelogCommands::Unpublish { id } => {
            let entry = client.set_changelog_published(&id, false).await?;
            output::print_entry(&entry, config);
        }
        ChangelogCommands::Delete { id } => {
            client.delete_changelog(&id).await?;
            output::print_success(&format!("Deleted changelog entry {}", id), config);
        }
    }
    Ok(())
}
