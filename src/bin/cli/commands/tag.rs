use clap::Subcommand;

use super::CommandResult;
use crate::client::FeedboardClient;
use crate::output::{self, OutputConfig};

/// Tag management commands
#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// List all tags
    List,
    /// Create a new tag
    Create {
        /// Name of the tag
        #[clap(long)]
        name: String,
        /// Display color as #rgb or #rrggbb
        #[clap(long, default_value = "#6b7280")]
        color: String,
    },
    Delete { id: String },
    /// Add a tag to a feedback post
    Add {
        /// The feedback ID
        feedback_id: String,
        /// The tag ID
        tag_id: String,
    },
    /// Remove a tag from a feedback post
    Remove {
        /// The feedback ID
        feedback_id: String,
        /// The tag ID
        tag_id: String,
    },
    /// List tags for a specific feedback post
    ListForFeedback {
        /// The feedback ID
        feedback_id: String,
    },
}

/// Executes a tag command
pub async fn execute(client: &FeedboardClient, cmd: TagCommands, config: &OutputConfig) -> CommandResult {
    match cmd {
        TagCommands::List => {
            let tags = client.list_tags().await?;
            output::print_tags(&tags, config);
        }
        TagCommands::Create { name, color } => {
            let tag = client.create_tag(name, color).await?;
            output::print_tag(&tag, config);
        }
        TagCommands::Delete { id } => {
            client.delete_tag(&id).await?;
            output::print_success(&format!("Deleted tag {}", id), config);
        }
        TagCommands::Add { feedback_id, tag_id } => {
            client.add_tag_to_feedback(&feedback_id, &tag_id).await?;
            output::print_success(&format!("Added tag {} to feedback {}", tag_id, feedback_id), config);
        }
        TagCommands::Remove { feedback_id, tag_id } => {
            client.remove_tag_from_feedback(&feedback_id, &tag_id).await?;
            output::print_success(&format!("Removed tag {} from feedback {}", tag_id, feedback_id), config);
        }
        TagCommands::ListForFeedback { feedback_id } => {
            let tags = client.list_tags_for_feedback(&feedback_id).await?;
            output::print_tags(&tags, config);
        }
    }
    Ok(())
}
