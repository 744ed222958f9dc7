use clap::Subcommand;

use super::CommandResult;
use crate::client::FeedboardClient;
use crate::output::{self, OutputConfig};

/// Comment thread commands
#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// List the top-level comments on a post
    List { feedback_id: String },
    /// Comment on a post, or reply with --reply-to
    Add {
        feedback_id: String,
        body: String,
        #[clap(long)]
        reply_to: Option<String>,
    },
    /// List the replies to a comment
    Replies { comment_id: String },
    Edit { comment_id: String, body: String },
    Delete { comment_id: String },
}

pub async fn execute(client: &FeedboardClient, cmd: CommentCommands, config: &OutputConfig) -> CommandResult {
    match cmd {
        CommentCommands::List { feedback_id } => {
            let comments = client.list_comments(&feedback_id).await?;
            output::print_comments(&comments, config);
        }
        CommentCommands::Add { feedback_id, body, reply_to } => {
            let comment = client.create_comment(&feedback_id, body, reply_to).await?;
            output::print_comment(&comment, config);
        }
        CommentCommands::Replies { comment_id } => {
            let replies = client.list_replies(&comment_id).await?;
            output::print_comments(&replies, config);
        }
        CommentCommands::Edit { comment_id, body } => {
            let comment = client.update_comment(&comment_id, body).await?;
            output::print_comment(&comment, config);
        }
        CommentCommands::Delete { comment_id } => {
            client.delete_comment(&comment_id).await?;
            output::print_success(&format!("Deleted comment {}", comment_id), config);
        }
    }
    Ok(())
}
