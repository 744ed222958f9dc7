use clap::Subcommand;
use feedboard::dto::{CreateStatusDto, UpdateStatusDto};

use super::CommandResult;
use crate::client::FeedboardClient;
use crate::output::{self, OutputConfig};

/// Status workflow commands
#[derive(Subcommand, Debug)]
pub enum StatusCommands {
    /// List statuses in board order
    List,
    Create {
        #[clap(long)]
        name: String,
        #[clap(long, default_value = "#6b7280")]
        color: String,
        /// Position in the workflow; appended when omitted
        #[clap(long)]
        position: Option<i32>,
        /// Make this the status new feedback starts in
        #[clap(long)]
        default: bool,
    },
    Update {
        id: String,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        color: Option<String>,
        #[clap(long)]
        position: Option<i32>,
        /// Make this the default status
        #[clap(long)]
        default: bool,
    },
    Delete { id: String },
}

pub async fn execute(client: &FeedboardClient, cmd: StatusCommands, config: &OutputConfig) -> CommandResult {
    match cmd {
        StatusCommands::List => {
            let statuses = client.list_statuses().await?;
            output::print_statuses(&statuses, config);
        }
        StatusCommands::Create { name, color, position, default } => {
            let dto = CreateStatusDto { name, color, position, is_default: default };
            let status = client.create_status(&dto).await?;
            output::print_status(&status, config);
        }
        StatusCommands::Update { id, name, color, position, default } => {
            let dto = UpdateStatusDto { name, color, position, is_default: default.then_some(true) };
            let status = client.update_status(&id, &dto).await?;
            output::print_status(&status, config);
        }
        StatusCommands::Delete { id } => {
            client.delete_status(&id).await?;
            output::print_success(&format!("Deleted status {}", id), config);
        }
    }
    Ok(())
}
