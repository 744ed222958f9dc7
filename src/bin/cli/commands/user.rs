use clap::Subcommand;

use super::CommandResult;
use crate::client::FeedboardClient;
use crate::output::{self, OutputConfig};

/// User commands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a new user
    Create {
        #[clap(long)]
        email: String,
        #[clap(long)]
        name: String,
    },
    /// Show a user
    Get { id: String },
    /// List the users of the active organization
    List,
}

pub async fn execute(client: &FeedboardClient, cmd: UserCommands, config: &OutputConfig) -> CommandResult {
    match cmd {
        UserCommands::Create { email, name } => {
            let user = client.create_user(email, name).await?;
            output::print_user(&user, config);
        }
        UserCommands::Get { id } => {
            let user = client.get_user(&id).await?;
            output::print_user(&user, config);
        }
        UserCommands::List => {
            let users = client.list_users().await?;
            output::print_users(&users, config);
        }
    }
    Ok(())
}
