use clap::Subcommand;
use feedboard::models::Role;

use super::CommandResult;
use crate::client::FeedboardClient;
use crate::output::{self, OutputConfig};

/// Membership commands for the active organization
#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// List members and their roles
    List,
    /// Add a user to the organization
    Add {
        user_id: String,
        /// member, admin or owner
        #[clap(long, default_value = "member")]
        role: Role,
    },
    /// Change a member's role
    SetRole { user_id: String, role: Role },
    /// Remove a member, or leave when given your own id
    Remove { user_id: String },
}

pub async fn execute(client: &FeedboardClient, cmd: MemberCommands, config: &OutputConfig) -> CommandResult {
    match cmd {
        MemberCommands::List => {
            let members = client.list_members().await?;
            output::print_members(&members, config);
        }
        MemberCommands::Add { user_id, role } => {
            let member = client.add_member(user_id, role).await?;
            output::print_member(&member, config);
        }
        MemberCommands::SetRole { user_id, role } => {
            let member = client.update_member_role(&user_id, role).await?;
            output::print_member(&member, config);
        }
        MemberCommands::Remove { user_id } => {
            client.remove_member(&user_id).await?;
            output::print_success(&format!("Removed member {}", user_id), config);
        }
    }
    Ok(())
}
