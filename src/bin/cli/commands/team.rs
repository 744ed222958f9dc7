use clap::Subcommand;

use super::CommandResult;
use crate::client::FeedboardClient;
use crate::output::{self, OutputConfig};

/// Team commands
#[derive(Subcommand, Debug)]
pub enum TeamCommands {
    List,
    Create {
        #[clap(long)]
        name: String,
    },
    Delete { id: String },
    /// List the users in a team
    Members { team_id: String },
    /// Add an organization member to a team
    Join { team_id: String, user_id: String },
    /// Remove a user from a team
    Leave { team_id: String, user_id: String },
}

pub async fn execute(client: &FeedboardClient, cmd: TeamCommands, config: &OutputConfig) -> CommandResult {
    match cmd {
        TeamCommands::List => {
            let teams = client.list_teams().await?;
            output::print_teams(&teams, config);
        }
        TeamCommands::Create { name } => {
            let team = client.create_team(name).await?;
            output::print_team(&team, config);
        }
        TeamCommands::Delete { id } => {
            client.delete_team(&id).await?;
            output::print_success(&format!("Deleted team {}", id), config);
        }
        TeamCommands::Members { team_id } => {
            let users = client.list_team_members(&team_id).await?;
            output::print_users(&users, config);
        }
        TeamCommands::Join { team_id, user_id } => {
            let link = client.add_team_member(&team_id, &user_id).await?;
            output::print_team_member(&link, config);
        }
        TeamCommands::Leave { team_id, user_id } => {
            client.remove_team_member(&team_id, &user_id).await?;
            output::print_success(&format!("Removed {} from team {}", user_id, team_id), config);
        }
    }
    Ok(())
}
