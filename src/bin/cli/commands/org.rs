use clap::Subcommand;

use super::CommandResult;
use crate::client::FeedboardClient;
use crate::output::{self, OutputConfig};

/// Organization commands
#[derive(Subcommand, Debug)]
pub enum OrgCommands {
    /// Create an organization owned by the current user
    Create {
        /// Display name
        #[clap(long)]
        name: String,
        /// URL handle, used by the public board
        #[clap(long)]
        slug: String,
    },
    /// Show an organization the current user belongs to
    Get { id: String },
    /// List the current user's organizations
    List,
}

pub async fn execute(client: &FeedboardClient, cmd: OrgCommands, config: &OutputConfig) -> CommandResult {
    match cmd {
        OrgCommands::Create { name, slug } => {
            let org = client.create_organization(name, slug).await?;
            output::print_organization(&org, config);
        }
        OrgCommands::Get { id } => {
            let org = client.get_organization(&id).await?;
            output::print_organization(&org, config);
        }
        OrgCommands::List => {
            let orgs = client.list_my_organizations().await?;
            output::print_organizations(&orgs, config);
        }
    }
    Ok(())
}
