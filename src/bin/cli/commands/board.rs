use clap::Subcommand;
use feedboard::dto::{CreateBoardDto, UpdateBoardDto};

use super::CommandResult;
use crate::client::FeedboardClient;
use crate::output::{self, OutputConfig};

/// Board management commands
#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// List all boards
    List,
    /// Create a new board
    Create {
        #[clap(long)]
        name: String,
        #[clap(long)]
        slug: String,
        #[clap(long, default_value = "")]
        description: String,
        /// Show the board on the public surface
        #[clap(long)]
        public: bool,
    },
    /// Show a board
    Get { id: String },
    /// Change a board; omitted options are left as they are
    Update {
        id: String,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        slug: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long)]
        public: Option<bool>,
    },
    /// Delete a board and all of its feedback
    Delete { id: String },
}

pub async fn execute(client: &FeedboardClient, cmd: BoardCommands, config: &OutputConfig) -> CommandResult {
    match cmd {
        BoardCommands::List => {
            let boards = client.list_boards().await?;
            output::print_boards(&boards, config);
        }
        BoardCommands::Create { name, slug, description, public } => {
            let dto = CreateBoardDto { name, slug, description, is_public: public };
            let board = client.create_board(&dto).await?;
            output::print_board(&board, config);
        }
        BoardCommands::Get { id } => {
            let board = client.get_board(&id).await?;
            output::print_board(&board, config);
        }
        BoardCommands::Update { id, name, slug, description, public } => {
            let dto = UpdateBoardDto { name, slug, description, is_public: public };
            let board = client.update_board(&id, &dto).await?;
            output::print_board(&board, config);
        }
        BoardCommands::Delete { id } => {
            client.delete_board(&id).await?;
            output::print_success(&format!("Deleted board {}", id), config);
        }
    }
    Ok(())
}
