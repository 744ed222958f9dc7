use clap::Subcommand;
use feedboard::dto::{
    CreateFeedbackDto, FeedbackQueryDtoBuilder, FeedbackSort, SubmitFeedbackDto, UpdateFeedbackDto,
};

use super::CommandResult;
use crate::client::FeedboardClient;
use crate::output::{self, OutputConfig};

/// Sort order accepted on the command line
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum SortArg {
    Newest,
    Oldest,
    Top,
}

impl From<SortArg> for FeedbackSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Newest => FeedbackSort::Newest,
            SortArg::Oldest => FeedbackSort::Oldest,
            SortArg::Top => FeedbackSort::Top,
        }
    }
}

/// Feedback commands
#[derive(Subcommand, Debug)]
pub enum FeedbackCommands {
    /// List feedback with optional filters
    List {
        #[clap(long)]
        board: Option<String>,
        #[clap(long)]
        status: Option<String>,
        #[clap(long)]
        author: Option<String>,
        /// Only posts carrying every given tag (repeatable)
        #[clap(long = "tag")]
        tags: Vec<String>,
        #[clap(long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,
        #[clap(long)]
        page: Option<u32>,
        #[clap(long)]
        per_page: Option<u32>,
    },
    /// Post feedback to a board
    Create {
        #[clap(long)]
        board: String,
        #[clap(long)]
        title: String,
        #[clap(long, default_value = "")]
        description: String,
    },
    /// Submit feedback through the public widget of a board
    Submit {
        org_slug: String,
        board_slug: String,
        #[clap(long)]
        title: String,
        #[clap(long, default_value = "")]
        description: String,
    },
    /// Show a post with its vote and comment counts and tags
    Show { id: String },
    /// Edit a post or move it to another status
    Update {
        id: String,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long)]
        status: Option<String>,
    },
    Delete { id: String },
}

pub async fn execute(client: &FeedboardClient, cmd: FeedbackCommands, config: &OutputConfig) -> CommandResult {
    match cmd {
        FeedbackCommands::List { board, status, author, tags, sort, page, per_page } => {
            let mut builder = FeedbackQueryDtoBuilder::new().tag_ids(tags).sort(sort.into());
            if let Some(board) = board {
                builder = builder.board_id(board);
            }
            if let Some(status) = status {
                builder = builder.status_id(status);
            }
            if let Some(author) = author {
                builder = builder.author_id(author);
            }
            if let Some(page) = page {
                builder = builder.page(page);
            }
            if let Some(per_page) = per_page {
                builder = builder.per_page(per_page);
            }

            let page = client.list_feedback(&builder.build()).await?;
            output::print_feedback_page(&page, config);
        }
        FeedbackCommands::Create { board, title, description } => {
            let dto = CreateFeedbackDto { board_id: board, title, description };
            let post = client.create_feedback(&dto).await?;
            output::print_feedback(&post, config);
        }
        FeedbackCommands::Submit { org_slug, board_slug, title, description } => {
            let dto = SubmitFeedbackDto { title, description };
            let post = client.submit_feedback(&org_slug, &board_slug, &dto).await?;
            output::print_feedback(&post, config);
        }
        FeedbackCommands::Show { id } => {
            let summary = client.get_feedback_summary(&id).await?;
            output::print_feedback_summary(&summary, config);
        }
        FeedbackCommands::Update { id, title, description, status } => {
            let dto = UpdateFeedbackDto { title, description, status_id: status };
            let post = client.update_feedback(&id, &dto).await?;
            output::print_feedback(&post, config);
        }
        FeedbackCommands::Delete { id } => {
            client.delete_feedback(&id).await?;
            output::print_success(&format!("Deleted feedback {}", id), config);
        }
    }
    Ok(())
}
