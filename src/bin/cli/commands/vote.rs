use clap::{Args, Subcommand};

use super::CommandResult;
use crate::client::{FeedboardClient, VoteOn};
use crate::output::{self, OutputConfig};

/// The post or comment a vote command applies to
#[derive(Args, Debug)]
pub struct VoteTargetArgs {
    /// The feedback or comment ID
    id: String,
    /// Treat the ID as a comment instead of a feedback post
    #[clap(long)]
    comment: bool,
}

impl VoteTargetArgs {
    fn on(&self) -> VoteOn {
        if self.comment { VoteOn::Comment } else { VoteOn::Feedback }
    }
}

/// Voting commands
#[derive(Subcommand, Debug)]
pub enum VoteCommands {
    /// Show the vote count
    Count(VoteTargetArgs),
    /// Upvote
    Up(VoteTargetArgs),
    /// Withdraw your vote
    Withdraw(VoteTargetArgs),
}

pub async fn execute(client: &FeedboardClient, cmd: VoteCommands, config: &OutputConfig) -> CommandResult {
    match cmd {
        VoteCommands::Count(target) => {
            let summary = client.get_votes(target.on(), &target.id).await?;
            output::print_vote_summary(&summary, config);
        }
        VoteCommands::Up(target) => {
            let vote = client.vote(target.on(), &target.id).await?;
            output::print_vote(&vote, config);
        }
        VoteCommands::Withdraw(target) => {
            client.unvote(target.on(), &target.id).await?;
            output::print_success(&format!("Withdrew vote on {}", target.id), config);
        }
    }
    Ok(())
}
