use clap::ValueEnum;
use feedboard::dto::{FeedbackPage, FeedbackSummary, VoteSummary};
use feedboard::models::{
    Board, ChangelogEntry, Comment, Feedback, Member, Organization, Status, Tag, Team, TeamMember, User, Vote,
};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs or counts)
    pub quiet: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Renders rows as left-aligned columns under a header line
fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| rows.iter().map(|r| r[i].chars().count()).max().unwrap_or(0).max(h.len()))
        .collect();

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.to_vec())];
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

/// Prints a list as a table, as ids only in quiet mode, or as JSON
fn print_list<T: Serialize>(
    items: &[T],
    config: &OutputConfig,
    noun: &str,
    headers: &[&str],
    row: impl Fn(&T) -> Vec<String>,
) {
    match config.format {
        OutputFormat::Human => {
            if items.is_empty() {
                if !config.quiet {
                    println!("No {} found.", noun);
                }
                return;
            }
            if config.quiet {
                for item in items {
                    println!("{}", row(item)[0]);
                }
                return;
            }
            let rows: Vec<Vec<String>> = items.iter().map(&row).collect();
            println!("{}", format_table(headers, &rows));
        }
        OutputFormat::Json => print_json(items),
    }
}

/// Prints one record as `Label: value` lines, as its id in quiet mode, or as JSON
fn print_record<T: Serialize>(value: &T, config: &OutputConfig, fields: Vec<(&str, String)>) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                if let Some((_, id)) = fields.first() {
                    println!("{}", id);
                }
                return;
            }
            let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 1;
            for (label, value) in &fields {
                println!("{:<width$} {}", format!("{}:", label), value, width = width);
            }
        }
        OutputFormat::Json => print_json(value),
    }
}

pub fn print_users(users: &[User], config: &OutputConfig) {
    print_list(users, config, "users", &["ID", "NAME", "EMAIL"], |u| {
        vec![u.get_id(), u.get_name(), u.get_email()]
    });
}

pub fn print_user(user: &User, config: &OutputConfig) {
    print_record(user, config, vec![
        ("ID", user.get_id()),
        ("Name", user.get_name()),
        ("Email", user.get_email()),
        ("Created", user.get_created_at().to_string()),
    ]);
}

pub fn print_organizations(orgs: &[Organization], config: &OutputConfig) {
    print_list(orgs, config, "organizations", &["ID", "SLUG", "NAME"], |o| {
        vec![o.get_id(), o.get_slug(), o.get_name()]
    });
}

pub fn print_organization(org: &Organization, config: &OutputConfig) {
    print_record(org, config, vec![
        ("ID", org.get_id()),
        ("Name", org.get_name()),
        ("Slug", org.get_slug()),
        ("Created", org.get_created_at().to_string()),
    ]);
}

pub fn print_members(members: &[Member], config: &OutputConfig) {
    print_list(members, config, "members", &["USER", "ROLE", "SINCE"], |m| {
        vec![m.get_user_id(), m.get_role().to_string(), m.get_created_at().format("%Y-%m-%d").to_string()]
    });
}

pub fn print_member(member: &Member, config: &OutputConfig) {
    print_record(member, config, vec![
        ("User", member.get_user_id()),
        ("Role", member.get_role().to_string()),
    ]);
}

pub fn print_teams(teams: &[Team], config: &OutputConfig) {
    print_list(teams, config, "teams", &["ID", "NAME"], |t| vec![t.get_id(), t.get_name()]);
}

pub fn print_team(team: &Team, config: &OutputConfig) {
    print_record(team, config, vec![("ID", team.get_id()), ("Name", team.get_name())]);
}

pub fn print_team_member(link: &TeamMember, config: &OutputConfig) {
    print_record(link, config, vec![("User", link.get_user_id()), ("Team", link.get_team_id())]);
}

pub fn print_boards(boards: &[Board], config: &OutputConfig) {
    print_list(boards, config, "boards", &["ID", "SLUG", "NAME", "PUBLIC"], |b| {
        vec![b.get_id(), b.get_slug(), b.get_name(), if b.get_is_public() { "yes" } else { "no" }.to_string()]
    });
}

pub fn print_board(board: &Board, config: &OutputConfig) {
    print_record(board, config, vec![
        ("ID", board.get_id()),
        ("Name", board.get_name()),
        ("Slug", board.get_slug()),
        ("Public", board.get_is_public().to_string()),
        ("Description", board.get_description()),
        ("Updated", board.get_updated_at().to_string()),
    ]);
}

pub fn print_statuses(statuses: &[Status], config: &OutputConfig) {
    print_list(statuses, config, "statuses", &["ID", "POS", "NAME", "COLOR", "DEFAULT"], |s| {
        vec![
            s.get_id(),
            s.get_position().to_string(),
            s.get_name(),
            s.get_color(),
            if s.get_is_default() { "*" } else { "" }.to_string(),
        ]
    });
}

pub fn print_status(status: &Status, config: &OutputConfig) {
    print_record(status, config, vec![
        ("ID", status.get_id()),
        ("Name", status.get_name()),
        ("Color", status.get_color()),
        ("Position", status.get_position().to_string()),
        ("Default", status.get_is_default().to_string()),
    ]);
}

/// Prints one page of feedback with a page footer
pub fn print_feedback_page(page: &FeedbackPage, config: &OutputConfig) {
    if config.format == OutputFormat::Json {
        print_json(page);
        return;
    }
    print_list(&page.items, config, "feedback", &["ID", "TITLE", "AUTHOR", "CREATED"], |f| {
        vec![f.get_id(), f.get_title(), f.get_author_id(), f.get_created_at().format("%Y-%m-%d %H:%M").to_string()]
    });
    if !config.quiet && !page.items.is_empty() {
        println!("\npage {} ({} per page), {} total", page.page, page.per_page, page.total);
    }
}

pub fn print_feedback(post: &Feedback, config: &OutputConfig) {
    print_record(post, config, vec![
        ("ID", post.get_id()),
        ("Title", post.get_title()),
        ("Board", post.get_board_id()),
        ("Status", post.get_status_id().unwrap_or_else(|| "-".to_string())),
        ("Author", post.get_author_id()),
        ("Description", post.get_description()),
    ]);
}

pub fn print_feedback_summary(summary: &FeedbackSummary, config: &OutputConfig) {
    let post = &summary.feedback;
    let tags = summary.tags.iter().map(Tag::get_name).collect::<Vec<_>>().join(", ");
    print_record(summary, config, vec![
        ("ID", post.get_id()),
        ("Title", post.get_title()),
        ("Status", post.get_status_id().unwrap_or_else(|| "-".to_string())),
        ("Votes", summary.vote_count.to_string()),
        ("Comments", summary.comment_count.to_string()),
        ("Tags", tags),
        ("Description", post.get_description()),
    ]);
}

pub fn print_tags(tags: &[Tag], config: &OutputConfig) {
    print_list(tags, config, "tags", &["ID", "NAME", "COLOR"], |t| vec![t.get_id(), t.get_name(), t.get_color()]);
}

pub fn print_tag(tag: &Tag, config: &OutputConfig) {
    print_record(tag, config, vec![("ID", tag.get_id()), ("Name", tag.get_name()), ("Color", tag.get_color())]);
}

pub fn print_comments(comments: &[Comment], config: &OutputConfig) {
    print_list(comments, config, "comments", &["ID", "AUTHOR", "BODY"], |c| {
        let body = c.get_body();
        let first_line = body.lines().next().unwrap_or_default().to_string();
        vec![c.get_id(), c.get_author_id(), first_line]
    });
}

pub fn print_comment(comment: &Comment, config: &OutputConfig) {
    print_record(comment, config, vec![
        ("ID", comment.get_id()),
        ("Feedback", comment.get_feedback_id()),
        ("Reply to", comment.get_parent_id().unwrap_or_else(|| "-".to_string())),
        ("Author", comment.get_author_id()),
        ("Body", comment.get_body()),
    ]);
}

pub fn print_vote(vote: &Vote, config: &OutputConfig) {
    print_record(vote, config, vec![("ID", vote.get_id()), ("Voter", vote.get_voter_id())]);
}

pub fn print_vote_summary(summary: &VoteSummary, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human if config.quiet => println!("{}", summary.count),
        OutputFormat::Human => {
            let mine = if summary.has_voted { " (including yours)" } else { "" };
            println!("{} votes{}", summary.count, mine);
        }
        OutputFormat::Json => print_json(summary),
    }
}

pub fn print_entries(entries: &[ChangelogEntry], config: &OutputConfig) {
    print_list(entries, config, "changelog entries", &["ID", "TITLE", "PUBLISHED"], |e| {
        let published = e
            .get_published_at()
            .map_or_else(|| "draft".to_string(), |at| at.format("%Y-%m-%d").to_string());
        vec![e.get_id(), e.get_title(), published]
    });
}

pub fn print_entry(entry: &ChangelogEntry, config: &OutputConfig) {
    let published = entry.get_published_at().map_or_else(|| "draft".to_string(), |at| at.to_string());
    print_record(entry, config, vec![
        ("ID", entry.get_id()),
        ("Title", entry.get_title()),
        ("Published", published),
        ("Body", entry.get_body()),
    ]);
}

/// Prints a confirmation message unless in quiet or JSON mode
pub fn print_success(message: &str, config: &OutputConfig) {
    if config.format == OutputFormat::Human && !config.quiet {
        println!("{}", message);
    }
}
