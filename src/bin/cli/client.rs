use feedboard::auth::{ANONYMOUS_ID_HEADER, ORGANIZATION_ID_HEADER, USER_ID_HEADER};
use feedboard::dto::{
    AddMemberDto, CreateBoardDto, CreateChangelogDto, CreateCommentDto, CreateFeedbackDto,
    CreateOrganizationDto, CreateStatusDto, CreateTagDto, CreateTeamDto, CreateUserDto, FeedbackPage,
    FeedbackQueryDto, FeedbackSummary, SubmitFeedbackDto, UpdateBoardDto, UpdateChangelogDto,
    UpdateCommentDto, UpdateFeedbackDto, UpdateMemberRoleDto, UpdateStatusDto, VoteSummary,
};
use feedboard::models::{
    Board, ChangelogEntry, Comment, Feedback, Member, Organization, Role, Status, Tag, Team, TeamMember, User, Vote,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error type for CLI client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server returned an error status with a message body
    #[error("Server error ({}): {message}", .status.as_u16())]
    Server { status: reqwest::StatusCode, message: String },
    /// Network/connection/request error
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// Who the CLI acts as, sent in the identity headers
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub user_id: Option<String>,
    pub anonymous_id: Option<String>,
    pub organization_id: Option<String>,
}

/// What a vote command is aimed at
#[derive(Debug, Clone, Copy)]
pub enum VoteOn {
    Feedback,
    Comment,
}

impl VoteOn {
    fn collection(self) -> &'static str {
        match self {
            VoteOn::Feedback => "feedback",
            VoteOn::Comment => "comments",
        }
    }
}

/// Builds query parameters from a FeedbackQueryDto
///
/// `tag_ids` is sent as a repeated key.
pub fn build_query_params(query: &FeedbackQueryDto) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = Vec::new();

    if let Some(ref id) = query.board_id {
        params.push(("board_id", id.clone()));
    }
    if let Some(ref id) = query.status_id {
        params.push(("status_id", id.clone()));
    }
    if let Some(ref id) = query.author_id {
        params.push(("author_id", id.clone()));
    }
    for tag_id in &query.tag_ids {
        params.push(("tag_ids", tag_id.clone()));
    }
    params.push(("sort", query.sort.to_string()));
    if let Some(page) = query.page {
        params.push(("page", page.to_string()));
    }
    if let Some(per_page) = query.per_page {
        params.push(("per_page", per_page.to_string()));
    }

    params
}

/// HTTP client wrapper for communicating with the Feedboard server
pub struct FeedboardClient {
    /// The base URL of the server (e.g. "http://localhost:3000")
    base_url: String,
    credentials: Credentials,
    client: Client,
}

impl FeedboardClient {
    pub fn new(base_url: String, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            client: Client::new(),
        }
    }

    /// Starts a request to `path` carrying the configured identity headers
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(ref id) = self.credentials.user_id {
            builder = builder.header(USER_ID_HEADER, id);
        }
        if let Some(ref id) = self.credentials.anonymous_id {
            builder = builder.header(ANONYMOUS_ID_HEADER, id);
        }
        if let Some(ref id) = self.credentials.organization_id {
            builder = builder.header(ORGANIZATION_ID_HEADER, id);
        }
        builder
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?.check().await?;
        Ok(response.json().await?)
    }

    /// Sends a request whose success response has no body
    async fn execute(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        builder.send().await?.check().await?;
        Ok(())
    }

    // ── Users and organizations ──────────────────────────────────────

    pub async fn create_user(&self, email: String, name: String) -> Result<User, ClientError> {
        self.fetch(self.request(Method::POST, "/users").json(&CreateUserDto { email, name })).await
    }

    pub async fn get_user(&self, id: &str) -> Result<User, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/users/{}", id))).await
    }

    /// Lists the users of the active organization
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.fetch(self.request(Method::GET, "/users")).await
    }

    pub async fn create_organization(&self, name: String, slug: String) -> Result<Organization, ClientError> {
        let dto = CreateOrganizationDto { name, slug };
        self.fetch(self.request(Method::POST, "/organizations").json(&dto)).await
    }

    pub async fn get_organization(&self, id: &str) -> Result<Organization, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/organizations/{}", id))).await
    }

    pub async fn list_my_organizations(&self) -> Result<Vec<Organization>, ClientError> {
        self.fetch(self.request(Method::GET, "/me/organizations")).await
    }

    // ── Members and teams ────────────────────────────────────────────

    pub async fn list_members(&self) -> Result<Vec<Member>, ClientError> {
        self.fetch(self.request(Method::GET, "/members")).await
    }

    pub async fn add_member(&self, user_id: String, role: Role) -> Result<Member, ClientError> {
        self.fetch(self.request(Method::POST, "/members").json(&AddMemberDto { user_id, role })).await
    }

    pub async fn update_member_role(&self, user_id: &str, role: Role) -> Result<Member, ClientError> {
        let builder = self.request(Method::PATCH, &format!("/members/{}", user_id)).json(&UpdateMemberRoleDto { role });
        self.fetch(builder).await
    }

    pub async fn remove_member(&self, user_id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/members/{}", user_id))).await
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>, ClientError> {
        self.fetch(self.request(Method::GET, "/teams")).await
    }

    pub async fn create_team(&self, name: String) -> Result<Team, ClientError> {
        self.fetch(self.request(Method::POST, "/teams").json(&CreateTeamDto { name })).await
    }

    pub async fn delete_team(&self, id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/teams/{}", id))).await
    }

    pub async fn list_team_members(&self, team_id: &str) -> Result<Vec<User>, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/teams/{}/members", team_id))).await
    }

    pub async fn add_team_member(&self, team_id: &str, user_id: &str) -> Result<TeamMember, ClientError> {
        self.fetch(self.request(Method::POST, &format!("/teams/{}/members/{}", team_id, user_id))).await
    }

    pub async fn remove_team_member(&self, team_id: &str, user_id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/teams/{}/members/{}", team_id, user_id))).await
    }

    // ── Boards and statuses ──────────────────────────────────────────

    pub async fn list_boards(&self) -> Result<Vec<Board>, ClientError> {
        self.fetch(self.request(Method::GET, "/boards")).await
    }

    pub async fn create_board(&self, dto: &CreateBoardDto) -> Result<Board, ClientError> {
        self.fetch(self.request(Method::POST, "/boards").json(dto)).await
    }

    pub async fn get_board(&self, id: &str) -> Result<Board, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/boards/{}", id))).await
    }

    pub async fn update_board(&self, id: &str, dto: &UpdateBoardDto) -> Result<Board, ClientError> {
        self.fetch(self.request(Method::PATCH, &format!("/boards/{}", id)).json(dto)).await
    }

    pub async fn delete_board(&self, id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/boards/{}", id))).await
    }

    pub async fn list_statuses(&self) -> Result<Vec<Status>, ClientError> {
        self.fetch(self.request(Method::GET, "/statuses")).await
    }

    pub async fn create_status(&self, dto: &CreateStatusDto) -> Result<Status, ClientError> {
        self.fetch(self.request(Method::POST, "/statuses").json(dto)).await
    }

    pub async fn update_status(&self, id: &str, dto: &UpdateStatusDto) -> Result<Status, ClientError> {
        self.fetch(self.request(Method::PATCH, &format!("/statuses/{}", id)).json(dto)).await
    }

    pub async fn delete_status(&self, id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/statuses/{}", id))).await
    }

    // ── Feedback ─────────────────────────────────────────────────────

    pub async fn list_feedback(&self, query: &FeedbackQueryDto) -> Result<FeedbackPage, ClientError> {
        let params = build_query_params(query);
        self.fetch(self.request(Method::GET, "/feedback").query(&params)).await
    }

    pub async fn create_feedback(&self, dto: &CreateFeedbackDto) -> Result<Feedback, ClientError> {
        self.fetch(self.request(Method::POST, "/feedback").json(dto)).await
    }

    pub async fn get_feedback_summary(&self, id: &str) -> Result<FeedbackSummary, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/feedback/{}/summary", id))).await
    }

    pub async fn update_feedback(&self, id: &str, dto: &UpdateFeedbackDto) -> Result<Feedback, ClientError> {
        self.fetch(self.request(Method::PATCH, &format!("/feedback/{}", id)).json(dto)).await
    }

    pub async fn delete_feedback(&self, id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/feedback/{}", id))).await
    }

    /// Submits feedback through the public widget route
    pub async fn submit_feedback(&self, org_slug: &str, board_slug: &str, dto: &SubmitFeedbackDto) -> Result<Feedback, ClientError> {
        let path = format!("/public/{}/boards/{}/feedback", org_slug, board_slug);
        self.fetch(self.request(Method::POST, &path).json(dto)).await
    }

    // ── Tags ─────────────────────────────────────────────────────────

    pub async fn list_tags(&self) -> Result<Vec<Tag>, ClientError> {
        self.fetch(self.request(Method::GET, "/tags")).await
    }

    pub async fn create_tag(&self, name: String, color: String) -> Result<Tag, ClientError> {
        self.fetch(self.request(Method::POST, "/tags").json(&CreateTagDto { name, color })).await
    }

    pub async fn delete_tag(&self, id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/tags/{}", id))).await
    }

    pub async fn list_tags_for_feedback(&self, feedback_id: &str) -> Result<Vec<Tag>, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/feedback/{}/tags", feedback_id))).await
    }

    pub async fn add_tag_to_feedback(&self, feedback_id: &str, tag_id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::POST, &format!("/feedback/{}/tags/{}", feedback_id, tag_id))).await
    }

    pub async fn remove_tag_from_feedback(&self, feedback_id: &str, tag_id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/feedback/{}/tags/{}", feedback_id, tag_id))).await
    }

    // ── Comments and votes ───────────────────────────────────────────

    pub async fn list_comments(&self, feedback_id: &str) -> Result<Vec<Comment>, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/feedback/{}/comments", feedback_id))).await
    }

    pub async fn create_comment(&self, feedback_id: &str, body: String, parent_id: Option<String>) -> Result<Comment, ClientError> {
        let builder = self
            .request(Method::POST, &format!("/feedback/{}/comments", feedback_id))
            .json(&CreateCommentDto { body, parent_id });
        self.fetch(builder).await
    }

    pub async fn list_replies(&self, comment_id: &str) -> Result<Vec<Comment>, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/comments/{}/replies", comment_id))).await
    }

    pub async fn update_comment(&self, comment_id: &str, body: String) -> Result<Comment, ClientError> {
        let builder = self.request(Method::PATCH, &format!("/comments/{}", comment_id)).json(&UpdateCommentDto { body });
        self.fetch(builder).await
    }

    pub async fn delete_comment(&self, comment_id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/comments/{}", comment_id))).await
    }

    pub async fn get_votes(&self, on: VoteOn, id: &str) -> Result<VoteSummary, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/{}/{}/votes", on.collection(), id))).await
    }

    pub async fn vote(&self, on: VoteOn, id: &str) -> Result<Vote, ClientError> {
        self.fetch(self.request(Method::POST, &format!("/{}/{}/votes", on.collection(), id))).await
    }

    pub async fn unvote(&self, on: VoteOn, id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/{}/{}/votes", on.collection(), id))).await
    }

    // ── Changelog ────────────────────────────────────────────────────

    pub async fn list_changelog(&self) -> Result<Vec<ChangelogEntry>, ClientError> {
        self.fetch(self.request(Method::GET, "/changelog")).await
    }

    pub async fn create_changelog(&self, title: String, body: String) -> Result<ChangelogEntry, ClientError> {
        self.fetch(self.request(Method::POST, "/changelog").json(&CreateChangelogDto { title, body })).await
    }

    pub async fn update_changelog(&self, id: &str, dto: &UpdateChangelogDto) -> Result<ChangelogEntry, ClientError> {
        self.fetch(self.request(Method::PATCH, &format!("/changelog/{}", id)).json(dto)).await
    }

    /// Publishes (`publish = true`) or unpublishes an entry
    pub async fn set_changelog_published(&self, id: &str, publish: bool) -> Result<ChangelogEntry, ClientError> {
        let action = if publish { "publish" } else { "unpublish" };
        self.fetch(self.request(Method::POST, &format!("/changelog/{}/{}", id, action))).await
    }

    pub async fn delete_changelog(&self, id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/changelog/{}", id))).await
    }
}
