use crate::db::{self, DbPool};
use crate::models::{Board, Feedback, Organization, Role, User};
use crate::repo;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

/// Sets up a test database with migrations applied
///
/// Plain ":memory:" gives each pooled connection its own separate database,
/// so migrations run on one connection wouldn't be visible on the others.
/// A unique URI with cache=shared makes every connection in this pool share
/// one in-memory database while staying isolated from other tests.
///
/// ### Returns
///
/// An Arc-wrapped database connection pool connected to the in-memory database
pub fn setup_test_db() -> Arc<DbPool> {
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::setup_database(&database_url).expect("Failed to set up test database");
    Arc::new(pool)
}

/// A freshly created organization together with its owner
pub struct Fixture {
    pub pool: Arc<DbPool>,
    pub org: Organization,
    pub owner: User,
}

impl Fixture {
    pub fn org_id(&self) -> String {
        self.org.get_id()
    }

    /// Adds another user to the organization with the given role
    pub fn add_user(&self, name: &str, role: Role) -> User {
        let user = repo::create_user(&self.pool, format!("{}@example.com", name), name.to_string()).unwrap();
        repo::add_member(&self.pool, &self.org_id(), &user.get_id(), role).unwrap();
        user
    }

    pub fn board(&self, slug: &str, is_public: bool) -> Board {
        repo::create_board(&self.pool, &self.org_id(), slug.to_string(), slug.to_string(), String::new(), is_public).unwrap()
    }

    pub fn feedback(&self, board: &Board, title: &str) -> Feedback {
        repo::create_feedback(&self.pool, &self.org_id(), &board.get_id(), &self.owner.get_id(), title.to_string(), String::new()).unwrap()
    }
}

/// Creates a test database holding one organization (`acme`) and its owner
pub fn setup_fixture() -> Fixture {
    let pool = setup_test_db();
    let (org, owner) = seed_organization(&pool, "acme");
    Fixture { pool, org, owner }
}

/// Creates an organization with the given slug, owned by a new user
pub fn seed_organization(pool: &DbPool, slug: &str) -> (Organization, User) {
    let owner = repo::create_user(pool, format!("owner@{}.example.com", slug), "Owner".to_string()).unwrap();
    let org = repo::create_organization(pool, slug.to_uppercase(), slug.to_string(), &owner.get_id()).unwrap();
    (org, owner)
}

/// Generates strings with arbitrary unicode, including control characters
pub fn arb_messy_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC*",
        ".*",
        Just(String::new()),
        Just("'; DROP TABLE boards; --".to_string()),
    ]
}

/// Generates valid slugs
pub fn arb_slug() -> impl Strategy<Value = String> {
    "[a-z0-9]([a-z0-9-]{0,30}[a-z0-9])?"
}

/// Removes duplicate names, keeping first occurrences
pub fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names.into_iter().filter(|n| seen.insert(n.clone())).collect()
}
