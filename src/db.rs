use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use anyhow::{anyhow, Result};
use std::time::Duration;
use tracing::{debug, info};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Per-connection SQLite settings applied whenever the pool opens a connection
///
/// SQLite only enforces `ON DELETE CASCADE` and the other foreign key clauses
/// when `foreign_keys` is enabled, and the pragma is scoped to a single
/// connection, so it has to be set on every one the pool hands out.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Creates a connection pool for the given SQLite database URL
///
/// ### Errors
///
/// Returns an error if the pool cannot open its initial connections
pub fn init_pool(database_url: &str) -> Result<DbPool> {
    debug!("Opening connection pool for {}", database_url);

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas {
            busy_timeout: Duration::from_secs(5),
        }))
        .build(manager)?;

    Ok(pool)
}

/// Runs the embedded migrations on a single connection
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Failed to run migrations: {}", e))?;

    if applied.is_empty() {
        debug!("Database schema is up to date");
    } else {
        info!("Applied {} migrations", applied.len());
    }

    Ok(())
}

/// Opens a pool and brings its schema up to date
pub fn setup_database(database_url: &str) -> Result<DbPool> {
    let pool = init_pool(database_url)?;
    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;
    drop(conn);
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::prelude::*;
    use diesel::sql_types::{Integer, Text};

    #[derive(QueryableByName, Debug)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName, Debug)]
    struct ForeignKeys {
        #[diesel(sql_type = Integer)]
        foreign_keys: i32,
    }

    fn memory_url() -> String {
        format!("file:db_test_{}?mode=memory&cache=shared", uuid::Uuid::new_v4())
    }

    #[test]
    fn test_setup_database_creates_tables() {
        let pool = setup_database(&memory_url()).unwrap();
        let mut conn = pool.get().unwrap();

        let tables: Vec<TableName> =
            diesel::sql_query("SELECT name FROM sqlite_master WHERE type='table'")
                .load(&mut conn)
                .unwrap();

        for expected in [
            "users", "organizations", "members", "teams", "team_members",
            "boards", "statuses", "feedback", "tags", "feedback_tags",
            "comments", "votes", "changelog_entries",
        ] {
            assert!(
                tables.iter().any(|t| t.name == expected),
                "Table '{}' not found in database",
                expected
            );
        }
    }

    #[test]
    fn test_pool_connections_enforce_foreign_keys() {
        let pool = init_pool(&memory_url()).unwrap();

        // every connection, not just the first, gets the pragma
        let conns: Vec<_> = (0..3).map(|_| pool.get().unwrap()).collect();
        for mut conn in conns {
            let row: ForeignKeys = diesel::sql_query("PRAGMA foreign_keys")
                .get_result(&mut conn)
                .unwrap();
            assert_eq!(row.foreign_keys, 1);
        }
    }

    #[test]
    fn test_run_migrations_is_idempotent() {
        let pool = setup_database(&memory_url()).unwrap();
        let mut conn = pool.get().unwrap();
        assert!(run_migrations(&mut conn).is_ok());
    }
}
