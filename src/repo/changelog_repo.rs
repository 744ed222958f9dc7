use crate::db::DbPool;
use crate::dto::UpdateChangelogDto;
use crate::models::ChangelogEntry;
use crate::schema::changelog_entries;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use anyhow::Result;
use tracing::{instrument, info};

/// Drafts a new changelog entry; entries start unpublished
#[instrument(skip(pool, body))]
pub fn create_entry(pool: &DbPool, organization_id: &str, title: String, body: String) -> Result<ChangelogEntry> {
    let conn = &mut pool.get()?;

    let entry = ChangelogEntry::new(organization_id.to_string(), title, body);

    diesel::insert_into(changelog_entries::table)
        .values(&entry)
        .execute(conn)?;

    info!("Created changelog entry with id: {}", entry.get_id());

    Ok(entry)
}

/// Retrieves a changelog entry by id within an organization
#[instrument(skip(pool))]
pub fn get_entry(pool: &DbPool, organization_id: &str, entry_id: &str) -> Result<Option<ChangelogEntry>> {
    let conn = &mut pool.get()?;

    let result = changelog_entries::table
        .filter(changelog_entries::id.eq(entry_id))
        .filter(changelog_entries::organization_id.eq(organization_id))
        .select(ChangelogEntry::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists every entry of an organization, drafts included, newest first
#[instrument(skip(pool))]
pub fn list_entries(pool: &DbPool, organization_id: &str) -> Result<Vec<ChangelogEntry>> {
    let conn = &mut pool.get()?;

    let result = changelog_entries::table
        .filter(changelog_entries::organization_id.eq(organization_id))
        .order((changelog_entries::created_at.desc(), changelog_entries::id.desc()))
        .select(ChangelogEntry::as_select())
        .load(conn)?;

    Ok(result)
}

/// Lists published entries, most recently published first
#[instrument(skip(pool))]
pub fn list_published_entries(pool: &DbPool, organization_id: &str) -> Result<Vec<ChangelogEntry>> {
    let conn = &mut pool.get()?;

    let result = changelog_entries::table
        .filter(changelog_entries::organization_id.eq(organization_id))
        .filter(changelog_entries::published_at.is_not_null())
        .order((changelog_entries::published_at.desc(), changelog_entries::id.desc()))
        .select(ChangelogEntry::as_select())
        .load(conn)?;

    Ok(result)
}

#[derive(AsChangeset)]
#[diesel(table_name = changelog_entries)]
struct EntryChanges<'a> {
    title: Option<&'a str>,
    body: Option<&'a str>,
    updated_at: NaiveDateTime,
}

fn refetch(conn: &mut SqliteConnection, entry_id: &str, updated: usize) -> QueryResult<Option<ChangelogEntry>> {
    if updated == 0 {
        return Ok(None);
    }

    changelog_entries::table
        .find(entry_id)
        .select(ChangelogEntry::as_select())
        .first(conn)
        .map(Some)
}

/// Edits the title or body of an entry
///
/// ### Returns
///
/// The updated entry, or `Ok(None)` if it is not in the organization
#[instrument(skip(pool, update))]
pub fn update_entry(pool: &DbPool, organization_id: &str, entry_id: &str, update: &UpdateChangelogDto) -> Result<Option<ChangelogEntry>> {
    let conn = &mut pool.get()?;

    let changes = EntryChanges {
        title: update.title.as_deref(),
        body: update.body.as_deref(),
        updated_at: Utc::now().naive_utc(),
    };

    let updated = diesel::update(
        changelog_entries::table
            .filter(changelog_entries::id.eq(entry_id))
            .filter(changelog_entries::organization_id.eq(organization_id)),
    )
    .set(&changes)
    .execute(conn)?;

    Ok(refetch(conn, entry_id, updated)?)
}

/// Publishes an entry, stamping `published_at` with the current time
#[instrument(skip(pool))]
pub fn publish_entry(pool: &DbPool, organization_id: &str, entry_id: &str) -> Result<Option<ChangelogEntry>> {
    let conn = &mut pool.get()?;
    let now = Utc::now().naive_utc();

    let updated = diesel::update(
        changelog_entries::table
            .filter(changelog_entries::id.eq(entry_id))
            .filter(changelog_entries::organization_id.eq(organization_id)),
    )
    .set((
        changelog_entries::published_at.eq(Some(now)),
        changelog_entries::updated_at.eq(now),
    ))
    .execute(conn)?;

    if updated > 0 {
        info!("Published changelog entry {}", entry_id);
    }

    Ok(refetch(conn, entry_id, updated)?)
}

/// Returns an entry to draft state
#[instrument(skip(pool))]
pub fn unpublish_entry(pool: &DbPool, organization_id: &str, entry_id: &str) -> Result<Option<ChangelogEntry>> {
    let conn = &mut pool.get()?;

    let updated = diesel::update(
        changelog_entries::table
            .filter(changelog_entries::id.eq(entry_id))
            .filter(changelog_entries::organization_id.eq(organization_id)),
    )
    .set((
        changelog_entries::published_at.eq(None::<NaiveDateTime>),
        changelog_entries::updated_at.eq(Utc::now().naive_utc()),
    ))
    .execute(conn)?;

    Ok(refetch(conn, entry_id, updated)?)
}

/// Deletes an entry, returning whether it existed
#[instrument(skip(pool))]
pub fn delete_entry(pool: &DbPool, organization_id: &str, entry_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(
        changelog_entries::table
            .filter(changelog_entries::id.eq(entry_id))
            .filter(changelog_entries::organization_id.eq(organization_id)),
    )
    .execute(conn)?;

    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seed_organization, setup_fixture};

    #[test]
    fn test_entries_start_as_drafts() {
        let fx = setup_fixture();

        let entry = create_entry(&fx.pool, &fx.org_id(), "v1.2".to_string(), "Dark mode".to_string()).unwrap();

        assert!(!entry.is_published());
        assert_eq!(list_entries(&fx.pool, &fx.org_id()).unwrap(), vec![entry]);
        assert!(list_published_entries(&fx.pool, &fx.org_id()).unwrap().is_empty());
    }

    #[test]
    fn test_publish_and_unpublish() {
        let fx = setup_fixture();
        let entry = create_entry(&fx.pool, &fx.org_id(), "v1.2".to_string(), String::new()).unwrap();

        let published = publish_entry(&fx.pool, &fx.org_id(), &entry.get_id()).unwrap().unwrap();
        assert!(published.is_published());
        assert_eq!(list_published_entries(&fx.pool, &fx.org_id()).unwrap(), vec![published]);

        let draft = unpublish_entry(&fx.pool, &fx.org_id(), &entry.get_id()).unwrap().unwrap();
        assert!(!draft.is_published());
        assert!(list_published_entries(&fx.pool, &fx.org_id()).unwrap().is_empty());
    }

    #[test]
    fn test_list_entries_newest_first() {
        let fx = setup_fixture();
        let older = create_entry(&fx.pool, &fx.org_id(), "v1".to_string(), String::new()).unwrap();
        let newer = create_entry(&fx.pool, &fx.org_id(), "v2".to_string(), String::new()).unwrap();

        let ids: Vec<String> = list_entries(&fx.pool, &fx.org_id()).unwrap().iter().map(|e| e.get_id()).collect();
        assert_eq!(ids, vec![newer.get_id(), older.get_id()]);
    }

    #[test]
    fn test_update_entry() {
        let fx = setup_fixture();
        let entry = create_entry(&fx.pool, &fx.org_id(), "v1".to_string(), "old".to_string()).unwrap();

        let update = UpdateChangelogDto { body: Some("new".to_string()), ..Default::default() };
        let updated = update_entry(&fx.pool, &fx.org_id(), &entry.get_id(), &update).unwrap().unwrap();

        assert_eq!(updated.get_title(), "v1");
        assert_eq!(updated.get_body(), "new");
    }

    #[test]
    fn test_entry_is_isolated_by_organization() {
        let fx = setup_fixture();
        let (other, _) = seed_organization(&fx.pool, "globex");
        let entry = create_entry(&fx.pool, &fx.org_id(), "v1".to_string(), String::new()).unwrap();

        assert!(get_entry(&fx.pool, &other.get_id(), &entry.get_id()).unwrap().is_none());
        assert!(publish_entry(&fx.pool, &other.get_id(), &entry.get_id()).unwrap().is_none());
        assert!(!delete_entry(&fx.pool, &other.get_id(), &entry.get_id()).unwrap());
        assert!(!get_entry(&fx.pool, &fx.org_id(), &entry.get_id()).unwrap().unwrap().is_published());
    }

    #[test]
    fn test_delete_entry() {
        let fx = setup_fixture();
        let entry = create_entry(&fx.pool, &fx.org_id(), "v1".to_string(), String::new()).unwrap();

        assert!(delete_entry(&fx.pool, &fx.org_id(), &entry.get_id()).unwrap());
        assert!(get_entry(&fx.pool, &fx.org_id(), &entry.get_id()).unwrap().is_none());
    }
}
