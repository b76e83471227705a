use crate::db::migrate::run_pending_migrations;
use crate::db::store::FeedStore;
use crate::errors::AppResult;
use crate::models::pet::NewPet;
use rusqlite::Connection;

/// Meta key recording that the first-run seed has happened.
pub const INITIALIZED_KEY: &str = "isInitialized";

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;
    Ok(())
}

/// Insert the placeholder pet the very first time a database is used.
///
/// The sentinel is written even when seeding is disabled, so turning the
/// option back on later never adds a surprise pet. Returns true when a
/// pet was inserted.
pub fn seed_once<S: FeedStore>(store: &mut S, seed_sample_pet: bool) -> AppResult<bool> {
    if store.meta(INITIALIZED_KEY)?.as_deref() == Some("true") {
        return Ok(false);
    }

    let mut seeded = false;
    if seed_sample_pet && store.pets()?.is_empty() {
        let pet = store.add_pet(&NewPet::new("Pet 1 (edit my name)", "edit my type"), 0)?;
        store.audit("add", &format!("pet #{}", pet.id), "Sample pet inserted on first run");
        seeded = true;
    }

    store.set_meta(INITIALIZED_KEY, "true")?;
    Ok(seeded)
}
