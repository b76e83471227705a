use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::{init_db, seed_once};
use crate::db::pool::DbPool;
use crate::db::store::FeedStore;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database with all pending migrations
///  - the placeholder pet, the very first time
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing rPetFeed…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &db_path);

    let mut pool = DbPool::new(&db_path)?;
    init_db(&pool.conn)?;

    if seed_once(&mut pool, cfg.seed_sample_pet)? {
        println!("🐾 Added a sample pet, rename it with `rpetfeed edit 1 --name ...`");
    }

    println!("✅ Database initialized at {}", &db_path);

    pool.audit(
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    );

    println!("🎉 rPetFeed initialization completed!");
    Ok(())
}
