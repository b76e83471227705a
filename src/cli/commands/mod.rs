pub mod add;
pub mod backup;
pub mod bulk;
pub mod config;
pub mod db;
pub mod del;
pub mod edit;
pub mod export;
pub mod feed;
pub mod history;
pub mod import;
pub mod init;
pub mod list;
pub mod log;
pub mod moves;
pub mod show;
pub mod thumb;
pub mod watch;

use crate::config::Config;
use crate::db::initialize::{init_db, seed_once};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::render::RenderOptions;

/// Open the configured database with an up-to-date schema. The placeholder
/// pet is inserted the first time a database is used.
pub(crate) fn open_store(cfg: &Config) -> AppResult<DbPool> {
    let mut pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    seed_once(&mut pool, cfg.seed_sample_pet)?;
    Ok(pool)
}

pub(crate) fn render_options(cfg: &Config, reorder: bool) -> RenderOptions {
    RenderOptions {
        color: !cfg.no_color,
        show_health: cfg.show_health,
        separator: cfg.separator_char.clone(),
        reorder,
    }
}
