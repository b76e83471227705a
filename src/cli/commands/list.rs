use super::{open_store, render_options};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::view::{render_all, render_as_of};
use crate::errors::AppResult;
use crate::ui::render::ListRenderer;
use crate::utils::date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        reorder,
        date: on,
        json,
    } = cmd
    {
        let pool = open_store(cfg)?;

        let view = match on {
            Some(s) => render_as_of(&pool, date::parse_date(s)?, cfg.history_days)?,
            None => render_all(&pool, cfg.now().date(), cfg.history_days)?,
        };

        if *json {
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }

        let mut renderer = ListRenderer::new(render_options(cfg, *reorder));
        renderer.rebuild(&view);
        print!("{}", renderer.output());

        if *reorder && view.entries.len() > 1 {
            println!("Move with: rpetfeed move <id> --up | --down");
        }
    }

    Ok(())
}
