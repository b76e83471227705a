use super::{open_store, render_options};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calendar::trailing_window;
use crate::core::pets::fmt_interval;
use crate::core::view::build_pet_view;
use crate::db::store::FeedStore;
use crate::errors::{AppError, AppResult};
use crate::ui::render::render_pet;
use crate::utils::colors::{CYAN, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { id } = cmd {
        let pool = open_store(cfg)?;
        let pet = pool.pet(*id)?.ok_or(AppError::PetNotFound(*id))?;
        let feeds = pool.feeds_for_pet(*id)?;

        let today = cfg.now().date();
        let window = trailing_window(today, cfg.history_days);
        let view = build_pet_view(&pet, &feeds, &window, today)?;

        let position = pool
            .pets()?
            .iter()
            .position(|p| p.id == pet.id)
            .unwrap_or_default();

        println!("{}• Pet:{} #{} {}", CYAN, RESET, pet.id, pet.label());
        println!("{}• Position:{} {} (order key {})", CYAN, RESET, position + 1, pet.order);
        println!(
            "{}• Ideal interval:{} {}",
            CYAN,
            RESET,
            fmt_interval(pet.ideal_min_days, pet.ideal_max_days)
        );
        println!(
            "{}• Thumbnail:{} {}",
            CYAN,
            RESET,
            if pet.image.is_some() { "yes" } else { "no" }
        );
        println!("{}• Feedings:{} {}", CYAN, RESET, feeds.len());
        if let Some(last) = feeds.iter().max_by_key(|f| f.fed_at) {
            println!("{}• Last feeding:{} {}", CYAN, RESET, last.stamp_str());
        }
        println!();
        println!("{}", render_pet(&view, 0, 1, &render_options(cfg, false)));
    }

    Ok(())
}
