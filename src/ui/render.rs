//! Terminal rendering of a [`ListView`].
//!
//! Every pet is rendered into its own text block, cached by pet id. A
//! patch re-renders one block and the header; siblings keep their cached
//! text untouched.

use crate::core::pets::fmt_interval;
use crate::core::view::{ListView, PetView, Reconciled};
use crate::models::health::{AggregateState, FeedHealth};
use crate::utils::colors::{BOLD, CYAN, GREEN, GREY, RED, color_for_health, paint};
use crate::utils::formatting::{pad_right, plural, truncate};

const NAME_W: usize = 28;
const RULE_W: usize = 60;

pub const EMPTY_PLACEHOLDER: &str = "No pets yet. Add one with: rpetfeed add <name> <type>";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub color: bool,
    pub show_health: bool,
    pub separator: String,
    /// Show move hints next to every pet.
    pub reorder: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            show_health: true,
            separator: "-".to_string(),
            reorder: false,
        }
    }
}

/// One history cell: `M/D` on fed days, a dot otherwise; today in brackets.
fn history_line(entry: &PetView, opts: &RenderOptions) -> String {
    entry
        .history
        .iter()
        .map(|cell| {
            let text = if cell.fed {
                paint(GREEN, &cell.date.format("%-m/%-d").to_string(), opts.color)
            } else {
                paint(GREY, "·", opts.color)
            };
            if cell.interactive {
                format!("[{text}]")
            } else {
                text
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn status_text(entry: &PetView, opts: &RenderOptions) -> String {
    if entry.fed_today {
        return paint(GREEN, "fed today", opts.color);
    }

    match entry.days_since_last_feed {
        None => paint(GREY, "never fed", opts.color),
        Some(days) => {
            let mut s = format!("last fed {} ago", plural(days, "day"));
            if days == 0 {
                s = "last fed today".to_string();
            }
            if opts.show_health && entry.health != FeedHealth::None {
                s = format!("{s} ({})", entry.health.label());
                return paint(color_for_health(entry.health), &s, opts.color);
            }
            s
        }
    }
}

/// Text block of a single pet at display position `index` of `total`.
pub fn render_pet(entry: &PetView, index: usize, total: usize, opts: &RenderOptions) -> String {
    let check = if entry.fed_today { "[x]" } else { "[ ]" };
    let label = truncate(&format!("{} ({})", entry.name, entry.kind), NAME_W);
    let image = if entry.has_image { "*" } else { " " };

    let interval = if entry.ideal_min_days.is_some() || entry.ideal_max_days.is_some() {
        fmt_interval(entry.ideal_min_days, entry.ideal_max_days)
    } else {
        String::new()
    };

    let mut first = format!(
        "{:>3} {} {} {} #{:<4} {:<8} {}",
        index + 1,
        check,
        image,
        pad_right(&label, NAME_W),
        entry.pet_id,
        interval,
        status_text(entry, opts)
    );

    if opts.reorder {
        let up = if index > 0 { "▲" } else { " " };
        let down = if index + 1 < total { "▼" } else { " " };
        first.push_str(&paint(CYAN, &format!("  {up}{down}"), opts.color));
    }

    format!("{}\n      {}", first.trim_end(), history_line(entry, opts))
}

fn render_header(view: &ListView, opts: &RenderOptions) -> String {
    let title = paint(BOLD, &format!("🐾 Feedings for {}", view.today), opts.color);
    match view.aggregate {
        Some(state) => {
            let glyph = match state {
                AggregateState::All => paint(GREEN, state.glyph(), opts.color),
                AggregateState::None => paint(RED, state.glyph(), opts.color),
                AggregateState::Some => state.glyph().to_string(),
            };
            format!("{title}\n{glyph} all pets fed today ({})", state.as_str())
        }
        None => title,
    }
}

/// Rendered list with a per-pet block cache.
pub struct ListRenderer {
    opts: RenderOptions,
    header: String,
    blocks: Vec<(i64, String)>,
}

impl ListRenderer {
    pub fn new(opts: RenderOptions) -> Self {
        Self {
            opts,
            header: String::new(),
            blocks: Vec::new(),
        }
    }

    /// Re-render every block.
    pub fn rebuild(&mut self, view: &ListView) {
        let total = view.entries.len();
        self.header = render_header(view, &self.opts);
        self.blocks = view
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.pet_id, render_pet(e, i, total, &self.opts)))
            .collect();
    }

    /// Re-render the block of `pet_id` and the header. Returns false when
    /// the pet has no cached block, in which case nothing changed.
    pub fn patch(&mut self, view: &ListView, pet_id: i64) -> bool {
        let Some(index) = view.position(pet_id) else {
            return false;
        };
        let Some(slot) = self.blocks.iter_mut().find(|(id, _)| *id == pet_id) else {
            return false;
        };

        slot.1 = render_pet(&view.entries[index], index, view.entries.len(), &self.opts);
        self.header = render_header(view, &self.opts);
        true
    }

    /// Follow what the reconciler did to the view.
    pub fn apply(&mut self, view: &ListView, outcome: Reconciled) {
        match outcome {
            Reconciled::Patched(id) if self.patch(view, id) => {}
            _ => self.rebuild(view),
        }
    }

    pub fn block(&self, pet_id: i64) -> Option<&str> {
        self.blocks
            .iter()
            .find(|(id, _)| *id == pet_id)
            .map(|(_, b)| b.as_str())
    }

    pub fn output(&self) -> String {
        let rule = self.opts.separator.repeat(RULE_W);
        let mut out = String::new();
        out.push_str(&self.header);
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');

        if self.blocks.is_empty() {
            out.push_str(&paint(GREY, EMPTY_PLACEHOLDER, self.opts.color));
            out.push('\n');
            return out;
        }

        for (_, block) in &self.blocks {
            out.push_str(block);
            out.push('\n');
        }
        out.push_str(&rule);
        out.push('\n');
        out
    }
}
