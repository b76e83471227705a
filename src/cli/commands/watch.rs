use super::{open_store, render_options};
use crate::config::Config;
use crate::core::scheduler::{MidnightScheduler, SystemClock};
use crate::core::session::{HELP, Session, SessionEvent, Step, parse_action};
use crate::errors::AppResult;
use crate::ui::messages::{error, info};
use crate::ui::render::ListRenderer;
use std::io::{self, BufRead};
use std::ops::ControlFlow;
use std::sync::mpsc;
use std::thread;

/// Handle the `watch` command.
///
/// Stdin lines and midnight ticks are funnelled into one channel and
/// handled one at a time on this thread, which is the only one touching
/// the database.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = open_store(cfg)?;
    let mut session = Session::open(pool, cfg.now().date(), cfg.history_days)?;

    let mut renderer = ListRenderer::new(render_options(cfg, false));
    renderer.rebuild(session.view());
    print!("{}", renderer.output());
    println!("{HELP}");

    let (tx, rx) = mpsc::channel::<SessionEvent>();

    // stdin reader
    let input_tx = tx.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(SessionEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = input_tx.send(SessionEvent::Closed);
    });

    // midnight ticks
    let scheduler = MidnightScheduler::new(SystemClock).spawn(move |at| {
        if tx.send(SessionEvent::Midnight(at)).is_ok() {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    });

    for event in rx {
        let outcome = match event {
            SessionEvent::Input(line) => match parse_action(&line) {
                Ok(None) => continue,
                Ok(Some(action)) => session.apply(action, cfg.now()),
                Err(e) => {
                    error(e);
                    continue;
                }
            },
            SessionEvent::Midnight(at) => session.roll_day(at).map(Step::Updated),
            SessionEvent::Closed => break,
        };

        match outcome {
            Ok(Step::Updated(how)) => {
                log::debug!("view updated: {how:?}");
                renderer.apply(session.view(), how);
                print!("{}", renderer.output());
            }
            Ok(Step::Unchanged) => info("Nothing changed."),
            Ok(Step::Help) => println!("{HELP}"),
            Ok(Step::Quit) => break,
            Err(e) => error(e),
        }
    }

    scheduler.cancel();
    Ok(())
}
