//! Terminal rendering and keyboard input loop — the collaborator the core
//! pipeline publishes into and the command interpreter is driven from.
//! Nothing in `core-cmd`, `core-emit`, or below knows this crate exists.

mod backend;
mod input;
mod view;

pub use backend::{CrosstermBackend, TerminalBackend, TerminalGuard};
pub use input::{translate, InputAction};
pub use view::render;

use anyhow::Result;
use core_cmd::{apply_nav, backspace_command, push_command_char, Outcome, Session};
use crossterm::cursor::MoveTo;
use crossterm::event::{poll, read, Event};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use std::io::stdout;
use std::time::Duration;
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const PAGE_SIZE: usize = 20;

/// Drives the session until `quit` or a fatal terminal error. Each tick:
/// render the current model, poll for one input event, translate and
/// apply it. `refresh` is handled identically to any other redraw trigger
/// since every tick redraws unconditionally.
///
/// Reads the terminal size directly through `crossterm` rather than a
/// `&mut dyn TerminalBackend` — the caller typically still holds a
/// `TerminalGuard` borrowed from that same backend for the loop's whole
/// lifetime, and a second mutable borrow here would conflict with it.
pub fn run(session: &mut Session) -> Result<()> {
    info!(target: "term", "render_loop_started");
    loop {
        let (width, height) = crossterm::terminal::size()?;
        draw(session, width, height)?;

        if !poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = read()? else {
            continue;
        };

        match translate(key) {
            InputAction::Nav(nav) => apply_nav(session.model(), nav, PAGE_SIZE),
            InputAction::Char(c) => push_command_char(session.model(), c),
            InputAction::Backspace => backspace_command(session.model()),
            InputAction::Submit => {
                let line = session.model().command_buffer();
                if session.execute_line(&line) == Outcome::Quit {
                    info!(target: "term", "render_loop_quit");
                    return Ok(());
                }
            }
            InputAction::None => {}
        }
    }
}

fn draw(session: &Session, width: u16, height: u16) -> Result<()> {
    let lines = render(session.model(), width, height);
    let mut out = stdout();
    execute!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for (row, line) in lines.iter().enumerate() {
        execute!(out, MoveTo(0, row as u16), Print(line))?;
    }
    Ok(())
}
