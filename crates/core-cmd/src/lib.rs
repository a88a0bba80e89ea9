//! Parses the line-language (`open`, `goto`, `view …`, `refresh`, `quit`)
//! and drives the emitter / presentation model in response. The terminal
//! rendering loop and keyboard input are collaborators that call into this
//! crate; nothing here touches a terminal directly.

mod error;
mod grammar;
mod nav;

pub use error::CommandError;
pub use grammar::{parse, Command};
pub use nav::{apply_nav, backspace_command, push_command_char, NavKey};

use core_elf::ArchTuple;
use core_emit::Emitter;
use core_pool::Pool;
use core_view::{Model, ViewMode};
use std::path::Path;
use std::sync::Arc;

const DEFAULT_MIN_STRING_LEN: usize = 4;

/// What the rendering loop should do after executing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Refresh,
    Quit,
}

/// Owns the currently loaded object (if any), the presentation model, and
/// the worker pool jobs are posted to. One `Session` persists for the
/// program's whole lifetime; `open` replaces `emitter`, nothing else.
pub struct Session {
    model: Arc<Model>,
    pool: Pool,
    emitter: Option<Emitter>,
    arch_override: ArchTuple,
}

impl Session {
    pub fn new(model: Arc<Model>, pool: Pool) -> Self {
        Self {
            model,
            pool,
            emitter: None,
            arch_override: ArchTuple::AUTO,
        }
    }

    /// Forces every subsequent `open` to decode against `tuple` instead of
    /// auto-detecting from the ELF's `e_machine`. Pass `ArchTuple::AUTO` to
    /// go back to auto-detect.
    pub fn with_arch_override(mut self, tuple: ArchTuple) -> Self {
        self.arch_override = tuple;
        self
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Parses and executes one line, writing any diagnostic to the model's
    /// status buffer and clearing the command buffer — per spec, every
    /// rejected action does both regardless of which command it was.
    pub fn execute_line(&mut self, line: &str) -> Outcome {
        let command = grammar::parse(line);
        let outcome = self.execute(command);
        if outcome != Outcome::Quit {
            self.model.set_command_buffer("");
        }
        outcome
    }

    fn execute(&mut self, command: Command) -> Outcome {
        match command {
            Command::Empty => Outcome::Continue,
            Command::Quit => Outcome::Quit,
            Command::Refresh => Outcome::Refresh,
            Command::ViewInstructions => {
                self.model.set_view(ViewMode::Instructions);
                Outcome::Continue
            }
            Command::ViewStrings => {
                self.model.set_view(ViewMode::Strings);
                Outcome::Continue
            }
            Command::ViewSymbols => {
                self.model.set_view(ViewMode::Symbols);
                Outcome::Continue
            }
            Command::Goto(addr) => {
                if let Err(error) = self.goto(addr) {
                    self.model.set_status(error.to_string());
                }
                Outcome::Continue
            }
            Command::Open(path) => {
                if let Err(error) = self.open(Path::new(&path)) {
                    self.model.set_status(error.to_string());
                }
                Outcome::Continue
            }
            Command::Malformed(text) => {
                self.model
                    .set_status(CommandError::Malformed(text).to_string());
                Outcome::Continue
            }
            Command::Unknown(text) => {
                self.model
                    .set_status(CommandError::Unrecognized(text).to_string());
                Outcome::Continue
            }
        }
    }

    /// Binary-searches for the smallest instruction index whose address is
    /// `>= addr`, valid only in the instructions view and only when
    /// `addr` falls within `[first.address, last.address]`.
    fn goto(&self, addr: u64) -> Result<(), CommandError> {
        if self.model.view_mode() != ViewMode::Instructions {
            return Err(CommandError::WrongView);
        }
        let addresses = self.model.instruction_addresses();
        let (Some(&first), Some(&last)) = (addresses.first(), addresses.last()) else {
            return Err(CommandError::NoObjectLoaded);
        };
        if addr < first || addr > last {
            return Err(CommandError::OutOfRange(addr));
        }

        let index = addresses.partition_point(|&a| a < addr);
        self.model.goto(index);
        let effective = addresses[index];
        self.model
            .set_status(format!("goto: now at {:#010x}", effective));
        Ok(())
    }

    /// `open <path>`: verified openable, prior data released under the
    /// model's lock, then `load`/`scan`/`post_all` plus both extraction
    /// passes. Decode jobs run asynchronously — `open` returns once they
    /// are posted, not once they finish.
    fn open(&mut self, path: &Path) -> Result<(), CommandError> {
        std::fs::File::open(path).map_err(|source| CommandError::NotOpenable {
            path: path.display().to_string(),
            source,
        })?;

        self.model.clear();
        self.emitter = None;

        let Some(mut emitter) = Emitter::load(path, self.arch_override)? else {
            return Err(CommandError::Emit(core_emit::EmitError::NoTextSection));
        };
        emitter.scan();

        let model_for_batches = Arc::clone(&self.model);
        let post_result = emitter.post_all(&self.pool, move |batch| {
            model_for_batches.add_instructions(batch.instructions.into_vec());
        });
        if let Err(error) = post_result {
            tracing::warn!(target: "cmd", %error, "post_all produced no jobs (empty or shutting down)");
        }

        let strings = emitter.extract_strings(DEFAULT_MIN_STRING_LEN);
        let symbols = emitter.extract_symbols();
        self.model.add_strings(strings);
        self.model.add_symbols(symbols);
        self.model
            .set_subtitle(format!("{} | {}", path.display(), emitter.arch().tag()));

        self.emitter = Some(emitter);
        Ok(())
    }
}
