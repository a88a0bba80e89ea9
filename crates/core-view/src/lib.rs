//! Thread-safe presentation model read by the renderer and mutated by the
//! command interpreter and the decode pipeline's publish callback. Every
//! mutation and every multi-field read takes the model's lock across the
//! whole operation so the renderer never observes a half-updated view.

mod format;

pub use format::{format_instruction_display, format_symbol_display};

use core_collections::Sequence;
use core_decode::DecodedInstruction;
use core_elf::SymbolRecord;
use core_emit::ExtractedString;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Instructions,
    Strings,
    Symbols,
}

impl ViewMode {
    fn label(&self) -> &'static str {
        match self {
            ViewMode::Instructions => "instructions",
            ViewMode::Strings => "strings",
            ViewMode::Symbols => "symbols",
        }
    }
}

/// One symbol plus its rendered display line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub record: SymbolRecord,
    pub display: String,
}

struct Inner {
    title: String,
    subtitle: String,
    instructions: Sequence<DecodedInstruction>,
    strings: Sequence<ExtractedString>,
    symbols: Sequence<SymbolEntry>,
    view_mode: ViewMode,
    selected_index: usize,
    scroll_index: usize,
    command_buffer: String,
    status_buffer: String,
}

impl Inner {
    fn active_len(&self) -> usize {
        match self.view_mode {
            ViewMode::Instructions => self.instructions.len(),
            ViewMode::Strings => self.strings.len(),
            ViewMode::Symbols => self.symbols.len(),
        }
    }

    /// Clamps `selected`/`scroll` back into `[0, len-1]`, or `0` when the
    /// active view is empty, after any mutation that could shrink or grow
    /// the active collection.
    fn clamp_cursor(&mut self) {
        let len = self.active_len();
        if len == 0 {
            self.selected_index = 0;
            self.scroll_index = 0;
        } else {
            if self.selected_index >= len {
                self.selected_index = len - 1;
            }
            if self.scroll_index >= len {
                self.scroll_index = len - 1;
            }
        }
    }
}

pub struct Model {
    inner: Mutex<Inner>,
}

impl Model {
    pub fn create(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                title: title.into(),
                subtitle: subtitle.into(),
                instructions: Sequence::create(),
                strings: Sequence::create(),
                symbols: Sequence::create(),
                view_mode: ViewMode::Instructions,
                selected_index: 0,
                scroll_index: 0,
                command_buffer: String::new(),
                status_buffer: String::new(),
            }),
        }
    }

    /// Explicit teardown, symmetric with `create`; ordinary `Drop` already
    /// releases everything, this just names the spec's operation.
    pub fn free(self) {}

    /// Appends one decode job's published instructions and re-sorts the
    /// whole collection by address.
    ///
    /// A batch's own instructions arrive address-sorted (§3), but batches
    /// from different code ranges are posted in address order and *complete*
    /// in whatever order their worker finishes (§5) — a multi-range object
    /// decoded across more than one worker will publish batches out of
    /// order. This is a deliberate, documented departure from the "the model
    /// does not globally sort" invariant: `goto`'s binary search needs a
    /// globally address-ordered sequence to satisfy its own testable
    /// property (smallest index with `address >= target`), and an
    /// insertion-ordered model can't give that across out-of-order batch
    /// completion. See the Open Question resolution in DESIGN.md and
    /// SPEC_FULL.md §4.8/§5 for the trade-off this makes. `sort_by_key` is
    /// stable, so within a batch (and for any instructions that land on the
    /// same address) relative order is preserved.
    pub fn add_instructions(&self, mut new: Vec<DecodedInstruction>) {
        let mut inner = self.inner.lock().unwrap();
        for instr in &mut new {
            instr.display = Some(format_instruction_display(instr));
        }
        inner.instructions.extend(new);
        inner.instructions.sort_by_key(|instr| instr.address);
        inner.clamp_cursor();
    }

    pub fn add_strings(&self, new: Vec<ExtractedString>) {
        let mut inner = self.inner.lock().unwrap();
        inner.strings.extend(new);
        inner.clamp_cursor();
    }

    pub fn add_symbols(&self, new: Vec<SymbolRecord>) {
        let mut inner = self.inner.lock().unwrap();
        let entries = new.into_iter().map(|record| {
            let display = format_symbol_display(&record);
            SymbolEntry { record, display }
        });
        inner.symbols.extend(entries);
        inner.clamp_cursor();
    }

    /// Releases all previously loaded instructions, strings, and symbols —
    /// the operation `open <path>` runs before loading the replacement
    /// object's data.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.instructions.clear();
        inner.strings.clear();
        inner.symbols.clear();
        inner.selected_index = 0;
        inner.scroll_index = 0;
    }

    pub fn set_view(&self, mode: ViewMode) {
        let mut inner = self.inner.lock().unwrap();
        inner.view_mode = mode;
        inner.selected_index = 0;
        inner.scroll_index = 0;
        inner.status_buffer = format!("switched to {} view", mode.label());
    }

    pub fn set_subtitle(&self, subtitle: impl Into<String>) {
        self.inner.lock().unwrap().subtitle = subtitle.into();
    }

    pub fn set_status(&self, status: impl Into<String>) {
        self.inner.lock().unwrap().status_buffer = status.into();
    }

    pub fn set_command_buffer(&self, buf: impl Into<String>) {
        self.inner.lock().unwrap().command_buffer = buf.into();
    }

    /// Sets the selected index, clamped into the active view's bounds.
    pub fn set_selected(&self, index: usize) {
        let mut inner = self.inner.lock().unwrap();
        inner.selected_index = index;
        inner.clamp_cursor();
    }

    /// Sets `selected` and `scroll` to the same index in one critical
    /// section, as `goto` does — a plain `set_selected` would leave
    /// `scroll` pointing at wherever the view last was.
    pub fn goto(&self, index: usize) {
        let mut inner = self.inner.lock().unwrap();
        inner.selected_index = index;
        inner.scroll_index = index;
        inner.clamp_cursor();
    }

    /// Length of whichever collection the active view mode reads from.
    pub fn active_len(&self) -> usize {
        self.inner.lock().unwrap().active_len()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.inner.lock().unwrap().view_mode
    }

    pub fn selected_index(&self) -> usize {
        self.inner.lock().unwrap().selected_index
    }

    pub fn scroll_index(&self) -> usize {
        self.inner.lock().unwrap().scroll_index
    }

    pub fn title(&self) -> String {
        self.inner.lock().unwrap().title.clone()
    }

    pub fn subtitle(&self) -> String {
        self.inner.lock().unwrap().subtitle.clone()
    }

    pub fn status(&self) -> String {
        self.inner.lock().unwrap().status_buffer.clone()
    }

    pub fn command_buffer(&self) -> String {
        self.inner.lock().unwrap().command_buffer.clone()
    }

    pub fn instructions(&self) -> Vec<DecodedInstruction> {
        self.inner.lock().unwrap().instructions.to_vec()
    }

    pub fn strings(&self) -> Vec<ExtractedString> {
        self.inner.lock().unwrap().strings.to_vec()
    }

    pub fn symbols(&self) -> Vec<SymbolEntry> {
        self.inner.lock().unwrap().symbols.to_vec()
    }

    pub fn instruction_addresses(&self) -> Vec<u64> {
        self.inner
            .lock()
            .unwrap()
            .instructions
            .iter()
            .map(|i| i.address)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instr(addr: u64) -> DecodedInstruction {
        DecodedInstruction::new(addr, &[0xC3], "ret", "")
    }

    #[test]
    fn set_view_resets_cursor_and_writes_status() {
        let model = Model::create("rdis", "");
        model.set_selected(5);
        model.set_view(ViewMode::Strings);
        assert_eq!(model.view_mode(), ViewMode::Strings);
        assert_eq!(model.selected_index(), 0);
        assert_eq!(model.scroll_index(), 0);
        assert!(model.status().contains("switched to strings view"));
    }

    #[test]
    fn clear_empties_all_three_collections_and_resets_cursor() {
        let model = Model::create("rdis", "");
        model.add_instructions(vec![instr(0x1000)]);
        model.set_selected(0);
        model.clear();
        assert!(model.instructions().is_empty());
        assert_eq!(model.selected_index(), 0);
    }

    #[test]
    fn selected_index_clamps_to_last_element_when_out_of_range() {
        let model = Model::create("rdis", "");
        model.add_instructions(vec![instr(0x1000), instr(0x1001)]);
        model.set_selected(50);
        assert_eq!(model.selected_index(), 1);
    }

    #[test]
    fn selected_index_is_zero_when_view_is_empty() {
        let model = Model::create("rdis", "");
        model.set_selected(3);
        assert_eq!(model.selected_index(), 0);
    }

    #[test]
    fn goto_sets_selected_and_scroll_together() {
        let model = Model::create("rdis", "");
        model.add_instructions(vec![instr(0x1000), instr(0x1001), instr(0x1002)]);
        model.goto(2);
        assert_eq!(model.selected_index(), 2);
        assert_eq!(model.scroll_index(), 2);
    }

    #[test]
    fn active_len_tracks_the_current_view_mode() {
        let model = Model::create("rdis", "");
        model.add_instructions(vec![instr(0x1000), instr(0x1001)]);
        assert_eq!(model.active_len(), 2);
        model.set_view(ViewMode::Strings);
        assert_eq!(model.active_len(), 0);
    }

    #[test]
    fn add_instructions_attaches_display_string() {
        let model = Model::create("rdis", "");
        model.add_instructions(vec![instr(0x1000)]);
        let instrs = model.instructions();
        assert!(instrs[0].display.as_ref().unwrap().starts_with("0x00001000:"));
    }

    /// Two code ranges posted in address order can complete and publish out
    /// of order (§5) — a worker decoding the later range can finish first.
    /// This exercises the documented deviation from "the model does not
    /// globally sort" (see DESIGN.md's Open Question resolution):
    /// `add_instructions` re-sorts on every publish, so the second call
    /// here (the "earlier" range landing "later") does not leave the
    /// model's instructions out of address order, which would otherwise
    /// break `goto`'s binary search.
    #[test]
    fn add_instructions_stays_globally_sorted_when_a_later_batch_publishes_first() {
        let model = Model::create("rdis", "");
        model.add_instructions(vec![instr(0x2000), instr(0x2004)]);
        model.add_instructions(vec![instr(0x1000), instr(0x1004)]);

        let addresses = model.instruction_addresses();
        assert_eq!(addresses, vec![0x1000, 0x1004, 0x2000, 0x2004]);
        for pair in addresses.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}
