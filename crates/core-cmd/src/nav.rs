//! Navigation key handling and command-buffer editing — the part of the
//! interpreter driven directly by keystrokes rather than a parsed line.

use core_view::Model;

const COMMAND_BUFFER_LIMIT: usize = 256;

/// The four navigation keys the spec calls out; everything else that isn't
/// a printable character is ignored by this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    PageUp,
    PageDown,
}

/// Moves `selected` by one line (`Up`/`Down`) or `page_size` lines
/// (`PageUp`/`PageDown`), clamped into the active view's bounds. A no-op on
/// an empty view.
pub fn apply_nav(model: &Model, key: NavKey, page_size: usize) {
    let len = model.active_len();
    if len == 0 {
        return;
    }
    let current = model.selected_index();
    let next = match key {
        NavKey::Up => current.saturating_sub(1),
        NavKey::Down => (current + 1).min(len - 1),
        NavKey::PageUp => current.saturating_sub(page_size),
        NavKey::PageDown => (current + page_size).min(len - 1),
    };
    model.set_selected(next);
}

/// Appends one printable character to the command buffer, dropping it
/// silently once the buffer is at its fixed capacity rather than growing
/// past it.
pub fn push_command_char(model: &Model, ch: char) {
    let mut buf = model.command_buffer();
    if buf.chars().count() >= COMMAND_BUFFER_LIMIT {
        return;
    }
    buf.push(ch);
    model.set_command_buffer(buf);
}

/// Removes the last character of the command buffer, if any.
pub fn backspace_command(model: &Model) {
    let mut buf = model.command_buffer();
    buf.pop();
    model.set_command_buffer(buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_decode::DecodedInstruction;

    fn model_with_instructions(n: usize) -> Model {
        let model = Model::create("rdis", "");
        let instrs = (0..n as u64)
            .map(|i| DecodedInstruction::new(0x1000 + i, &[0xC3], "ret", ""))
            .collect();
        model.add_instructions(instrs);
        model
    }

    #[test]
    fn down_and_up_move_by_one_with_clamping() {
        let model = model_with_instructions(3);
        apply_nav(&model, NavKey::Down, 10);
        assert_eq!(model.selected_index(), 1);
        apply_nav(&model, NavKey::Down, 10);
        apply_nav(&model, NavKey::Down, 10);
        assert_eq!(model.selected_index(), 2); // clamped at last index
        apply_nav(&model, NavKey::Up, 10);
        assert_eq!(model.selected_index(), 1);
    }

    #[test]
    fn page_down_clamps_to_last_index() {
        let model = model_with_instructions(5);
        apply_nav(&model, NavKey::PageDown, 100);
        assert_eq!(model.selected_index(), 4);
    }

    #[test]
    fn nav_on_empty_view_is_a_no_op() {
        let model = Model::create("rdis", "");
        apply_nav(&model, NavKey::Down, 10);
        assert_eq!(model.selected_index(), 0);
    }

    #[test]
    fn command_buffer_appends_and_backspaces() {
        let model = Model::create("rdis", "");
        push_command_char(&model, 'g');
        push_command_char(&model, 'o');
        assert_eq!(model.command_buffer(), "go");
        backspace_command(&model);
        assert_eq!(model.command_buffer(), "g");
    }

    #[test]
    fn command_buffer_stops_growing_past_its_limit() {
        let model = Model::create("rdis", "");
        for _ in 0..(COMMAND_BUFFER_LIMIT + 10) {
            push_command_char(&model, 'x');
        }
        assert_eq!(model.command_buffer().chars().count(), COMMAND_BUFFER_LIMIT);
    }
}
