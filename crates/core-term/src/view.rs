//! Lays the presentation model out into fixed-height terminal lines: a
//! two-line header, a scrollable body sized to whatever space remains, a
//! status line, and a command line. Purely a text layout — no ANSI, no
//! diffing against the previous frame — the backend just clears and
//! reprints every tick.

use core_view::{Model, ViewMode};

const CHROME_ROWS: u16 = 4; // title, subtitle, status, command

/// Renders exactly `height` lines, each truncated to `width` columns.
pub fn render(model: &Model, width: u16, height: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut lines = Vec::with_capacity(height as usize);

    lines.push(clip(&model.title(), width));
    lines.push(clip(&model.subtitle(), width));

    let body_rows = height.saturating_sub(CHROME_ROWS) as usize;
    lines.extend(body_lines(model, width, body_rows));

    lines.push(clip(&format!("-- {} --", model.status()), width));
    lines.push(clip(&format!("> {}", model.command_buffer()), width));

    lines
}

fn body_lines(model: &Model, width: usize, rows: usize) -> Vec<String> {
    let scroll = model.scroll_index();
    let selected = model.selected_index();

    let raw: Vec<String> = match model.view_mode() {
        ViewMode::Instructions => model
            .instructions()
            .into_iter()
            .map(|i| i.display.unwrap_or_default())
            .collect(),
        ViewMode::Strings => model
            .strings()
            .into_iter()
            .map(|s| format!("{:#010x}:  {}", s.address, s.text))
            .collect(),
        ViewMode::Symbols => model.symbols().into_iter().map(|s| s.display).collect(),
    };

    let mut out = Vec::with_capacity(rows);
    for i in 0..rows {
        let idx = scroll + i;
        let Some(text) = raw.get(idx) else {
            out.push(String::new());
            continue;
        };
        let marker = if idx == selected { "> " } else { "  " };
        out.push(clip(&format!("{marker}{text}"), width));
    }
    out
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        s.chars().take(width).collect()
    }
}
