//! Parses one line of the command language into a [`Command`].
//!
//! Matching is exact-prefix against whitespace-tokenized input, never a
//! substring search: `view strings` parses, but `view stringsXYZ` is an
//! unrecognized command rather than silently accepted as `view strings`.

/// One parsed command. Carries enough to execute without re-parsing;
/// `Unknown`/`Malformed` keep the original text for the status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Quit,
    Refresh,
    ViewInstructions,
    ViewStrings,
    ViewSymbols,
    Goto(u64),
    Open(String),
    Malformed(String),
    Unknown(String),
}

/// Splits on the first run of whitespace and matches the head token
/// exactly; nothing here ever does a `contains`/`starts_with`-on-the-whole-
/// line style match.
pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    match head {
        "quit" if rest.is_empty() => Command::Quit,
        "refresh" if rest.is_empty() => Command::Refresh,
        "view" => match rest {
            "instructions" => Command::ViewInstructions,
            "strings" => Command::ViewStrings,
            "symbols" => Command::ViewSymbols,
            _ => Command::Unknown(trimmed.to_string()),
        },
        "goto" => match parse_address(rest) {
            Some(addr) => Command::Goto(addr),
            None => Command::Malformed(trimmed.to_string()),
        },
        "open" if !rest.is_empty() => Command::Open(rest.to_string()),
        _ => Command::Unknown(trimmed.to_string()),
    }
}

/// Decimal, or hex when prefixed with `0x`/`0X`.
fn parse_address(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        s.parse::<u64>().ok()
    }
}
