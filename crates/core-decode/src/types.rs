use core_collections::Sequence;

const MAX_INSTRUCTION_BYTES: usize = 16;
const MAX_MNEMONIC_CHARS: usize = 31;
const MAX_OPERANDS_CHARS: usize = 127;

/// One decoded instruction. `mnemonic`/`operands` are truncated (and, if
/// truncated, NUL-terminated) to the record's fixed budget rather than
/// growing unbounded — a disassembly stream with tens of thousands of
/// instructions should not pay for a `String` per operand list beyond what
/// the view ever displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub address: u64,
    pub bytes: Vec<u8>,
    pub mnemonic: String,
    pub operands: String,
    pub display: Option<String>,
}

impl DecodedInstruction {
    pub fn new(address: u64, bytes: &[u8], mnemonic: &str, operands: &str) -> Self {
        let bytes = if bytes.len() > MAX_INSTRUCTION_BYTES {
            bytes[..MAX_INSTRUCTION_BYTES].to_vec()
        } else {
            bytes.to_vec()
        };
        Self {
            address,
            bytes,
            mnemonic: clamp(mnemonic, MAX_MNEMONIC_CHARS),
            operands: clamp(operands, MAX_OPERANDS_CHARS),
            display: None,
        }
    }
}

/// Truncates to `max` chars, appending a NUL only when truncation actually
/// happened (a record that fits exactly is left untouched).
fn clamp(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('\0');
    out
}

/// One worker's decode output for a single posted job:
/// `(base_vaddr, window_length, bytes_consumed, originating_pid_or_zero,
/// decoded_sequence)`. `originating_pid` is always `0` in this workspace —
/// there is no live-process attachment, only file-backed decode — kept as a
/// field so the record shape matches what a future live-process producer
/// would populate.
#[derive(Debug, Clone)]
pub struct Batch {
    pub base_vaddr: u64,
    pub window_length: usize,
    pub bytes_consumed: usize,
    pub originating_pid: u32,
    pub instructions: Sequence<DecodedInstruction>,
}
