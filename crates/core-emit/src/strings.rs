/// One printable-run string found in the object, tagged with the virtual
/// address its first byte occupies (`0` when the owning section isn't
/// loaded into memory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedString {
    pub address: u64,
    pub text: String,
}

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

/// A maximal run of 2 or more consecutive spaces acts as a run separator,
/// the same as a non-printable byte — this is what lets a run of space
/// padding between two literals (no NUL or other non-printable byte
/// between them) split the literals apart instead of merging into one
/// low-density run that fails `is_qualifying_run` as a whole. A single
/// embedded space (`"Hello, world!"`) is not a separator and stays part of
/// its surrounding run.
fn mark_separators(bytes: &[u8], is_sep: &mut [bool]) {
    let len = bytes.len();
    let mut i = 0usize;
    while i < len {
        if !is_printable(bytes[i]) {
            is_sep[i] = true;
            i += 1;
            continue;
        }
        if bytes[i] == b' ' {
            let run_start = i;
            while i < len && bytes[i] == b' ' {
                i += 1;
            }
            if i - run_start >= 2 {
                for flag in &mut is_sep[run_start..i] {
                    *flag = true;
                }
            }
            continue;
        }
        i += 1;
    }
}

/// Scans `bytes` for maximal runs of printable ASCII of length ≥ `min_len`,
/// split additionally at any run of 2+ consecutive spaces (see
/// `mark_separators`), keeping a run only if at least half its bytes are
/// alphanumeric and it isn't composed entirely of spaces — this filters
/// out padding bytes that happen to decode as runs of `' '` and short runs
/// of punctuation that aren't meaningfully "text".
pub fn collect_strings(bytes: &[u8], base_addr: u64, min_len: usize, out: &mut Vec<ExtractedString>) {
    let len = bytes.len();
    let mut is_sep = vec![false; len];
    mark_separators(bytes, &mut is_sep);

    let mut start = 0usize;
    let mut i = 0usize;

    while i <= len {
        let at_boundary = i == len || !is_printable(bytes[i]) || is_sep[i];
        if at_boundary {
            let run = &bytes[start..i];
            if run.len() >= min_len && is_qualifying_run(run) {
                out.push(ExtractedString {
                    address: base_addr + start as u64,
                    text: String::from_utf8_lossy(run).into_owned(),
                });
            }
            start = i + 1;
        }
        i += 1;
    }
}

fn is_qualifying_run(run: &[u8]) -> bool {
    let alnum = run.iter().filter(|b| b.is_ascii_alphanumeric()).count();
    if alnum * 2 < run.len() {
        return false;
    }
    run.iter().any(|&b| b != b' ')
}
