//! Thread-local decoder state and the per-job decode routine.
//!
//! A worker thread in `core-pool` decodes many jobs over its lifetime, very
//! often against the same architecture tuple back to back (most binaries
//! are single-architecture). Rebuilding a decoder on every job would throw
//! away that locality for no reason, so each worker thread keeps one
//! decoder handle alive in thread-local storage and only rebuilds it when
//! the requested tuple actually changes.

mod arm;
mod decoder;
mod types;
mod x86;

pub use core_elf::ArchTuple;
pub use decoder::{build_decoder, Decoder};
pub use types::{Batch, DecodedInstruction};

use std::cell::RefCell;
use tracing::trace;

struct ThreadDecoderState {
    tuple: Option<ArchTuple>,
    decoder: Option<Box<dyn Decoder + Send>>,
}

thread_local! {
    static DECODER_STATE: RefCell<ThreadDecoderState> = RefCell::new(ThreadDecoderState {
        tuple: None,
        decoder: None,
    });
}

/// Decodes one byte window on the calling thread, reusing the thread-local
/// decoder when `tuple` matches what this thread last decoded and closing
/// (dropping) and reopening it otherwise.
///
/// `bytes` is an owned copy — the job runner does not hold a reference into
/// the emitter's `.text` buffer across the pool boundary.
pub fn run_job(tuple: ArchTuple, bytes: Vec<u8>, vaddr: u64) -> Batch {
    let instructions = DECODER_STATE.with(|cell| {
        let mut state = cell.borrow_mut();
        if state.tuple != Some(tuple) {
            trace!(target: "decode", arch = tuple.tag(), vaddr, "decoder_reopened_for_tuple_change");
            state.decoder = Some(build_decoder(tuple));
            state.tuple = Some(tuple);
        }
        let decoder = state.decoder.as_deref_mut().expect("decoder just initialized");
        decoder::decode_window(decoder, &bytes, vaddr)
    });

    Batch {
        base_vaddr: vaddr,
        window_length: bytes.len(),
        bytes_consumed: instructions.iter().map(|i| i.bytes.len()).sum(),
        originating_pid: 0,
        instructions: instructions.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_job_decodes_a_short_x86_window() {
        let tuple = ArchTuple::x86_64();
        let batch = run_job(tuple, vec![0x48, 0x89, 0xE5, 0xC3], 0x1000);
        assert_eq!(batch.base_vaddr, 0x1000);
        assert_eq!(batch.instructions.len(), 2);
        assert_eq!(batch.instructions[0].address, 0x1000);
        assert_eq!(batch.instructions[0].mnemonic, "mov");
        assert_eq!(batch.instructions[1].mnemonic, "ret");
    }

    #[test]
    fn run_job_reuses_decoder_across_same_tuple_calls() {
        let tuple = ArchTuple::x86_64();
        let _ = run_job(tuple, vec![0xC3], 0x2000);
        // second call on the same thread and tuple must not panic and must
        // still decode correctly, exercising the "reuse" branch.
        let batch = run_job(tuple, vec![0xC3], 0x3000);
        assert_eq!(batch.instructions[0].mnemonic, "ret");
    }

    #[test]
    fn run_job_switches_decoder_on_tuple_change() {
        let _ = run_job(ArchTuple::x86_64(), vec![0xC3], 0x1000);
        let batch = run_job(ArchTuple::aarch64(), vec![0, 0, 0, 0], 0x2000);
        assert_eq!(batch.instructions.len(), 1);
        assert_eq!(batch.instructions[0].bytes.len(), 4);
    }

    #[test]
    fn decoded_instructions_within_a_batch_are_address_ordered() {
        let batch = run_job(
            ArchTuple::x86_64(),
            vec![0x48, 0x89, 0xE5, 0xC3, 0x90, 0xC3],
            0x4000,
        );
        for pair in batch.instructions.as_slice().windows(2) {
            assert!(pair[0].address <= pair[1].address);
        }
    }
}
