use crate::types::DecodedInstruction;
use core_elf::ArchTuple;

/// One decoded instruction before it is wrapped into the record the rest of
/// the workspace carries around.
pub struct DecodedRaw {
    pub size: usize,
    pub mnemonic: String,
    pub operands: String,
}

/// Per-architecture instruction decoder. Implementations keep whatever
/// internal state they need (an `iced-x86` decoder handle, a lookup table)
/// and decode exactly one instruction starting at `bytes[0]`.
pub trait Decoder {
    fn decode_one(&mut self, bytes: &[u8], addr: u64) -> Option<DecodedRaw>;
}

/// Builds the decoder for an architecture tuple. `(0, 0)` (`ArchTuple::AUTO`)
/// is never passed here directly — callers resolve auto-detect against the
/// ELF model before reaching the job runner.
pub fn build_decoder(tuple: ArchTuple) -> Box<dyn Decoder + Send> {
    match tuple.arch {
        core_elf::Arch::X86 => Box::new(crate::x86::X86Decoder::new(tuple.mode)),
        core_elf::Arch::Arm | core_elf::Arch::Aarch64 => {
            Box::new(crate::arm::ArmDecoder::new(tuple.arch))
        }
    }
}

/// Runs a decoder sequentially over `bytes` starting at virtual address
/// `addr`, producing one `DecodedInstruction` per step. Stops when fewer
/// bytes remain than the decoder needs to make progress (the decoder
/// returning `None`), never looping on a zero-length decode.
pub fn decode_window(
    decoder: &mut dyn Decoder,
    bytes: &[u8],
    addr: u64,
) -> Vec<DecodedInstruction> {
    let mut out = Vec::new();
    let mut offset = 0usize;
    while offset < bytes.len() {
        let remaining = &bytes[offset..];
        match decoder.decode_one(remaining, addr + offset as u64) {
            Some(raw) if raw.size > 0 => {
                let size = raw.size.min(remaining.len());
                let consumed = &remaining[..size];
                out.push(DecodedInstruction::new(
                    addr + offset as u64,
                    consumed,
                    &raw.mnemonic,
                    &raw.operands,
                ));
                offset += size;
            }
            _ => break,
        }
    }
    out
}
