use crate::decoder::{Decoder, DecodedRaw};
use core_elf::Arch;

/// Fixed-width (4-byte) decoder for `arm` and `aarch64` tuples. No full ARM
/// decoder crate is available to this workspace, so this covers the common
/// instruction classes by their top-level encoding bits and falls back to
/// a `.word` directive for anything it doesn't recognize — a decoder that
/// never fails to produce *an* instruction for a well-formed 4-byte word,
/// in the long-standing disassembler tradition of degrading to raw data
/// rather than stalling the stream.
///
/// Always reads instruction words little-endian, which covers the common
/// case (ARM/AArch64 Linux targets); a big-endian (`BE8`/`BE32`) object
/// would need the decoder to know the ELF's `EI_DATA`, which this trait
/// does not carry.
pub struct ArmDecoder {
    arch: Arch,
}

impl ArmDecoder {
    pub fn new(arch: Arch) -> Self {
        Self { arch }
    }
}

impl Decoder for ArmDecoder {
    fn decode_one(&mut self, bytes: &[u8], _addr: u64) -> Option<DecodedRaw> {
        if bytes.len() < 4 {
            return None;
        }
        let word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let (mnemonic, operands) = match self.arch {
            Arch::Aarch64 => decode_aarch64(word),
            _ => decode_arm32(word),
        };
        Some(DecodedRaw {
            size: 4,
            mnemonic,
            operands,
        })
    }
}

/// Classic ARM encoding: bits `[27:25]` select the instruction group.
fn decode_arm32(word: u32) -> (String, String) {
    let op = (word >> 25) & 0x7;
    let cond = (word >> 28) & 0xF;
    match op {
        0b101 => {
            let link = (word >> 24) & 1 == 1;
            let offset = sign_extend_24(word & 0x00FF_FFFF);
            (
                if link { "bl".to_string() } else { "b".to_string() },
                format!("{:#x}", offset),
            )
        }
        0b000 | 0b001 => (
            "dp".to_string(),
            format!("cond={:x}, imm={:#x}", cond, word & 0x0FFF_FFFF),
        ),
        0b010 | 0b011 => (
            "ldst".to_string(),
            format!("{:#010x}", word & 0x0FFF_FFFF),
        ),
        0b100 => ("ldm_stm".to_string(), format!("reglist={:#06x}", word & 0xFFFF)),
        _ => word_fallback(word),
    }
}

/// AArch64 encoding: bits `[28:25]` (`op0`) select the broad instruction
/// class per the architecture reference.
fn decode_aarch64(word: u32) -> (String, String) {
    let op0 = (word >> 25) & 0xF;
    match op0 {
        0x8 | 0x9 => (
            "dpimm".to_string(),
            format!("{:#x}", word & 0x001F_FFFF),
        ),
        0xA | 0xB => {
            let offset = sign_extend_26(word & 0x03FF_FFFF);
            ("b".to_string(), format!("{:#x}", offset))
        }
        0x4 | 0x6 | 0xC | 0xE => (
            "ldst".to_string(),
            format!("{:#010x}", word & 0x3FFF_FFFF),
        ),
        0x5 | 0xD => ("dpreg".to_string(), format!("{:#010x}", word & 0x7FFF_FFFF)),
        _ => word_fallback(word),
    }
}

fn word_fallback(word: u32) -> (String, String) {
    (".word".to_string(), format!("{:#010x}", word))
}

fn sign_extend_24(value: u32) -> i32 {
    ((value << 8) as i32) >> 8
}

fn sign_extend_26(value: u32) -> i32 {
    ((value << 6) as i32) >> 6
}
