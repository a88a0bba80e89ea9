use crate::decoder::{Decoder, DecodedRaw};
use iced_x86::{DecoderOptions, Formatter, GasFormatter};

/// `iced-x86`-backed decoder for the `x86` architecture tuple. One
/// `iced_x86::Decoder` is built per call since `with_ip` borrows the input
/// slice and the job runner hands us a different slice (the remaining
/// window) on every step; this is cheap relative to the actual decode.
pub struct X86Decoder {
    bitness: u32,
    formatter: GasFormatter,
}

impl X86Decoder {
    pub fn new(mode: u32) -> Self {
        let bitness = if mode == 32 { 32 } else { 64 };
        Self {
            bitness,
            formatter: GasFormatter::new(),
        }
    }
}

impl Decoder for X86Decoder {
    fn decode_one(&mut self, bytes: &[u8], addr: u64) -> Option<DecodedRaw> {
        if bytes.is_empty() {
            return None;
        }
        let mut decoder = iced_x86::Decoder::with_ip(self.bitness, bytes, addr, DecoderOptions::NONE);
        if !decoder.can_decode() {
            return None;
        }
        let instr = decoder.decode();
        let size = instr.len();
        if size == 0 {
            return None;
        }
        let mut formatted = String::new();
        self.formatter.format(&instr, &mut formatted);
        let (mnemonic, operands) = split_mnemonic(&formatted);
        Some(DecodedRaw {
            size,
            mnemonic,
            operands,
        })
    }
}

/// `GasFormatter` hands back one line like `"mov    %rbx,%rax"`; the job
/// runner keeps mnemonic and operands as separate fields, so this splits on
/// the first run of whitespace.
fn split_mnemonic(formatted: &str) -> (String, String) {
    match formatted.find(char::is_whitespace) {
        Some(idx) => {
            let mnemonic = formatted[..idx].to_string();
            let operands = formatted[idx..].trim_start().to_string();
            (mnemonic, operands)
        }
        None => (formatted.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ret_as_single_byte_instruction() {
        let mut decoder = X86Decoder::new(64);
        let raw = decoder.decode_one(&[0xC3], 0x1000).unwrap();
        assert_eq!(raw.size, 1);
        assert_eq!(raw.mnemonic, "ret");
    }

    #[test]
    fn decodes_mov_and_splits_mnemonic_from_operands() {
        let mut decoder = X86Decoder::new(64);
        // mov rbp, rsp
        let raw = decoder.decode_one(&[0x48, 0x89, 0xE5], 0x1000).unwrap();
        assert_eq!(raw.size, 3);
        assert_eq!(raw.mnemonic, "mov");
        assert!(!raw.operands.is_empty());
    }

    #[test]
    fn empty_input_returns_none() {
        let mut decoder = X86Decoder::new(64);
        assert!(decoder.decode_one(&[], 0x1000).is_none());
    }
}
