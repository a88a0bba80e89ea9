use core_decode::DecodedInstruction;
use core_elf::SymbolRecord;

const BYTES_PER_LINE: usize = 16;

/// `"0xADDR:  BB BB …padded…  MNEM OPERANDS"` — 8 hex-digit address,
/// two-digit hex bytes space-padded out to 16 slots regardless of how many
/// bytes the instruction actually used, so every line in the view lines up
/// in the same columns.
pub fn format_instruction_display(instr: &DecodedInstruction) -> String {
    let mut hex = String::with_capacity(BYTES_PER_LINE * 3);
    for i in 0..BYTES_PER_LINE {
        match instr.bytes.get(i) {
            Some(b) => hex.push_str(&format!("{:02X} ", b)),
            None => hex.push_str("   "),
        }
    }
    format!(
        "0x{:08X}:  {} {} {}",
        instr.address,
        hex.trim_end(),
        instr.mnemonic,
        instr.operands
    )
    .trim_end()
    .to_string()
}

/// `"0xVALUE:\tNAME"` for a symbol with a concrete address, or
/// `"(lib./ext.):\tNAME"` for one resolved externally (`st_value == 0`,
/// typically an undefined import).
pub fn format_symbol_display(sym: &SymbolRecord) -> String {
    if sym.value != 0 {
        format!("0x{:X}:\t{}", sym.value, sym.name)
    } else {
        format!("(lib./ext.):\t{}", sym.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_display_has_hex_address_and_padded_bytes() {
        let instr = DecodedInstruction::new(0x1000, &[0x48, 0x89, 0xE5], "mov", "%rsp, %rbp");
        let display = format_instruction_display(&instr);
        assert!(display.starts_with("0x00001000:"));
        assert!(display.contains("48 89 E5"));
        assert!(display.ends_with("mov %rsp, %rbp"));
    }

    #[test]
    fn symbol_with_nonzero_value_shows_hex_address() {
        let sym = SymbolRecord::new("main".to_string(), 0x4010, 16, 0x12, 0, 1);
        assert_eq!(format_symbol_display(&sym), "0x4010:\tmain");
    }

    #[test]
    fn symbol_with_zero_value_shows_external_marker() {
        let sym = SymbolRecord::new("puts".to_string(), 0, 0, 0x10, 0, 0);
        assert_eq!(format_symbol_display(&sym), "(lib./ext.):\tputs");
    }
}
