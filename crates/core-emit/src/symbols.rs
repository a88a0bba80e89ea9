use crate::section_io::read_section_bytes;
use core_elf::{parse_symtab, ElfModel, SymbolRecord, SHT_DYNSYM, SHT_STRTAB, SHT_SYMTAB};

/// Finds every `.symtab`/`.dynsym` section, resolves its linked string
/// table via `sh_link`, and parses the symbol records out of both. A
/// section is skipped (rather than aborting the whole extraction) when its
/// link is out of range, the linked section isn't a nonempty `SHT_STRTAB`,
/// or either section's bytes can't be read.
pub fn extract_symbols(model: &ElfModel) -> Vec<SymbolRecord> {
    let mut out = Vec::new();

    for shdr in &model.section_headers {
        if shdr.sh_type != SHT_SYMTAB && shdr.sh_type != SHT_DYNSYM {
            continue;
        }
        let Some(strtab_shdr) = model.section_headers.get(shdr.link as usize) else {
            tracing::debug!(target: "emit", link = shdr.link, "symtab sh_link out of range, skipping section");
            continue;
        };
        if strtab_shdr.sh_type != SHT_STRTAB || strtab_shdr.size == 0 {
            tracing::debug!(target: "emit", link = shdr.link, "symtab sh_link is not a nonempty strtab, skipping section");
            continue;
        }

        let sym_bytes = match read_section_bytes(&model.path, shdr) {
            Ok(b) => b,
            Err(error) => {
                tracing::debug!(target: "emit", %error, "failed to read symtab section, skipping");
                continue;
            }
        };
        let strtab_bytes = match read_section_bytes(&model.path, strtab_shdr) {
            Ok(b) => b,
            Err(error) => {
                tracing::debug!(target: "emit", %error, "failed to read linked strtab, skipping section");
                continue;
            }
        };

        out.extend(parse_symtab(model, &sym_bytes, &strtab_bytes, shdr.entsize as usize));
    }

    out
}
