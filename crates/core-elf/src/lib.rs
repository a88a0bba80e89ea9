//! ELF32/ELF64 header, program-header, section-header and symbol-table
//! parsing. Endianness-aware: `EI_DATA` selects byte order independent of
//! the host, so the parser is correct reading a big-endian object on a
//! little-endian machine and vice versa.

mod error;
mod flags;
mod parse;
mod types;

pub use error::ElfError;
pub use flags::{ProgramFlags, SectionFlags};
pub use parse::{parse_bytes, parse_file, parse_symtab};
pub use types::{
    Arch, ArchTuple, Class, DataEncoding, ElfModel, FileType, ProgramHeader, SectionHeader,
    SymbolRecord, EM_386, EM_AARCH64, EM_ARM, EM_X86_64, SHT_DYNSYM, SHT_NOBITS, SHT_STRTAB,
    SHT_SYMTAB,
};
