use crate::error::ElfError;
use crate::types::{Class, DataEncoding, ElfModel, ProgramHeader, SectionHeader, SymbolRecord};
use std::path::Path;

const EI_CLASS: usize = 4;
const EI_DATA: usize = 5;
const ELFCLASS32: u8 = 1;
const ELFCLASS64: u8 = 2;
const ELFDATA2LSB: u8 = 1;
const ELFDATA2MSB: u8 = 2;

/// Thin endian-aware view over a byte slice. `EI_DATA` selects byte order
/// for every multi-byte field read through it, so the parser is correct
/// for both LSB and MSB inputs regardless of host endianness.
struct Reader<'a> {
    data: &'a [u8],
    lsb: bool,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8], lsb: bool) -> Self {
        Self { data, lsb }
    }

    fn u16_at(&self, offset: usize) -> Option<u16> {
        let bytes: [u8; 2] = self.data.get(offset..offset + 2)?.try_into().ok()?;
        Some(if self.lsb {
            u16::from_le_bytes(bytes)
        } else {
            u16::from_be_bytes(bytes)
        })
    }

    fn u32_at(&self, offset: usize) -> Option<u32> {
        let bytes: [u8; 4] = self.data.get(offset..offset + 4)?.try_into().ok()?;
        Some(if self.lsb {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        })
    }

    fn u64_at(&self, offset: usize) -> Option<u64> {
        let bytes: [u8; 8] = self.data.get(offset..offset + 8)?.try_into().ok()?;
        Some(if self.lsb {
            u64::from_le_bytes(bytes)
        } else {
            u64::from_be_bytes(bytes)
        })
    }
}

/// Reads `path` fully and parses it as an ELF32 or ELF64 object. Leaves no
/// partial model exposed on any failure.
pub fn parse_file(path: &Path) -> Result<ElfModel, ElfError> {
    let path_str = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound
            || source.kind() == std::io::ErrorKind::PermissionDenied
        {
            ElfError::OpenFailed {
                path: path_str.clone(),
                source,
            }
        } else {
            ElfError::ReadFailed {
                path: path_str.clone(),
                source,
            }
        }
    })?;
    parse_bytes(&bytes, path_str)
}

pub fn parse_bytes(bytes: &[u8], path: String) -> Result<ElfModel, ElfError> {
    if bytes.len() < 16 {
        return Err(ElfError::TruncatedHeader);
    }
    if &bytes[0..4] != b"\x7FELF" {
        return Err(ElfError::BadMagic);
    }

    let lsb = match bytes[EI_DATA] {
        ELFDATA2LSB => true,
        ELFDATA2MSB => false,
        _ => true,
    };
    let data = if lsb {
        DataEncoding::Lsb
    } else {
        DataEncoding::Msb
    };

    match bytes[EI_CLASS] {
        ELFCLASS32 => parse_class(bytes, Reader::new(bytes, lsb), Class::Elf32, data, path),
        ELFCLASS64 => parse_class(bytes, Reader::new(bytes, lsb), Class::Elf64, data, path),
        other => Err(ElfError::UnsupportedClass(other)),
    }
}

fn parse_class(
    bytes: &[u8],
    r: Reader<'_>,
    class: Class,
    data: DataEncoding,
    path: String,
) -> Result<ElfModel, ElfError> {
    let is64 = matches!(class, Class::Elf64);
    let ehsize_ok = bytes.len() >= if is64 { 0x40 } else { 0x34 };
    if !ehsize_ok {
        return Err(ElfError::TruncatedHeader);
    }

    let e_type = r.u16_at(0x10).ok_or(ElfError::TruncatedHeader)?;
    let machine = r.u16_at(0x12).ok_or(ElfError::TruncatedHeader)?;

    let (entry, phoff, shoff, phentsize, phnum, shentsize, shnum, shstrndx) = if is64 {
        (
            r.u64_at(0x18).ok_or(ElfError::TruncatedHeader)?,
            r.u64_at(0x20).ok_or(ElfError::TruncatedHeader)?,
            r.u64_at(0x28).ok_or(ElfError::TruncatedHeader)?,
            r.u16_at(0x36).ok_or(ElfError::TruncatedHeader)?,
            r.u16_at(0x38).ok_or(ElfError::TruncatedHeader)?,
            r.u16_at(0x3A).ok_or(ElfError::TruncatedHeader)?,
            r.u16_at(0x3C).ok_or(ElfError::TruncatedHeader)?,
            r.u16_at(0x3E).ok_or(ElfError::TruncatedHeader)?,
        )
    } else {
        (
            r.u32_at(0x18).ok_or(ElfError::TruncatedHeader)? as u64,
            r.u32_at(0x1C).ok_or(ElfError::TruncatedHeader)? as u64,
            r.u32_at(0x20).ok_or(ElfError::TruncatedHeader)? as u64,
            r.u16_at(0x2A).ok_or(ElfError::TruncatedHeader)?,
            r.u16_at(0x2C).ok_or(ElfError::TruncatedHeader)?,
            r.u16_at(0x2E).ok_or(ElfError::TruncatedHeader)?,
            r.u16_at(0x30).ok_or(ElfError::TruncatedHeader)?,
            r.u16_at(0x32).ok_or(ElfError::TruncatedHeader)?,
        )
    };

    let program_headers = parse_program_headers(bytes, &r, is64, phoff, phnum, phentsize);
    let section_headers = parse_section_headers(bytes, &r, is64, shoff, shnum, shentsize);

    let shstrtab = section_headers
        .get(shstrndx as usize)
        .and_then(|shdr| {
            let start = shdr.file_offset as usize;
            let end = start.checked_add(shdr.size as usize)?;
            bytes.get(start..end)
        })
        .map(|slice| slice.to_vec())
        .unwrap_or_default();

    Ok(ElfModel {
        class,
        data,
        file_type: e_type.into(),
        machine,
        entry,
        phoff,
        phnum,
        shoff,
        shnum,
        shstrndx,
        program_headers: program_headers.into(),
        section_headers: section_headers.into(),
        shstrtab,
        path,
    })
}

fn parse_program_headers(
    bytes: &[u8],
    r: &Reader<'_>,
    is64: bool,
    phoff: u64,
    phnum: u16,
    phentsize: u16,
) -> Vec<ProgramHeader> {
    let entsize = phentsize as usize;
    if entsize == 0 {
        return Vec::new();
    }
    let table_len = entsize.saturating_mul(phnum as usize);
    let Some(table_end) = (phoff as usize).checked_add(table_len) else {
        return Vec::new();
    };
    if table_end > bytes.len() {
        return Vec::new();
    }

    let mut headers = Vec::with_capacity(phnum as usize);
    for i in 0..phnum as usize {
        let base = phoff as usize + i * entsize;
        let parsed = if is64 {
            (|| {
                Some(ProgramHeader {
                    p_type: r.u32_at(base)?,
                    flags_raw: r.u32_at(base + 4)? as u64,
                    file_offset: r.u64_at(base + 8)?,
                    vaddr: r.u64_at(base + 16)?,
                    paddr: r.u64_at(base + 24)?,
                    filesz: r.u64_at(base + 32)?,
                    memsz: r.u64_at(base + 40)?,
                    align: r.u64_at(base + 48)?,
                })
            })()
        } else {
            (|| {
                Some(ProgramHeader {
                    p_type: r.u32_at(base)?,
                    file_offset: r.u32_at(base + 4)? as u64,
                    vaddr: r.u32_at(base + 8)? as u64,
                    paddr: r.u32_at(base + 12)? as u64,
                    filesz: r.u32_at(base + 16)? as u64,
                    memsz: r.u32_at(base + 20)? as u64,
                    flags_raw: r.u32_at(base + 24)? as u64,
                    align: r.u32_at(base + 28)? as u64,
                })
            })()
        };
        match parsed {
            Some(hdr) => headers.push(hdr),
            None => return Vec::new(),
        }
    }
    headers
}

/// Parses a symbol table section's raw bytes against a resolved string
/// table. `entsize` is the section's own `sh_entsize` when nonzero,
/// otherwise the class's native record size (16 bytes for ELF32, 24 for
/// ELF64). An entry with `st_name == 0` (the convention for "no name", and
/// always true of the mandatory index-0 null symbol) is skipped entirely;
/// an entry whose name offset falls outside `strtab` or lacks a NUL
/// terminator in the remaining bytes is rejected the same way, rather than
/// kept with an empty or truncated name.
pub fn parse_symtab(
    model: &ElfModel,
    section_bytes: &[u8],
    strtab: &[u8],
    entsize: usize,
) -> Vec<SymbolRecord> {
    let lsb = matches!(model.data, DataEncoding::Lsb);
    let r = Reader::new(section_bytes, lsb);
    let is64 = matches!(model.class, Class::Elf64);
    let entsize = if entsize != 0 {
        entsize
    } else if is64 {
        24
    } else {
        16
    };
    if entsize == 0 || section_bytes.len() < entsize {
        return Vec::new();
    }

    let count = section_bytes.len() / entsize;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let base = i * entsize;
        let parsed = if is64 {
            (|| {
                let st_name = r.u32_at(base)?;
                let info = *section_bytes.get(base + 4)?;
                let other = *section_bytes.get(base + 5)?;
                let shndx = r.u16_at(base + 6)?;
                let value = r.u64_at(base + 8)?;
                let size = r.u64_at(base + 16)?;
                Some((st_name, info, other, shndx, value, size))
            })()
        } else {
            (|| {
                let st_name = r.u32_at(base)?;
                let value = r.u32_at(base + 4)? as u64;
                let size = r.u32_at(base + 8)? as u64;
                let info = *section_bytes.get(base + 12)?;
                let other = *section_bytes.get(base + 13)?;
                let shndx = r.u16_at(base + 14)?;
                Some((st_name, info, other, shndx, value, size))
            })()
        };
        let Some((st_name, info, other, shndx, value, size)) = parsed else {
            continue;
        };
        if st_name == 0 {
            continue;
        }
        let Some(name) = string_at(strtab, st_name as usize) else {
            continue;
        };
        out.push(SymbolRecord::new(name, value, size, info, other, shndx));
    }
    out
}

fn string_at(strtab: &[u8], offset: usize) -> Option<String> {
    if offset >= strtab.len() {
        return None;
    }
    let rest = &strtab[offset..];
    let end = rest.iter().position(|&b| b == 0)?;
    std::str::from_utf8(&rest[..end]).ok().map(str::to_owned)
}

fn parse_section_headers(
    bytes: &[u8],
    r: &Reader<'_>,
    is64: bool,
    shoff: u64,
    shnum: u16,
    shentsize: u16,
) -> Vec<SectionHeader> {
    let entsize = shentsize as usize;
    if entsize == 0 {
        return Vec::new();
    }
    let table_len = entsize.saturating_mul(shnum as usize);
    let Some(table_end) = (shoff as usize).checked_add(table_len) else {
        return Vec::new();
    };
    if table_end > bytes.len() {
        return Vec::new();
    }

    let mut headers = Vec::with_capacity(shnum as usize);
    for i in 0..shnum as usize {
        let base = shoff as usize + i * entsize;
        let parsed = if is64 {
            (|| {
                Some(SectionHeader {
                    name_offset: r.u32_at(base)?,
                    sh_type: r.u32_at(base + 4)?,
                    flags_raw: r.u64_at(base + 8)?,
                    addr: r.u64_at(base + 16)?,
                    file_offset: r.u64_at(base + 24)?,
                    size: r.u64_at(base + 32)?,
                    link: r.u32_at(base + 40)?,
                    info: r.u32_at(base + 44)?,
                    addralign: r.u64_at(base + 48)?,
                    entsize: r.u64_at(base + 56)?,
                })
            })()
        } else {
            (|| {
                Some(SectionHeader {
                    name_offset: r.u32_at(base)?,
                    sh_type: r.u32_at(base + 4)?,
                    flags_raw: r.u32_at(base + 8)? as u64,
                    addr: r.u32_at(base + 12)? as u64,
                    file_offset: r.u32_at(base + 16)? as u64,
                    size: r.u32_at(base + 20)? as u64,
                    link: r.u32_at(base + 24)?,
                    info: r.u32_at(base + 28)?,
                    addralign: r.u32_at(base + 32)? as u64,
                    entsize: r.u32_at(base + 36)? as u64,
                })
            })()
        };
        match parsed {
            Some(hdr) => headers.push(hdr),
            None => return Vec::new(),
        }
    }
    headers
}
