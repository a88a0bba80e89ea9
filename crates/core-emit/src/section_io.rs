use core_elf::SectionHeader;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

/// Reads one section's raw bytes directly from disk. Extraction walks
/// sections one at a time rather than holding the whole file in memory, so
/// a failure on one section (truncated file, permission change mid-run)
/// only drops that section instead of aborting the whole scan.
pub fn read_section_bytes(path: &str, shdr: &SectionHeader) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(shdr.file_offset))?;
    let mut buf = vec![0u8; shdr.size as usize];
    file.read_exact(&mut buf)?;
    Ok(buf)
}
