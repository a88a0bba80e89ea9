//! End-to-end smoke test through the same crates `main` wires together:
//! build a minimal ELF32 object on disk, drive it through `core_cmd::Session`
//! exactly as the `open` command would, and confirm decoded instructions,
//! strings, and symbols all land in the presentation model.

use core_cmd::Session;
use core_pool::Pool;
use core_view::{Model, ViewMode};
use std::io::Write;
use std::sync::Arc;

/// ELF32, LSB, one `.text` section (containing a short x86 run followed by
/// a padding separator), one `.rodata` section holding a printable string,
/// and `.shstrtab`.
fn build_test_object() -> tempfile::NamedTempFile {
    let code: [u8; 6] = [0x90, 0x90, 0x48, 0x89, 0xE5, 0xC3];
    let rodata: &[u8] = b"hello, world!\0";

    let mut buf = vec![0u8; 0x34];
    buf[0..4].copy_from_slice(b"\x7FELF");
    buf[4] = 1; // ELFCLASS32
    buf[5] = 1; // ELFDATA2LSB
    buf[0x10..0x12].copy_from_slice(&2u16.to_le_bytes()); // ET_EXEC
    buf[0x12..0x14].copy_from_slice(&3u16.to_le_bytes()); // EM_386
    let shoff = 0x34usize;
    buf[0x20..0x24].copy_from_slice(&(shoff as u32).to_le_bytes());
    buf[0x2E..0x30].copy_from_slice(&40u16.to_le_bytes()); // shentsize
    buf[0x30..0x32].copy_from_slice(&4u16.to_le_bytes()); // shnum: null, .text, .rodata, .shstrtab
    buf[0x32..0x34].copy_from_slice(&3u16.to_le_bytes()); // shstrndx

    buf.resize(shoff + 40, 0); // section 0: null
    let text_off = shoff + 40;
    let rodata_off = shoff + 80;
    let shstrtab_off = shoff + 120;
    buf.resize(shstrtab_off + 40, 0);

    let code_off = shstrtab_off + 40;
    let rodata_data_off = code_off + code.len();
    let strtab: &[u8] = b"\0.text\0.rodata\0.shstrtab\0";
    let strtab_off = rodata_data_off + rodata.len();

    // .text
    buf[text_off..text_off + 4].copy_from_slice(&1u32.to_le_bytes()); // name ".text"
    buf[text_off + 4..text_off + 8].copy_from_slice(&1u32.to_le_bytes()); // SHT_PROGBITS
    buf[text_off + 12..text_off + 16].copy_from_slice(&0x1000u32.to_le_bytes()); // addr
    buf[text_off + 16..text_off + 20].copy_from_slice(&(code_off as u32).to_le_bytes());
    buf[text_off + 20..text_off + 24].copy_from_slice(&(code.len() as u32).to_le_bytes());

    // .rodata
    buf[rodata_off..rodata_off + 4].copy_from_slice(&7u32.to_le_bytes()); // name ".rodata"
    buf[rodata_off + 4..rodata_off + 8].copy_from_slice(&1u32.to_le_bytes()); // SHT_PROGBITS
    buf[rodata_off + 12..rodata_off + 16].copy_from_slice(&0x2000u32.to_le_bytes());
    buf[rodata_off + 16..rodata_off + 20].copy_from_slice(&(rodata_data_off as u32).to_le_bytes());
    buf[rodata_off + 20..rodata_off + 24].copy_from_slice(&(rodata.len() as u32).to_le_bytes());

    // .shstrtab
    buf[shstrtab_off..shstrtab_off + 4].copy_from_slice(&15u32.to_le_bytes()); // name ".shstrtab"
    buf[shstrtab_off + 4..shstrtab_off + 8].copy_from_slice(&3u32.to_le_bytes()); // SHT_STRTAB
    buf[shstrtab_off + 16..shstrtab_off + 20].copy_from_slice(&(strtab_off as u32).to_le_bytes());
    buf[shstrtab_off + 20..shstrtab_off + 24].copy_from_slice(&(strtab.len() as u32).to_le_bytes());

    buf.resize(code_off, 0);
    buf.extend_from_slice(&code);
    buf.extend_from_slice(rodata);
    buf.extend_from_slice(strtab);

    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&buf).unwrap();
    tmp
}

#[test]
fn open_populates_instructions_strings_and_default_view() {
    let tmp = build_test_object();
    let model = Arc::new(Model::create("rdis", "no object loaded"));
    let pool = Pool::create(2).unwrap();
    let mut session = Session::new(Arc::clone(&model), pool);

    session.execute_line(&format!("open {}", tmp.path().display()));
    session.pool().drain();

    assert_eq!(model.view_mode(), ViewMode::Instructions);
    assert!(!model.instructions().is_empty());
    assert!(model.strings().iter().any(|s| s.text == "hello, world!"));
    assert!(model.subtitle().contains("x86"));
    assert!(model.status().is_empty() || !model.status().contains("error"));
}

/// Same layout as `build_test_object`, except `.text` holds two code ranges
/// separated by a 16-byte `0xCC` padding run (scenario 1 from the scan
/// spec), so `open` posts two decode jobs instead of one.
fn build_test_object_two_ranges() -> tempfile::NamedTempFile {
    let mut code: Vec<u8> = vec![0x90, 0x90, 0x48, 0x89, 0xE5, 0xC3];
    code.extend(std::iter::repeat(0xCC).take(16));
    code.extend_from_slice(&[0x48, 0xC3]);

    let mut buf = vec![0u8; 0x34];
    buf[0..4].copy_from_slice(b"\x7FELF");
    buf[4] = 1; // ELFCLASS32
    buf[5] = 1; // ELFDATA2LSB
    buf[0x10..0x12].copy_from_slice(&2u16.to_le_bytes()); // ET_EXEC
    buf[0x12..0x14].copy_from_slice(&3u16.to_le_bytes()); // EM_386
    let shoff = 0x34usize;
    buf[0x20..0x24].copy_from_slice(&(shoff as u32).to_le_bytes());
    buf[0x2E..0x30].copy_from_slice(&40u16.to_le_bytes()); // shentsize
    buf[0x30..0x32].copy_from_slice(&3u16.to_le_bytes()); // shnum: null, .text, .shstrtab
    buf[0x32..0x34].copy_from_slice(&2u16.to_le_bytes()); // shstrndx

    buf.resize(shoff + 40, 0); // section 0: null
    let text_off = shoff + 40;
    let shstrtab_off = shoff + 80;
    buf.resize(shstrtab_off + 40, 0);

    let code_off = shstrtab_off + 40;
    let strtab: &[u8] = b"\0.text\0.shstrtab\0";
    let strtab_off = code_off + code.len();

    // .text
    buf[text_off..text_off + 4].copy_from_slice(&1u32.to_le_bytes()); // name ".text"
    buf[text_off + 4..text_off + 8].copy_from_slice(&1u32.to_le_bytes()); // SHT_PROGBITS
    buf[text_off + 12..text_off + 16].copy_from_slice(&0x1000u32.to_le_bytes()); // addr
    buf[text_off + 16..text_off + 20].copy_from_slice(&(code_off as u32).to_le_bytes());
    buf[text_off + 20..text_off + 24].copy_from_slice(&(code.len() as u32).to_le_bytes());

    // .shstrtab
    buf[shstrtab_off..shstrtab_off + 4].copy_from_slice(&7u32.to_le_bytes()); // name ".shstrtab"
    buf[shstrtab_off + 4..shstrtab_off + 8].copy_from_slice(&3u32.to_le_bytes()); // SHT_STRTAB
    buf[shstrtab_off + 16..shstrtab_off + 20].copy_from_slice(&(strtab_off as u32).to_le_bytes());
    buf[shstrtab_off + 20..shstrtab_off + 24].copy_from_slice(&(strtab.len() as u32).to_le_bytes());

    buf.resize(code_off, 0);
    buf.extend_from_slice(&code);
    buf.extend_from_slice(strtab);

    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&buf).unwrap();
    tmp
}

/// Regression test for batches publishing out of the order their ranges
/// were posted in: two ranges go through a 4-worker pool (matching
/// `rdis-bin`'s own `--workers` default), and `goto` into the second range
/// must still land on the correct instruction once both batches have
/// published, regardless of which one's worker finished first.
#[test]
fn goto_is_correct_across_multiple_code_ranges_through_the_pool() {
    let tmp = build_test_object_two_ranges();
    let model = Arc::new(Model::create("rdis", "no object loaded"));
    let pool = Pool::create(4).unwrap();
    let mut session = Session::new(Arc::clone(&model), pool);

    session.execute_line(&format!("open {}", tmp.path().display()));
    session.pool().drain();

    let addresses = model.instruction_addresses();
    assert!(addresses.len() >= 3, "expected instructions from both ranges");
    for pair in addresses.windows(2) {
        assert!(pair[0] <= pair[1], "instructions are not globally address-ordered: {addresses:?}");
    }

    // The second range starts at text_vaddr (0x1000) + 22.
    let second_range_start: u64 = 0x1000 + 22;
    session.execute_line(&format!("goto {second_range_start}"));
    assert!(model.status().contains("goto: now at"));
    let selected = model.selected_index();
    let selected_addr = model.instructions()[selected].address;
    assert!(selected_addr >= second_range_start);
    assert!(selected == 0 || model.instructions()[selected - 1].address < second_range_start);
}

#[test]
fn unknown_command_after_open_does_not_disturb_loaded_data() {
    let tmp = build_test_object();
    let model = Arc::new(Model::create("rdis", ""));
    let pool = Pool::create(1).unwrap();
    let mut session = Session::new(Arc::clone(&model), pool);

    session.execute_line(&format!("open {}", tmp.path().display()));
    session.pool().drain();
    let before = model.instructions().len();

    session.execute_line("bogus");
    assert_eq!(model.instructions().len(), before);
    assert!(model.status().contains("bogus"));
}
