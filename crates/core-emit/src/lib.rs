//! Owns one loaded ELF object's `.text` copy and code ranges, posts
//! decode jobs to a worker pool, and extracts strings/symbols on demand.
//! A fresh `Emitter` is built per `open <path>`; the previous one (and
//! everything it owned) is simply dropped.

mod error;
mod section_io;
mod strings;
mod symbols;

pub use error::EmitError;
pub use strings::ExtractedString;

use core_decode::{ArchTuple, Batch};
use core_elf::{ElfModel, SymbolRecord};
use core_pool::Pool;
use core_scan::CodeRange;
use section_io::read_section_bytes;
use std::path::Path;
use std::sync::Arc;

/// ELF model + arch tuple + `.text` copy + code ranges. Single owner,
/// destroyed (dropped) once a new `open` replaces it.
pub struct Emitter {
    model: ElfModel,
    tuple: ArchTuple,
    text: Vec<u8>,
    text_vaddr: u64,
    ranges: Vec<CodeRange>,
}

impl Emitter {
    /// Parses `path`, locates `.text`, and reads its bytes. `tuple ==
    /// ArchTuple::AUTO` resolves against the ELF's `e_machine`. Returns
    /// `Ok(None)` when the object has no `.text` section — that is a valid
    /// (if useless) ELF object, not a parse error.
    pub fn load(path: &Path, tuple: ArchTuple) -> Result<Option<Self>, EmitError> {
        let model = core_elf::parse_file(path)?;
        let Some(text_shdr) = model.section_by_name(".text") else {
            return Ok(None);
        };
        let text = read_section_bytes(&model.path, text_shdr).map_err(|source| {
            EmitError::Elf(core_elf::ElfError::ReadFailed {
                path: model.path.clone(),
                source,
            })
        })?;
        let text_vaddr = text_shdr.addr;
        let resolved = if tuple.is_auto() {
            model.arch_from_elf()
        } else {
            tuple
        };

        tracing::info!(target: "emit", path = %model.path, arch = resolved.tag(), text_len = text.len(), "loaded object");

        Ok(Some(Self {
            model,
            tuple: resolved,
            text,
            text_vaddr,
            ranges: Vec::new(),
        }))
    }

    pub fn arch(&self) -> ArchTuple {
        self.tuple
    }

    pub fn model(&self) -> &ElfModel {
        &self.model
    }

    pub fn ranges(&self) -> &[CodeRange] {
        &self.ranges
    }

    /// Runs the code-range scanner over the `.text` copy, replacing any
    /// previously computed ranges.
    pub fn scan(&mut self) {
        self.ranges = core_scan::scan(&self.text, self.text_vaddr);
    }

    /// Posts one decode job per code range that overlaps `[vstart, vend)`,
    /// clipped to the window. Succeeds iff at least one job was posted.
    pub fn post_range<F>(&self, pool: &Pool, vstart: u64, vend: u64, on_batch: F) -> Result<(), EmitError>
    where
        F: Fn(Batch) + Send + Sync + 'static,
    {
        let cb = Arc::new(on_batch);
        let mut posted = 0usize;
        for range in &self.ranges {
            let r_start = range.vaddr;
            let r_end = range.vaddr + range.length as u64;
            if r_end <= vstart || r_start >= vend {
                continue;
            }
            let lo = r_start.max(vstart);
            let hi = r_end.min(vend);
            let sub_offset = range.offset + (lo - r_start) as usize;
            let sub_len = (hi - lo) as usize;
            if sub_len == 0 {
                continue;
            }
            if self.post_one(pool, sub_offset, sub_len, lo, Arc::clone(&cb)).is_ok() {
                posted += 1;
            }
        }
        if posted == 0 {
            return Err(EmitError::PostFailure);
        }
        Ok(())
    }

    /// Posts one decode job per code range.
    pub fn post_all<F>(&self, pool: &Pool, on_batch: F) -> Result<(), EmitError>
    where
        F: Fn(Batch) + Send + Sync + 'static,
    {
        let cb = Arc::new(on_batch);
        let mut posted = 0usize;
        for range in &self.ranges {
            if self
                .post_one(pool, range.offset, range.length, range.vaddr, Arc::clone(&cb))
                .is_ok()
            {
                posted += 1;
            }
        }
        if posted == 0 && !self.ranges.is_empty() {
            return Err(EmitError::PostFailure);
        }
        Ok(())
    }

    fn post_one<F>(
        &self,
        pool: &Pool,
        offset: usize,
        length: usize,
        vaddr: u64,
        cb: Arc<F>,
    ) -> Result<(), core_pool::PoolError>
    where
        F: Fn(Batch) + Send + Sync + 'static,
    {
        let bytes = self.text[offset..offset + length].to_vec();
        let tuple = self.tuple;
        pool.post(move || {
            let batch = core_decode::run_job(tuple, bytes, vaddr);
            cb(batch);
        })
    }

    /// Printable-run string extraction restricted to `.rodata`, `.data`,
    /// `.dynstr`, and `.strtab` — the sections a compiled object actually
    /// uses for literal and symbol-name storage — reading each section's
    /// bytes directly from disk.
    pub fn extract_strings(&self, min_len: usize) -> Vec<ExtractedString> {
        const CANDIDATE_SECTIONS: [&str; 4] = [".rodata", ".data", ".dynstr", ".strtab"];
        let mut out = Vec::new();
        for shdr in &self.model.section_headers {
            if shdr.sh_type == core_elf::SHT_NOBITS || shdr.size == 0 {
                continue;
            }
            if !self
                .model
                .section_name(shdr)
                .is_some_and(|name| CANDIDATE_SECTIONS.contains(&name))
            {
                continue;
            }
            match read_section_bytes(&self.model.path, shdr) {
                Ok(bytes) => strings::collect_strings(&bytes, shdr.addr, min_len, &mut out),
                Err(error) => {
                    tracing::debug!(target: "emit", %error, "failed to read section for string extraction");
                }
            }
        }
        out
    }

    /// Symbol-table extraction across `.symtab` and `.dynsym`.
    pub fn extract_symbols(&self) -> Vec<SymbolRecord> {
        symbols::extract_symbols(&self.model)
    }
}
