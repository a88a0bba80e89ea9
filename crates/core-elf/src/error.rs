#[derive(Debug, thiserror::Error)]
pub enum ElfError {
    #[error("failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("file is too short to contain an ELF header")]
    TruncatedHeader,
    #[error("missing ELF magic bytes")]
    BadMagic,
    #[error("unsupported ELF class byte {0:#x}")]
    UnsupportedClass(u8),
}
