#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error(transparent)]
    Elf(#[from] core_elf::ElfError),
    #[error("no .text section present")]
    NoTextSection,
    #[error("failed to post any job to the pool")]
    PostFailure,
}
