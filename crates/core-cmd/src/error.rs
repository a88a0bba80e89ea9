#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("no object loaded (use `open <path>` first)")]
    NoObjectLoaded,
    #[error("goto is only valid in the instructions view")]
    WrongView,
    #[error("address {0:#x} is outside the loaded range")]
    OutOfRange(u64),
    #[error("malformed command: {0}")]
    Malformed(String),
    #[error("unrecognized command: {0}")]
    Unrecognized(String),
    #[error("cannot open {path}: {source}")]
    NotOpenable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Emit(#[from] core_emit::EmitError),
}
