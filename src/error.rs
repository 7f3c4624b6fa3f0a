//! Error types for the Tiny BASIC core.
//!
//! Two error vocabularies coexist deliberately:
//!
//! - [`BasicError`] covers host-observable failures that are not part of the
//!   interpreted language's own error reporting — a `SAVE`/`LOAD` path the OS
//!   refuses to open, for instance. These surface from the public API as
//!   `Result<_, BasicError>`.
//! - Parse and runtime errors that a running BASIC program can trigger
//!   (unknown statement, `GOTO` to a missing line, `RETURN` with an empty
//!   stack, ...) are plain messages delivered through
//!   [`crate::engine::io::IoHost::show_error`], exactly as the language spec
//!   describes them. They are not exceptions; the engine never panics on
//!   them, so wrapping them in `BasicError` would misrepresent them as host
//!   failures instead of ordinary, recoverable language events.

use std::path::PathBuf;

/// A host-observable failure: something outside the interpreted language's
/// own error vocabulary went wrong.
#[derive(Debug, thiserror::Error)]
pub enum BasicError {
    #[error("cannot read program file {path:?}: {source}")]
    LoadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write program file {path:?}: {source}")]
    SaveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
