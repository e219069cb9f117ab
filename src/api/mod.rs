//! Purpose: Define the stable public Rust API boundary for resmode.
//! Exports: Configuration, mode, and error types needed by the CLI and embedders.
//! Role: Public, additive-only surface; hides internal parsing modules.
//! Invariants: This module is the only public path to the document model.
//! Invariants: Internal modules remain private and are not directly exposed.

pub use crate::core::config::{
    Config, DEFAULT_KEY, HEIGHT_KEY, Mode, ModeEntry, WIDTH_KEY, resolve_path,
};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
