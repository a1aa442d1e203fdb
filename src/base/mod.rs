//! Foundation types for the dialect assist core.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`ProjectKey`] - Identity of a host project
//! - [`SourcePath`] - Identity of one dialect definition source
//! - [`AssistConfig`] - Tunables for scanning, change tracking and scoping
//! - [`TextSize`], [`TextRange`] - Byte offsets into markup documents
//! - Domain constants (schema namespace, bundled directory, file extensions)
//!
//! This module has NO dependencies on other crate modules.

mod config;
pub mod constants;
mod keys;

pub use config::AssistConfig;
pub use keys::{ProjectKey, SourcePath};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
