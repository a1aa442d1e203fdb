//! # dialect-assist
//!
//! Core library for editing markup written against templating dialects:
//! dialect registry, matching engine, completion and hover.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Completion proposals, hover, cursor-context adapter traits
//!   ↓
//! matching  → Namespace scoping, name/pattern matching, restrictions
//!   ↓
//! registry  → Bundled + per-project dialects, change tracking
//!   ↓
//! project   → Locators (bundled, project scan, single file), loader
//!   ↓
//! dialect   → Dialect model, XML definition reader, helper synthesis
//!   ↓
//! base      → Primitives (ProjectKey, SourcePath, AssistConfig, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → dialect → project → registry → matching → ide)
// ============================================================================

/// Foundation types: ProjectKey, SourcePath, configuration
pub mod base;

/// Dialect model and definition reading
pub mod dialect;

/// Dialect sources: locators and the loader
pub mod project;

/// Dialect registry with memoized per-project views
pub mod registry;

/// Scoping, matching and restrictions
pub mod matching;

/// IDE features: completion, hover
pub mod ide;

// Re-export foundation types
pub use base::{AssistConfig, ProjectKey, SourcePath, TextRange, TextSize};
pub use dialect::{Dialect, DialectError, DialectItem};
pub use ide::{Analysis, AssistHost};
pub use registry::{ChangeBatch, ChangeTracker, DialectRegistry};
