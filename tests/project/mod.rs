//! Dialect source tests
//!
//! Tests for:
//! - Project dependency scans over directories, archives and loose files
//! - Bundled directory loading
//! - Loader behavior on malformed sources

pub mod tests_locators;
