//! Domain constants.

use std::time::Duration;

/// Namespace URI the root element of every dialect definition must be bound to.
pub const DIALECT_SCHEMA_NAMESPACE: &str = "http://www.thymeleaf.org/extras/dialect";

/// Directory searched for bundled dialect definitions.
pub const BUNDLED_DIALECTS_DIR: &str = "dialects";

/// Extension of dialect definition files.
pub const DIALECT_FILE_EXTENSION: &str = "xml";

/// Extensions of packaged dependency archives that are opened during a scan.
pub const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "zip"];

/// Default wait for project scan workers before outstanding work is cancelled.
pub const DEFAULT_SCAN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Default drain window for the change tracker queue on shutdown.
pub const DEFAULT_SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Prefix of namespace declaration attributes (`xmlns:th="..."`).
pub const XMLNS_PREFIX: &str = "xmlns:";

/// Prefix of the `data-*` spelling of attribute processors.
pub const DATA_ATTRIBUTE_PREFIX: &str = "data-";
