//! Logging facilities for Horizon Trellis.
//!
//! Horizon Trellis uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_trellis_core::observable=trace")
//!     .init();
//! ```
//!
//! Emission paths log at `trace`, rejected no-op operations at `debug` and
//! configuration problems at `warn`.

use std::fmt;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_trellis_core";
    /// Observer pool target.
    pub const SIGNAL: &str = "horizon_trellis_core::signal";
    /// Observable containers and the diff engine.
    pub const OBSERVABLE: &str = "horizon_trellis_core::observable";
    /// Observable properties.
    pub const PROPERTY: &str = "horizon_trellis_core::property";
    /// Selection models.
    pub const SELECTION: &str = "horizon_trellis::selection";
    /// Virtualized list and tree rows.
    pub const LIST: &str = "horizon_trellis::list";
    /// Focus management and keyboard traversal.
    pub const FOCUS: &str = "horizon_trellis::focus";
    /// Configuration loading.
    pub const CONFIG: &str = "horizon_trellis::config";
}

/// Compact `-removed +added ~moved` rendering of a change set for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Number of removed entries.
    pub removed: usize,
    /// Number of added entries.
    pub added: usize,
    /// Number of moved entries.
    pub moved: usize,
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-{} +{} ~{}", self.removed, self.added, self.moved)
    }
}
