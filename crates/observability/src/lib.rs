//! Tracing/logging setup shared by every binary in the workspace.

pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide logging in the given output format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    tracing::init(format);
}
