//! Process-wide tracing setup shared by the binaries.

/// Initialize process-wide tracing from the environment.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    tracing::init();
}

pub mod tracing;
