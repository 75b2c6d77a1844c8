//! Exit code constants for CLI commands
//!
//! - 0: Success
//! - 1: Runtime failure (I/O, server errors)
//! - 2: Invalid input or configuration

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Runtime failure such as an unreadable file or a server error
pub const EXIT_WARNING: i32 = 1;

/// Invalid documents, arguments or configuration
pub const EXIT_ERROR: i32 = 2;
