//! Process exit codes. Part of the CLI contract.

use covtrack_core::CoverageError;

pub const SUCCESS: i32 = 0;
pub const CLIENT_ERROR: i32 = 1; // Validation or not-found
pub const INTERNAL_ERROR: i32 = 2; // Storage, timeout, I/O

pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<CoverageError>() {
        Some(e) if e.is_client_error() => CLIENT_ERROR,
        _ => INTERNAL_ERROR,
    }
}
