//! Upload operations
//!
//! This module pins files to the pinning service and decodes its response.

pub mod operations;
pub mod types;

pub use operations::store_files;
pub use types::PinResponse;
