//! Duplicate File Scanner Library
//!
//! Recursively collects regular files above a size threshold and computes
//! SHA-256 digests so files with identical content can be grouped.

pub mod core;
pub mod scanner;
pub mod reporting;

pub use crate::core::hasher;
pub use crate::scanner::file_scanner;
pub use crate::reporting::report_writer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::core::config::ScanConfig;
    pub use crate::core::hasher::{hash_file, ReadError, DIGEST_HEX_LEN};
    pub use crate::scanner::file_scanner::{FileInfo, ScanError, ScanResult, Scanner, TraversalError};
    pub use crate::scanner::duplicate_detector::{
        candidate_count, find_duplicates, group_by_size, DuplicateGroup, DuplicateReport, SizeGroup,
    };
    pub use crate::reporting::report_writer::{format_bytes, write_json_report, write_report};
}
