//! Directory scanning and duplicate grouping

pub mod file_scanner;
pub mod duplicate_detector;

pub use file_scanner::{FileInfo, ScanError, ScanResult, Scanner, TraversalError};
pub use duplicate_detector::{
    candidate_count, find_duplicates, group_by_size, DuplicateGroup, DuplicateReport, SizeGroup,
};
