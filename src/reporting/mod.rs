//! Report generation

pub mod report_writer;

pub use report_writer::{format_bytes, write_json_report, write_report};
