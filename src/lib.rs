//! Streaming quality-control metrics and read trimming for FASTQ.
//!
//! - One pass per component: accumulate, then finalize.
//! - Plain and `.gz` input (auto-detect by magic bytes).
//! - Malformed records are skipped and counted, never fatal.
//! - Known-sequence tables are injected values, not module state.

pub mod cli;
pub mod core;
pub mod error;
pub mod report;
