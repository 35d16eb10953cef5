pub mod engine;
pub mod fastq;
pub mod io;
pub mod library;
pub mod metrics;
pub mod model;
pub mod trim;
