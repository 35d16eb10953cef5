use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "readqc", version, about = "Streaming QC metrics and trimming for FASTQ")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute quality-control metrics and write a text report
    Qc(QcArgs),
    /// Drop reads failing quality/length thresholds
    Trim(TrimArgs),
}

#[derive(Parser)]
pub struct QcArgs {
    pub input: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = num_cpus::get())]
    pub threads: usize,

    #[arg(long)]
    pub sample_name: Option<String>,

    #[arg(long, value_enum, default_value_t = PhredOffsetArg::P33)]
    pub phred_offset: PhredOffsetArg,
}

#[derive(Parser)]
pub struct TrimArgs {
    pub input: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = 36)]
    pub min_length: usize,

    #[arg(long, default_value_t = 20)]
    pub quality_threshold: u8,

    #[arg(long, value_enum, default_value_t = PhredOffsetArg::P33)]
    pub phred_offset: PhredOffsetArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PhredOffsetArg {
    #[value(name = "33")]
    P33,
    #[value(name = "64")]
    P64,
}

impl PhredOffsetArg {
    pub fn offset(self) -> u8 {
        match self {
            PhredOffsetArg::P33 => 33,
            PhredOffsetArg::P64 => 64,
        }
    }
}
