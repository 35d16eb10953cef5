use crate::cli::args::{Cli, Commands, QcArgs, TrimArgs};
use crate::core::engine::{self, RunConfig};
use crate::core::fastq::{self, FastqReader};
use crate::core::library::KnownSeqLibrary;
use crate::core::trim::{self, TrimConfig};
use crate::error::FastqError;
use crate::report;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::env;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::time::{Duration, Instant};

pub fn entry() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Qc(args) => qc(args),
        Commands::Trim(args) => trim(args),
    }
}

fn qc(args: QcArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    if !args.input.is_file() {
        bail!("input file not found: {}", args.input.display());
    }
    if args.threads == 0 {
        bail!("--threads must be >= 1");
    }

    let sample_name = match args.sample_name {
        Some(s) => s,
        None => args
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .context("failed to determine sample name from input file")?,
    };

    fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create output dir {}", args.out.display()))?;

    let config = RunConfig {
        input: args.input.clone(),
        sample_name: sample_name.clone(),
        threads: args.threads,
        phred_offset: args.phred_offset.offset(),
    };

    let t_engine = Instant::now();
    let output = engine::run(config)?;
    stage_done(stats, "engine", t_engine);

    let library = KnownSeqLibrary::default();
    let t_finalize = Instant::now();
    let metrics = output.agg.finalize(&library);
    stage_done(stats, "finalize", t_finalize);

    let report_path = args.out.join(format!("{}_qc_report.txt", sample_name));
    let t_report = Instant::now();
    report::txt::write(&report_path, &output, &metrics)
        .with_context(|| format!("failed to write {}", report_path.display()))?;
    stage_done(stats, "report", t_report);

    if output.skipped_reads > 0 {
        eprintln!("readqc: skipped {} malformed reads", output.skipped_reads);
    }
    if stats {
        eprintln!(
            "READQC_STATS input={} reads={} distinct={} skipped={}",
            args.input.display(),
            output.agg.total_reads,
            output.agg.distinct_sequences(),
            output.skipped_reads
        );
        eprintln!("READQC_STATS output={}", report_path.display());
        eprintln!("READQC_STATS total={}", fmt_dur(t0.elapsed()));
    }

    Ok(())
}

fn trim(args: TrimArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    if !args.input.is_file() {
        bail!("input file not found: {}", args.input.display());
    }

    let offset = args.phred_offset.offset();
    let mut reader = FastqReader::from_path(&args.input, offset)
        .with_context(|| format!("failed to open {}", args.input.display()))?;

    let out_file = File::create(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;
    let mut w = BufWriter::new(out_file);

    let cfg = TrimConfig {
        min_length: args.min_length,
        quality_threshold: args.quality_threshold,
    };

    let mut kept = 0u64;
    let mut dropped = 0u64;
    let mut skipped = 0u64;
    loop {
        match reader.next() {
            None => break,
            Some(Ok(read)) => {
                if trim::keeps(&read, cfg) {
                    fastq::write_record(&mut w, &read, offset)
                        .with_context(|| format!("failed to write {}", args.out.display()))?;
                    kept += 1;
                } else {
                    dropped += 1;
                }
            }
            Some(Err(e @ FastqError::Format { .. })) => {
                skipped += 1;
                log::warn!("skipping malformed record: {e}");
                if !reader.resync_to_next_header() {
                    break;
                }
            }
            Some(Err(e)) => return Err(e.into()),
        }
    }
    w.flush()
        .with_context(|| format!("failed to flush {}", args.out.display()))?;

    if skipped > 0 {
        eprintln!("readqc: skipped {} malformed reads", skipped);
    }
    if stats {
        eprintln!(
            "READQC_STATS kept={} dropped={} skipped={} total={}",
            kept,
            dropped,
            skipped,
            fmt_dur(t0.elapsed())
        );
    }

    Ok(())
}

fn stats_enabled() -> bool {
    matches!(env::var("READQC_STATS").as_deref(), Ok("1"))
}

fn stage_done(stats: bool, name: &str, t: Instant) {
    if stats {
        eprintln!("READQC_STATS stage={} time={}", name, fmt_dur(t.elapsed()));
    }
}

fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}
