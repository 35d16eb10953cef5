use crate::core::fastq::{FastqReader, OwnedRead};
use crate::core::metrics::{AdapterScanner, Agg};
use crate::core::model::FinalizeContext;
use crate::error::FastqError;
use anyhow::{Context, Result, anyhow};
use crossbeam_channel as channel;
use std::path::PathBuf;
use std::thread;

const BATCH_READS: usize = 4096;
// Past this many distinct sequences the exact frequency map dominates memory.
const DISTINCT_SEQ_WARN: usize = 5_000_000;

pub struct RunConfig {
    pub input: PathBuf,
    pub sample_name: String,
    pub threads: usize,
    pub phred_offset: u8,
}

pub struct RunOutput {
    pub agg: Agg,
    pub ctx: FinalizeContext,
    pub skipped_reads: u64,
}

/// One pass over the input: every readable record is folded into the
/// aggregates, malformed records are skipped and counted. Only a failing
/// stream aborts the run.
pub fn run(cfg: RunConfig) -> Result<RunOutput> {
    let file_name = cfg
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .context("failed to determine input filename")?;
    let ctx = FinalizeContext {
        file_name,
        sample_name: cfg.sample_name,
        phred_offset: cfg.phred_offset,
    };

    let reader = FastqReader::from_path(&cfg.input, cfg.phred_offset)
        .with_context(|| format!("failed to open {}", cfg.input.display()))?;
    let scanner = AdapterScanner::default();

    let (agg, skipped_reads) = if cfg.threads <= 1 {
        run_sequential(reader, &scanner)?
    } else {
        run_sharded(reader, &scanner, cfg.threads)?
    };

    if agg.distinct_sequences() > DISTINCT_SEQ_WARN {
        log::warn!(
            "frequency map holds {} distinct sequences; memory grows with every new distinct read",
            agg.distinct_sequences()
        );
    }
    log::debug!(
        "{} reads observed, {} skipped",
        agg.total_reads,
        skipped_reads
    );

    Ok(RunOutput {
        agg,
        ctx,
        skipped_reads,
    })
}

fn run_sequential(mut reader: FastqReader, scanner: &AdapterScanner) -> Result<(Agg, u64)> {
    let mut agg = Agg::new();
    let mut skipped = 0u64;
    loop {
        match reader.next() {
            None => break,
            Some(Ok(read)) => {
                if let Err(e) = agg.observe(&read, scanner) {
                    skipped += 1;
                    log::warn!("skipping read {}: {e}", read.id);
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
    Ok((agg, skipped))
}

struct Batch {
    index: usize,
    base: u64,
    reads: Vec<OwnedRead>,
}

/// Sharded variant of the same single pass: the producer parses record
/// batches carrying their global ordinal base, workers fold batches into
/// independent shards, and shards merge in batch-index order. Encounter
/// order, and with it the overrepresentation tie-break, is preserved.
fn run_sharded(
    mut reader: FastqReader,
    scanner: &AdapterScanner,
    threads: usize,
) -> Result<(Agg, u64)> {
    let (batch_tx, batch_rx) = channel::bounded::<Batch>(threads * 2);
    let (result_tx, result_rx) = channel::unbounded::<(usize, Agg, u64)>();
    let (total_tx, total_rx) = channel::bounded::<Result<(usize, u64)>>(1);

    let producer = thread::spawn(move || {
        let mut index = 0usize;
        let mut base = 0u64;
        let mut skipped = 0u64;
        let mut reads = Vec::with_capacity(BATCH_READS);
        loop {
            match reader.next() {
                None => break,
                Some(Ok(read)) => {
                    reads.push(read);
                    if reads.len() == BATCH_READS {
                        let batch = Batch {
                            index,
                            base,
                            reads: std::mem::replace(&mut reads, Vec::with_capacity(BATCH_READS)),
                        };
                        base += BATCH_READS as u64;
                        if batch_tx.send(batch).is_err() {
                            return;
                        }
                        index += 1;
                    }
                }
                Some(Err(e @ FastqError::Format { .. })) => {
                    skipped += 1;
                    log::warn!("skipping malformed record: {e}");
                    if !reader.resync_to_next_header() {
                        break;
                    }
                }
                Some(Err(e)) => {
                    let _ = total_tx.send(Err(e.into()));
                    return;
                }
            }
        }
        if !reads.is_empty() {
            let batch = Batch { index, base, reads };
            if batch_tx.send(batch).is_err() {
                return;
            }
            index += 1;
        }
        let _ = total_tx.send(Ok((index, skipped)));
    });

    let mut workers = Vec::with_capacity(threads);
    for _ in 0..threads {
        let rx = batch_rx.clone();
        let tx = result_tx.clone();
        let scanner = scanner.clone();
        workers.push(thread::spawn(move || {
            for batch in rx.iter() {
                let mut agg = Agg::with_base(batch.base);
                let mut skipped = 0u64;
                for read in &batch.reads {
                    if let Err(e) = agg.observe(read, &scanner) {
                        skipped += 1;
                        log::warn!("skipping read {}: {e}", read.id);
                    }
                }
                if tx.send((batch.index, agg, skipped)).is_err() {
                    break;
                }
            }
        }));
    }
    drop(batch_rx);
    drop(result_tx);

    let (total_batches, parse_skipped) = total_rx
        .recv()
        .context("producer terminated without result")??;

    let mut parts: Vec<Option<Agg>> = Vec::new();
    parts.resize_with(total_batches, || None);
    let mut observe_skipped = 0u64;
    for _ in 0..total_batches {
        let (index, agg, skipped) = result_rx
            .recv()
            .context("failed to receive batch result")?;
        if index >= parts.len() {
            return Err(anyhow!("invalid batch index {}", index));
        }
        parts[index] = Some(agg);
        observe_skipped += skipped;
    }

    let _ = producer.join();
    for worker in workers {
        let _ = worker.join();
    }

    let mut agg = Agg::new();
    for part in parts.into_iter().flatten() {
        agg.merge(&part);
    }
    Ok((agg, parse_skipped + observe_skipped))
}
