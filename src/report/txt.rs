use crate::core::engine::RunOutput;
use crate::core::metrics::FinalMetrics;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Plain-text report: a human summary header followed by tab-separated
/// module tables for downstream plotting. The engine exposes data; anything
/// graphical is someone else's job.
pub fn write(path: &Path, output: &RunOutput, metrics: &FinalMetrics) -> Result<()> {
    let mut w =
        BufWriter::new(File::create(path).with_context(|| "create qc report file failed")?);

    writeln!(w, "FASTQ Quality Report: {}", output.ctx.file_name)?;
    writeln!(w, "{}", "=".repeat(50))?;
    writeln!(w, "Total Sequences: {}", metrics.basic.total_reads)?;
    writeln!(w, "Skipped Reads: {}", output.skipped_reads)?;
    writeln!(
        w,
        "Distinct Sequences: {}",
        metrics.basic.distinct_sequences
    )?;
    writeln!(w, "Average Length: {:.1} bp", metrics.basic.mean_length)?;
    writeln!(w, "GC Content: {:.1}%", metrics.basic.mean_gc)?;
    writeln!(
        w,
        "Average Per Sequence Quality: {:.1}",
        metrics.basic.mean_qual
    )?;
    writeln!(
        w,
        "Maximum Adapter Content: {:.2}%",
        metrics.basic.max_adapter_percent
    )?;
    writeln!(w)?;

    writeln!(w, "Overrepresented Sequences:")?;
    for row in &metrics.overrepresented {
        writeln!(
            w,
            "Sequence: {}, Count: {}, Percentage: {:.5}%, Source: {}",
            row.sequence, row.count, row.percent, row.source
        )?;
    }
    writeln!(w)?;

    writeln!(w, ">>Per base sequence quality")?;
    writeln!(w, "#Position\tMean\tMedian\tLower Quartile\tUpper Quartile")?;
    for row in &metrics.per_base_qual {
        writeln!(
            w,
            "{}\t{:.4}\t{:.1}\t{}\t{}",
            row.pos, row.mean, row.median, row.lower_quartile, row.upper_quartile
        )?;
    }
    writeln!(w, ">>END_MODULE")?;

    writeln!(w, ">>Per tile sequence quality")?;
    writeln!(w, "#Tile\tPosition\tMean")?;
    for row in &metrics.per_tile_qual {
        for (pos, mean) in row.mean_by_pos.iter().enumerate() {
            writeln!(w, "{}\t{}\t{:.4}", row.tile, pos, mean)?;
        }
    }
    writeln!(w, ">>END_MODULE")?;

    writeln!(w, ">>Per base sequence content")?;
    writeln!(w, "#Position\tA\tT\tC\tG")?;
    for row in &metrics.per_base_content {
        writeln!(
            w,
            "{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}",
            row.pos, row.a, row.t, row.c, row.g
        )?;
    }
    writeln!(w, ">>END_MODULE")?;

    writeln!(w, ">>Per base N content")?;
    writeln!(w, "#Position\tN Percent")?;
    for row in &metrics.per_base_n {
        writeln!(w, "{}\t{:.4}", row.pos, row.n_percent)?;
    }
    writeln!(w, ">>END_MODULE")?;

    writeln!(w, ">>Adapter Content")?;
    writeln!(w, "#Position\tPercent")?;
    for row in &metrics.adapter_content {
        writeln!(w, "{}\t{:.4}", row.pos, row.percent)?;
    }
    writeln!(w, ">>END_MODULE")?;

    writeln!(w, ">>Sequence Duplication Levels")?;
    writeln!(w, "#Occurrences\tDistinct Sequences")?;
    for row in &metrics.duplication {
        writeln!(w, "{}\t{}", row.occurrences, row.distinct)?;
    }
    writeln!(w, ">>END_MODULE")?;

    Ok(())
}
