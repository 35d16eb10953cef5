use crate::core::fastq::OwnedRead;
use crate::core::library::KnownSeqLibrary;
use crate::core::model::{
    MAX_Q, QualHist, hist_total, mean_from_hist, median_from_hist, select_from_hist,
};
use crate::error::DegenerateRead;

mod adapter;
mod frequency;
mod per_tile;

pub use adapter::AdapterScanner;
pub use frequency::{DuplicationRow, OverrepRow, SequenceCounts};
pub use per_tile::{PerTileRow, TileQual};

#[derive(Clone, Debug)]
pub struct BaseCounts {
    pub a: u64,
    pub c: u64,
    pub g: u64,
    pub t: u64,
    pub n: u64,
}

impl BaseCounts {
    fn zero() -> Self {
        Self {
            a: 0,
            c: 0,
            g: 0,
            t: 0,
            n: 0,
        }
    }

    fn add_assign(&mut self, other: &BaseCounts) {
        self.a += other.a;
        self.c += other.c;
        self.g += other.g;
        self.t += other.t;
        self.n += other.n;
    }
}

/// Streaming metrics accumulator. `observe` is pure accumulation: counters
/// incremented, per-read values appended, nothing derived. Exclusively owned
/// by one run; shards merge with `merge` in shard order.
#[derive(Clone, Debug)]
pub struct Agg {
    pub total_reads: u64,
    pub lengths: Vec<u32>,
    pub gc_percent: Vec<f64>,
    pub mean_qual: Vec<f64>,
    pub per_pos_qual: Vec<QualHist>,
    pub per_pos_base: Vec<BaseCounts>,
    pub per_pos_adapter: Vec<u64>,
    pub tiles: TileQual,
    pub sequences: SequenceCounts,
    ordinal_base: u64,
}

impl Agg {
    pub fn new() -> Self {
        Self::with_base(0)
    }

    /// Shard accumulator whose encounter ordinals start at `ordinal_base`,
    /// so merged shards keep the global first-seen order.
    pub fn with_base(ordinal_base: u64) -> Self {
        Self {
            total_reads: 0,
            lengths: Vec::new(),
            gc_percent: Vec::new(),
            mean_qual: Vec::new(),
            per_pos_qual: Vec::new(),
            per_pos_base: Vec::new(),
            per_pos_adapter: Vec::new(),
            tiles: TileQual::new(),
            sequences: SequenceCounts::new(),
            ordinal_base,
        }
    }

    pub fn distinct_sequences(&self) -> usize {
        self.sequences.len()
    }

    /// Fold one read into the aggregates. Degenerate reads fail before any
    /// state is touched; the caller skips them and keeps going.
    pub fn observe(
        &mut self,
        read: &OwnedRead,
        scanner: &AdapterScanner,
    ) -> Result<(), DegenerateRead> {
        let len = read.seq.len();
        if len == 0 {
            return Err(DegenerateRead::EmptySequence);
        }
        if read.qual.len() != len {
            return Err(DegenerateRead::LengthMismatch {
                seq: len,
                qual: read.qual.len(),
            });
        }
        let ordinal = self.ordinal_base + self.total_reads;

        self.lengths.push(len as u32);

        if self.per_pos_qual.len() < len {
            self.per_pos_qual.resize(len, [0u64; MAX_Q + 1]);
        }
        if self.per_pos_base.len() < len {
            self.per_pos_base.resize(len, BaseCounts::zero());
        }
        let mut gc: u64 = 0;
        let mut sum_q: u64 = 0;
        for i in 0..len {
            let upper = read.seq[i] & 0xDF;
            let base = &mut self.per_pos_base[i];
            match upper {
                b'A' => base.a += 1,
                b'C' => {
                    base.c += 1;
                    gc += 1;
                }
                b'G' => {
                    base.g += 1;
                    gc += 1;
                }
                b'T' => base.t += 1,
                b'N' => base.n += 1,
                _ => {}
            }
            let q = read.qual[i].min(MAX_Q as u8);
            sum_q += q as u64;
            self.per_pos_qual[i][q as usize] += 1;
        }
        self.gc_percent.push(gc as f64 * 100.0 / len as f64);
        self.mean_qual.push(sum_q as f64 / len as f64);

        if let Some(tile) = read.tile_key() {
            self.tiles.record(tile, &read.qual);
        }

        scanner.scan(&read.seq, &mut self.per_pos_adapter);

        self.sequences.record(&read.seq, ordinal);
        self.total_reads += 1;
        Ok(())
    }

    /// Element-wise sum of counts, union of map keys; per-read vectors are
    /// concatenated, so shards must merge in stream order.
    pub fn merge(&mut self, other: &Agg) {
        self.total_reads += other.total_reads;
        self.lengths.extend_from_slice(&other.lengths);
        self.gc_percent.extend_from_slice(&other.gc_percent);
        self.mean_qual.extend_from_slice(&other.mean_qual);

        if self.per_pos_qual.len() < other.per_pos_qual.len() {
            self.per_pos_qual
                .resize(other.per_pos_qual.len(), [0u64; MAX_Q + 1]);
        }
        for (i, hist) in other.per_pos_qual.iter().enumerate() {
            let target = &mut self.per_pos_qual[i];
            for q in 0..=MAX_Q {
                target[q] += hist[q];
            }
        }
        if self.per_pos_base.len() < other.per_pos_base.len() {
            self.per_pos_base
                .resize(other.per_pos_base.len(), BaseCounts::zero());
        }
        for (i, bc) in other.per_pos_base.iter().enumerate() {
            self.per_pos_base[i].add_assign(bc);
        }
        if self.per_pos_adapter.len() < other.per_pos_adapter.len() {
            self.per_pos_adapter.resize(other.per_pos_adapter.len(), 0);
        }
        for (i, &c) in other.per_pos_adapter.iter().enumerate() {
            self.per_pos_adapter[i] += c;
        }

        self.tiles.merge(&other.tiles);
        self.sequences.merge(&other.sequences);
    }

    /// Derive the read-only metrics snapshot. Pure function of the final
    /// accumulator state; a zero-read accumulator yields an all-empty
    /// result, never an error.
    pub fn finalize(&self, library: &KnownSeqLibrary) -> FinalMetrics {
        let total = self.total_reads;

        let mut per_base_qual = Vec::with_capacity(self.per_pos_qual.len());
        for (pos, hist) in self.per_pos_qual.iter().enumerate() {
            let n = hist_total(hist);
            let row = if n == 0 {
                PerBaseQualRow {
                    pos,
                    mean: 0.0,
                    median: 0.0,
                    lower_quartile: 0,
                    upper_quartile: 0,
                }
            } else {
                PerBaseQualRow {
                    pos,
                    mean: mean_from_hist(hist),
                    median: median_from_hist(hist),
                    lower_quartile: select_from_hist(hist, n / 4),
                    upper_quartile: select_from_hist(hist, 3 * n / 4),
                }
            };
            per_base_qual.push(row);
        }

        let per_tile_qual = self.tiles.mean_grid();

        let mut per_base_content = Vec::new();
        for (pos, bc) in self.per_pos_base.iter().enumerate() {
            let denom = bc.a + bc.c + bc.g + bc.t + bc.n;
            if denom == 0 {
                continue;
            }
            let d = denom as f64;
            per_base_content.push(PerBaseContentRow {
                pos,
                a: bc.a as f64 * 100.0 / d,
                t: bc.t as f64 * 100.0 / d,
                c: bc.c as f64 * 100.0 / d,
                g: bc.g as f64 * 100.0 / d,
            });
        }

        let mut per_base_n = Vec::new();
        let mut adapter_content = Vec::new();
        let mut max_adapter_percent: f64 = 0.0;
        if total > 0 {
            for (pos, bc) in self.per_pos_base.iter().enumerate() {
                if bc.n > 0 {
                    per_base_n.push(PerBaseNRow {
                        pos,
                        n_percent: bc.n as f64 * 100.0 / total as f64,
                    });
                }
            }
            for (pos, &count) in self.per_pos_adapter.iter().enumerate() {
                if count == 0 {
                    continue;
                }
                let percent = count as f64 * 100.0 / total as f64;
                if percent > max_adapter_percent {
                    max_adapter_percent = percent;
                }
                adapter_content.push(AdapterRow { pos, percent });
            }
        }

        let duplication = self.sequences.duplication_histogram();
        let overrepresented = self.sequences.overrepresented(total, library);

        let basic = BasicStats {
            total_reads: total,
            distinct_sequences: self.sequences.len(),
            mean_length: mean_u32(&self.lengths),
            mean_gc: mean_f64(&self.gc_percent),
            mean_qual: mean_f64(&self.mean_qual),
            max_adapter_percent,
        };

        FinalMetrics {
            basic,
            per_base_qual,
            per_tile_qual,
            per_base_content,
            per_base_n,
            adapter_content,
            duplication,
            overrepresented,
        }
    }
}

impl Default for Agg {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BasicStats {
    pub total_reads: u64,
    pub distinct_sequences: usize,
    pub mean_length: f64,
    pub mean_gc: f64,
    pub mean_qual: f64,
    pub max_adapter_percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PerBaseQualRow {
    pub pos: usize,
    pub mean: f64,
    pub median: f64,
    pub lower_quartile: u8,
    pub upper_quartile: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PerBaseContentRow {
    pub pos: usize,
    pub a: f64,
    pub t: f64,
    pub c: f64,
    pub g: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PerBaseNRow {
    pub pos: usize,
    pub n_percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdapterRow {
    pub pos: usize,
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FinalMetrics {
    pub basic: BasicStats,
    pub per_base_qual: Vec<PerBaseQualRow>,
    pub per_tile_qual: Vec<PerTileRow>,
    pub per_base_content: Vec<PerBaseContentRow>,
    pub per_base_n: Vec<PerBaseNRow>,
    pub adapter_content: Vec<AdapterRow>,
    pub duplication: Vec<DuplicationRow>,
    pub overrepresented: Vec<OverrepRow>,
}

fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn mean_u32(values: &[u32]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|&v| v as u64).sum::<u64>() as f64 / values.len() as f64
    }
}
