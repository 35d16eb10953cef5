use crate::core::fastq::OwnedRead;

#[derive(Clone, Copy, Debug)]
pub struct TrimConfig {
    pub min_length: usize,
    pub quality_threshold: u8,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            min_length: 36,
            quality_threshold: 20,
        }
    }
}

/// Lazy, order-preserving whole-read filter: a read survives iff its minimum
/// quality clears the threshold and its length clears the floor. No
/// positions are trimmed within a read; failing reads are silently dropped.
pub fn trim<I>(reads: I, cfg: TrimConfig) -> impl Iterator<Item = OwnedRead>
where
    I: Iterator<Item = OwnedRead>,
{
    reads.filter(move |read| keeps(read, cfg))
}

pub fn keeps(read: &OwnedRead, cfg: TrimConfig) -> bool {
    if read.seq.len() < cfg.min_length {
        return false;
    }
    match read.qual.iter().min() {
        Some(&q) => q >= cfg.quality_threshold,
        None => false,
    }
}
