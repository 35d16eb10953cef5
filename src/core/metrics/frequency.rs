use crate::core::library::KnownSeqLibrary;
use std::collections::HashMap;

// Overrepresented sequences are reported truncated; counts stay exact.
const REPORT_SEQ_LEN: usize = 50;
const TOP_OVERREP: usize = 10;

#[derive(Clone, Debug)]
pub struct SeqEntry {
    pub count: u64,
    pub first_seen: u64,
}

/// Exact sequence frequency map (case-sensitive, no normalization). Grows
/// with the number of distinct sequences seen and is never evicted; callers
/// watch `len()` if that matters to them.
#[derive(Clone, Debug, Default)]
pub struct SequenceCounts {
    map: HashMap<Vec<u8>, SeqEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DuplicationRow {
    pub occurrences: u64,
    pub distinct: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverrepRow {
    pub sequence: String,
    pub count: u64,
    pub percent: f64,
    pub source: String,
}

impl SequenceCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, seq: &[u8], ordinal: u64) {
        match self.map.get_mut(seq) {
            Some(e) => e.count += 1,
            None => {
                self.map.insert(
                    seq.to_vec(),
                    SeqEntry {
                        count: 1,
                        first_seen: ordinal,
                    },
                );
            }
        }
    }

    pub fn merge(&mut self, other: &SequenceCounts) {
        for (seq, e) in &other.map {
            match self.map.get_mut(seq) {
                Some(t) => {
                    t.count += e.count;
                    if e.first_seen < t.first_seen {
                        t.first_seen = e.first_seen;
                    }
                }
                None => {
                    self.map.insert(seq.clone(), e.clone());
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Occurrence count -> number of distinct sequences at that count,
    /// ascending by occurrence count.
    pub fn duplication_histogram(&self) -> Vec<DuplicationRow> {
        let mut by_level: HashMap<u64, u64> = HashMap::new();
        for e in self.map.values() {
            *by_level.entry(e.count).or_insert(0) += 1;
        }
        let mut rows: Vec<DuplicationRow> = by_level
            .into_iter()
            .map(|(occurrences, distinct)| DuplicationRow {
                occurrences,
                distinct,
            })
            .collect();
        rows.sort_unstable_by_key(|r| r.occurrences);
        rows
    }

    /// Sequences occurring in strictly more than 0.1% of reads, sorted by
    /// count descending with encounter order breaking ties, capped at the
    /// top 10. `first_seen` makes the comparator total, so an unstable sort
    /// is still deterministic.
    pub fn overrepresented(&self, total_reads: u64, library: &KnownSeqLibrary) -> Vec<OverrepRow> {
        if total_reads == 0 {
            return Vec::new();
        }
        let mut candidates: Vec<(&Vec<u8>, &SeqEntry)> = self
            .map
            .iter()
            .filter(|(_, e)| e.count * 1000 > total_reads)
            .collect();
        candidates.sort_unstable_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        candidates.truncate(TOP_OVERREP);
        candidates
            .into_iter()
            .map(|(seq, e)| {
                let source = library.classify(seq).to_string();
                let shown = &seq[..seq.len().min(REPORT_SEQ_LEN)];
                OverrepRow {
                    sequence: String::from_utf8_lossy(shown).into_owned(),
                    count: e.count,
                    percent: e.count as f64 * 100.0 / total_reads as f64,
                    source,
                }
            })
            .collect()
    }
}
