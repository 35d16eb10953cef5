use crate::core::library::{DETECTION_ADAPTERS, reverse_complement};
use aho_corasick::{AhoCorasick, AhoCorasickBuilder};

/// Marks per-position adapter evidence: for each detection adapter, the span
/// of its first occurrence and, independently, the span of its reverse
/// complement's first occurrence. Spans from different adapters or
/// orientations may overlap and each counts; this is a per-base "has any
/// adapter evidence" rate, not exclusive attribution.
#[derive(Clone, Debug)]
pub struct AdapterScanner {
    ac: AhoCorasick,
    span_lens: Vec<usize>,
}

impl AdapterScanner {
    pub fn new(adapters: &[&str]) -> Self {
        let mut patterns: Vec<Vec<u8>> = Vec::with_capacity(adapters.len() * 2);
        for a in adapters {
            let fwd = a.as_bytes().to_ascii_uppercase();
            let rc = reverse_complement(&fwd);
            patterns.push(fwd);
            patterns.push(rc);
        }
        let span_lens = patterns.iter().map(|p| p.len()).collect();
        let ac = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .build(&patterns)
            .expect("adapter automaton");
        Self { ac, span_lens }
    }

    /// Increment `counts` for every position covered by a matched span,
    /// clipped to the read's length. `counts` grows only as far as the
    /// furthest span end, never zero-filled beyond it.
    pub fn scan(&self, seq: &[u8], counts: &mut Vec<u64>) {
        if seq.is_empty() {
            return;
        }
        let mut first: Vec<Option<usize>> = vec![None; self.span_lens.len()];
        let mut remaining = self.span_lens.len();
        // Overlapping matches arrive in end-offset order, so the first hit
        // per pattern is its leftmost occurrence.
        for mat in self.ac.find_overlapping_iter(seq) {
            let idx = mat.pattern().as_usize();
            if first[idx].is_none() {
                first[idx] = Some(mat.start());
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
        }
        for (idx, start) in first.into_iter().enumerate() {
            let Some(start) = start else { continue };
            let end = (start + self.span_lens[idx]).min(seq.len());
            if counts.len() < end {
                counts.resize(end, 0);
            }
            for c in &mut counts[start..end] {
                *c += 1;
            }
        }
    }
}

impl Default for AdapterScanner {
    fn default() -> Self {
        Self::new(&DETECTION_ADAPTERS)
    }
}
