use memchr::memmem;

pub const UNKNOWN_SOURCE: &str = "Unknown Overrepresented Sequence";

/// Adapters scanned for positional contamination marking. Distinct from the
/// known-sequence library below, which classifies overrepresented sequences.
pub const DETECTION_ADAPTERS: [&str; 2] = [
    "AGATCGGAAGAGCACACGTCTGAACTCCAGTCA",  // TruSeq Universal Adapter
    "AGATCGGAAGAGCGTCGTGTAGGGAAAGAGTGT", // TruSeq Adapter Index 1
];

const KNOWN_SEQUENCES: [(&str, &str); 12] = [
    ("TruSeq Adapter, Index 7", "AGATCGGAAGAGCACACGTCTGAACTCCAGTCAC"),
    ("TruSeq Universal Adapter", "AGATCGGAAGAGCGTCGTGTAGGGAAAGAGTGTA"),
    ("TruSeq Read 1 Adapter", "AGATCGGAAGAGCGGTTCAGCAGGAATGCCGAG"),
    ("TruSeq Read 2 Adapter", "AGATCGGAAGAGCGTCGTGTAGGGAAAGAGTGT"),
    ("Illumina Multiplexing PCR Primer 1.0", "AATGATACGGCGACCACCGAGATCTACAC"),
    ("Illumina Multiplexing PCR Primer 2.0", "CAAGCAGAAGACGGCATACGAGAT"),
    ("Nextera Transposase Adapter", "CTGTCTCTTATACACATCT"),
    ("Nextera Read 1 Adapter", "TCGTCGGCAGCGTCAGATGTGTATAAGAGACAG"),
    ("Nextera Read 2 Adapter", "GTCTCGTGGGCTCGGAGATGTGTATAAGAGACAG"),
    ("PhiX Control Library", "GTTTTCCCAGTCACGACGTTG"),
    ("Small RNA Adapter (Read 1)", "TGGAATTCTCGGGTGCCAAGG"),
    (
        "Small RNA Adapter (Read 2)",
        "CTGTAGGCACCATCAATAGATCGGAAGAGCACACGTCT",
    ),
];

#[derive(Clone, Debug)]
pub struct KnownSeqEntry {
    pub name: String,
    pub sequence: Vec<u8>,
}

impl KnownSeqEntry {
    pub fn new(name: &str, sequence: &str) -> Self {
        Self {
            name: name.to_string(),
            sequence: sequence.as_bytes().to_vec(),
        }
    }
}

/// Named reference sequences (adapters, primers, contaminants). Iteration
/// order is part of the classification contract: the first entry whose
/// sequence (or its reverse complement) occurs as a substring wins.
#[derive(Clone, Debug)]
pub struct KnownSeqLibrary {
    entries: Vec<KnownSeqEntry>,
}

impl KnownSeqLibrary {
    pub fn new(entries: Vec<KnownSeqEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[KnownSeqEntry] {
        &self.entries
    }

    pub fn classify(&self, seq: &[u8]) -> &str {
        for entry in &self.entries {
            if memmem::find(seq, &entry.sequence).is_some() {
                return &entry.name;
            }
            let rc = reverse_complement(&entry.sequence);
            if memmem::find(seq, &rc).is_some() {
                return &entry.name;
            }
        }
        UNKNOWN_SOURCE
    }
}

impl Default for KnownSeqLibrary {
    fn default() -> Self {
        Self::new(
            KNOWN_SEQUENCES
                .iter()
                .map(|&(name, seq)| KnownSeqEntry::new(name, seq))
                .collect(),
        )
    }
}

pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

fn complement(b: u8) -> u8 {
    match b {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'a' => b't',
        b't' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        // N (and anything else) has no defined complement; identity.
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_complement_basics() {
        assert_eq!(reverse_complement(b"AACG"), b"CGTT");
        assert_eq!(reverse_complement(b"ACGT"), b"ACGT");
        assert_eq!(reverse_complement(b"AN"), b"NT");
    }

    #[test]
    fn default_library_is_complete_and_ordered() {
        let lib = KnownSeqLibrary::default();
        assert_eq!(lib.entries().len(), 12);
        assert_eq!(lib.entries()[0].name, "TruSeq Adapter, Index 7");
        assert_eq!(lib.entries()[11].name, "Small RNA Adapter (Read 2)");
    }
}
