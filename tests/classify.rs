use readqc::core::library::{KnownSeqEntry, KnownSeqLibrary, UNKNOWN_SOURCE, reverse_complement};

#[test]
fn forward_substring_matches() {
    let lib = KnownSeqLibrary::new(vec![KnownSeqEntry::new("Marker", "ACGTAC")]);
    assert_eq!(lib.classify(b"TTTACGTACTTT"), "Marker");
}

#[test]
fn reverse_complement_substring_matches() {
    // AACG reverse-complements to CGTT; the candidate contains only CGTT
    let lib = KnownSeqLibrary::new(vec![KnownSeqEntry::new("Marker", "AACG")]);
    assert_eq!(lib.classify(b"TTTCGTTTTT"), "Marker");
    assert_eq!(lib.classify(b"TTTTTTTTTT"), UNKNOWN_SOURCE);
}

#[test]
fn first_matching_entry_wins_in_library_order() {
    let lib = KnownSeqLibrary::new(vec![
        KnownSeqEntry::new("First", "ACGT"),
        KnownSeqEntry::new("Second", "ACGTACGT"),
    ]);
    // both entries occur; library order decides
    assert_eq!(lib.classify(b"GGACGTACGTGG"), "First");
}

#[test]
fn no_match_yields_unknown_label() {
    let lib = KnownSeqLibrary::default();
    assert_eq!(lib.classify(b"TATATATATATATA"), UNKNOWN_SOURCE);
}

#[test]
fn classification_is_deterministic_across_calls() {
    let lib = KnownSeqLibrary::default();
    let candidate = b"AGATCGGAAGAGCACACGTCTGAACTCCAGTCACGGGG";
    let first = lib.classify(candidate).to_string();
    for _ in 0..5 {
        assert_eq!(lib.classify(candidate), first);
    }
    assert_eq!(first, "TruSeq Adapter, Index 7");
}

#[test]
fn default_library_detects_canonical_adapters() {
    let lib = KnownSeqLibrary::default();
    // Nextera transposase sequence embedded in a longer read
    assert_eq!(
        lib.classify(b"AAAACTGTCTCTTATACACATCTAAAA"),
        "Nextera Transposase Adapter"
    );
    // and via reverse complement
    let rc = reverse_complement(b"CTGTCTCTTATACACATCT");
    let mut candidate = b"AAAA".to_vec();
    candidate.extend_from_slice(&rc);
    assert_eq!(lib.classify(&candidate), "Nextera Transposase Adapter");
}
