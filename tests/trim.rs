use readqc::core::fastq::OwnedRead;
use readqc::core::trim::{TrimConfig, keeps, trim};

fn read(id: &str, len: usize, quals: &[u8]) -> OwnedRead {
    assert_eq!(len, quals.len());
    OwnedRead {
        id: id.to_string(),
        desc: None,
        seq: vec![b'A'; len],
        qual: quals.to_vec(),
    }
}

#[test]
fn one_low_quality_position_drops_the_whole_read() {
    let cfg = TrimConfig::default();
    let mut quals = vec![25u8; 40];
    quals[2] = 18;
    assert!(!keeps(&read("r", 40, &quals), cfg));
}

#[test]
fn short_reads_are_dropped_regardless_of_quality() {
    let cfg = TrimConfig::default();
    assert!(!keeps(&read("r", 30, &[40; 30]), cfg));
}

#[test]
fn thresholds_are_inclusive() {
    let cfg = TrimConfig::default();
    // exactly min_length and exactly quality_threshold survive
    assert!(keeps(&read("r", 36, &[20; 36]), cfg));
    assert!(!keeps(&read("r", 36, &[19; 36]), cfg));
    assert!(!keeps(&read("r", 35, &[20; 35]), cfg));
}

#[test]
fn minimum_quality_decides_even_when_mean_is_high() {
    let cfg = TrimConfig {
        min_length: 4,
        quality_threshold: 20,
    };
    assert!(!keeps(&read("r", 4, &[25, 25, 18, 25]), cfg));
}

#[test]
fn filter_preserves_order_and_drops_silently() {
    let cfg = TrimConfig::default();
    let reads = vec![
        read("keep1", 40, &[30; 40]),
        read("drop_short", 10, &[30; 10]),
        read("keep2", 36, &[20; 36]),
        read("drop_qual", 40, &[19; 40]),
    ];
    let kept: Vec<String> = trim(reads.into_iter(), cfg).map(|r| r.id).collect();
    assert_eq!(kept, vec!["keep1", "keep2"]);
}

#[test]
fn empty_input_yields_empty_output() {
    let cfg = TrimConfig::default();
    let kept: Vec<OwnedRead> = trim(std::iter::empty(), cfg).collect();
    assert!(kept.is_empty());
}
