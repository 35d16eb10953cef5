use flate2::Compression;
use flate2::write::GzEncoder;
use readqc::core::engine::{self, RunConfig};
use readqc::core::library::KnownSeqLibrary;
use std::io::Write;
use std::path::Path;

const SAMPLE: &str = "\
@SIM:1:FCX:1:15:6329:1045 1:N:0:2
ACGTACGTAC
+
IIIIIIIIII
@SIM:1:FCX:1:15:6330:1046 1:N:0:2
ACGTACGTAC
+
5555555555
@bad_record
ACGT
+
III
@SIM:1:FCX:1:16:6331:1047 1:N:0:2
GGCCAATTGG
+
IIIII55555
";

fn write_plain(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("sample.fastq");
    std::fs::write(&path, SAMPLE).unwrap();
    path
}

fn run(input: std::path::PathBuf, threads: usize) -> engine::RunOutput {
    engine::run(RunConfig {
        input,
        sample_name: "sample".to_string(),
        threads,
        phred_offset: 33,
    })
    .unwrap()
}

#[test]
fn counts_reads_and_skips_malformed_records() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(write_plain(dir.path()), 1);

    assert_eq!(output.agg.total_reads, 3);
    assert_eq!(output.skipped_reads, 1);
    assert_eq!(output.agg.distinct_sequences(), 2);
    assert_eq!(output.ctx.file_name, "sample.fastq");
}

#[test]
fn gzip_input_is_detected_by_magic_bytes() {
    let dir = tempfile::tempdir().unwrap();
    // deliberately without a .gz extension
    let path = dir.path().join("sample.fastq");
    let file = std::fs::File::create(&path).unwrap();
    let mut enc = GzEncoder::new(file, Compression::default());
    enc.write_all(SAMPLE.as_bytes()).unwrap();
    enc.finish().unwrap();

    let output = run(path, 1);
    assert_eq!(output.agg.total_reads, 3);
    assert_eq!(output.skipped_reads, 1);
}

#[test]
fn sharded_run_matches_sequential_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_plain(dir.path());

    let sequential = run(path.clone(), 1);
    let sharded = run(path, 4);

    let lib = KnownSeqLibrary::default();
    assert_eq!(
        sequential.agg.finalize(&lib),
        sharded.agg.finalize(&lib)
    );
    assert_eq!(sequential.skipped_reads, sharded.skipped_reads);
}

#[test]
fn empty_file_yields_empty_metrics_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.fastq");
    std::fs::write(&path, "").unwrap();

    let output = run(path, 1);
    assert_eq!(output.agg.total_reads, 0);
    let metrics = output.agg.finalize(&KnownSeqLibrary::default());
    assert_eq!(metrics.basic.total_reads, 0);
    assert!(metrics.overrepresented.is_empty());
}

#[test]
fn report_writer_emits_summary_and_module_tables() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(write_plain(dir.path()), 1);
    let metrics = output.agg.finalize(&KnownSeqLibrary::default());

    let report_path = dir.path().join("sample_qc_report.txt");
    readqc::report::txt::write(&report_path, &output, &metrics).unwrap();

    let text = std::fs::read_to_string(&report_path).unwrap();
    assert!(text.contains("Total Sequences: 3"));
    assert!(text.contains("Skipped Reads: 1"));
    assert!(text.contains(">>Per tile sequence quality"));
    assert!(text.contains(">>END_MODULE"));
}
