use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

const READ_BUF: usize = 256 * 1024;

/// Open a FASTQ input as a buffered reader, transparently decoding gzip.
/// Detection is by magic bytes, not extension.
pub fn open_input(path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 2];
    let n = file.read(&mut magic)?;
    file.seek(SeekFrom::Start(0))?;
    let is_gzip = n == 2 && magic == [0x1f, 0x8b];
    let rdr: Box<dyn BufRead + Send> = if is_gzip {
        Box::new(BufReader::with_capacity(
            READ_BUF,
            MultiGzDecoder::new(file),
        ))
    } else {
        Box::new(BufReader::with_capacity(READ_BUF, file))
    };
    Ok(rdr)
}
