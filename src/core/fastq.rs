use crate::core::io::open_input;
use crate::core::model::MAX_Q;
use crate::error::{FastqError, FormatError, IoContext};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// One sequenced fragment with already-decoded Phred scores.
#[derive(Clone, Debug)]
pub struct OwnedRead {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl OwnedRead {
    /// Token at index 4 of the colon-split identifier, when present. Opaque
    /// grouping key for the originating imaging region; identifiers of any
    /// other shape simply contribute no tile data.
    pub fn tile_key(&self) -> Option<&str> {
        self.id.split(':').nth(4)
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// Streaming FASTQ reader (plain and .gz), record by record. Single pass,
/// not restartable; callers needing multiple passes re-open the source.
pub struct FastqReader {
    rdr: Box<dyn BufRead + Send>,
    phred_offset: u8,
    line_num: u64,
    byte_pos: u64,
    // Pre-read header kept across a resync after a malformed record.
    pending_header: Option<String>,
}

impl FastqReader {
    pub fn from_path(path: &Path, phred_offset: u8) -> Result<Self, FastqError> {
        let rdr = open_input(path).map_err(|e| {
            FastqError::io_err(
                e,
                IoContext {
                    byte_pos: 0,
                    line_num: 0,
                },
            )
        })?;
        Ok(Self {
            rdr,
            phred_offset,
            line_num: 0,
            byte_pos: 0,
            pending_header: None,
        })
    }

    pub fn from_bufread<R: BufRead + Send + 'static>(reader: R, phred_offset: u8) -> Self {
        Self {
            rdr: Box::new(reader),
            phred_offset,
            line_num: 0,
            byte_pos: 0,
            pending_header: None,
        }
    }

    /// Skip forward to the next line starting with '@' after a malformed
    /// record. Returns false at EOF.
    pub fn resync_to_next_header(&mut self) -> bool {
        let mut line = String::new();
        loop {
            match self.read_line(&mut line) {
                Ok(0) | Err(_) => return false,
                Ok(_) => {
                    if line.starts_with('@') {
                        self.pending_header = Some(std::mem::take(&mut line));
                        return true;
                    }
                }
            }
        }
    }

    fn ctx(&self) -> IoContext {
        IoContext {
            byte_pos: self.byte_pos,
            line_num: self.line_num,
        }
    }

    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf)?;
        if n > 0 {
            self.line_num += 1;
            self.byte_pos += n as u64;
            if buf.ends_with('\n') {
                buf.pop();
            }
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(n)
    }

    fn read_one(&mut self) -> Result<Option<OwnedRead>, FastqError> {
        let mut header = match self.pending_header.take() {
            Some(h) => h,
            None => {
                let mut h = String::with_capacity(128);
                loop {
                    let n = self
                        .read_line(&mut h)
                        .map_err(|e| FastqError::io_err(e, self.ctx()))?;
                    if n == 0 {
                        return Ok(None);
                    }
                    if !h.is_empty() {
                        break;
                    }
                }
                h
            }
        };
        if !header.starts_with('@') {
            return Err(FastqError::fmt_err(FormatError::MissingHeader, self.ctx()));
        }
        header.remove(0);
        let (id, desc) = split_header(&header);

        let mut seq = String::new();
        let n = self
            .read_line(&mut seq)
            .map_err(|e| FastqError::io_err(e, self.ctx()))?;
        if n == 0 {
            return Err(FastqError::fmt_err(FormatError::UnexpectedEof, self.ctx()));
        }

        let mut plus = String::new();
        let n = self
            .read_line(&mut plus)
            .map_err(|e| FastqError::io_err(e, self.ctx()))?;
        if n == 0 {
            return Err(FastqError::fmt_err(FormatError::UnexpectedEof, self.ctx()));
        }
        if !plus.starts_with('+') {
            return Err(FastqError::fmt_err(FormatError::MissingPlus, self.ctx()));
        }

        let mut qual = String::new();
        let n = self
            .read_line(&mut qual)
            .map_err(|e| FastqError::io_err(e, self.ctx()))?;
        if n == 0 {
            return Err(FastqError::fmt_err(FormatError::UnexpectedEof, self.ctx()));
        }

        if seq.is_empty() {
            return Err(FastqError::fmt_err(FormatError::EmptySequence, self.ctx()));
        }
        if seq.len() != qual.len() {
            return Err(FastqError::fmt_err(
                FormatError::LengthMismatch {
                    seq: seq.len(),
                    qual: qual.len(),
                },
                self.ctx(),
            ));
        }

        let offset = self.phred_offset;
        let scores = qual.bytes().map(|b| decode_score(b, offset)).collect();
        Ok(Some(OwnedRead {
            id,
            desc,
            seq: seq.into_bytes(),
            qual: scores,
        }))
    }
}

impl Iterator for FastqReader {
    type Item = Result<OwnedRead, FastqError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_one().transpose()
    }
}

pub fn write_record<W: Write>(w: &mut W, read: &OwnedRead, phred_offset: u8) -> io::Result<()> {
    match &read.desc {
        Some(desc) => writeln!(w, "@{} {}", read.id, desc)?,
        None => writeln!(w, "@{}", read.id)?,
    }
    w.write_all(&read.seq)?;
    w.write_all(b"\n+\n")?;
    let encoded: Vec<u8> = read.qual.iter().map(|&q| q + phred_offset).collect();
    w.write_all(&encoded)?;
    w.write_all(b"\n")
}

fn split_header(h: &str) -> (String, Option<String>) {
    match h.split_once(|c: char| c.is_whitespace()) {
        Some((id, desc)) if !desc.is_empty() => (id.to_string(), Some(desc.to_string())),
        Some((id, _)) => (id.to_string(), None),
        None => (h.to_string(), None),
    }
}

fn decode_score(b: u8, offset: u8) -> u8 {
    b.saturating_sub(offset).min(MAX_Q as u8)
}
