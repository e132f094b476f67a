//! Byte-offset addressed line reading.
//!
//! Data files are addressed by the byte offset of each record, so a lookup
//! seeks straight to the record and reads one line. The reader tracks its own
//! position so consecutive lookups seek by the delta only, which keeps a
//! sorted batch of offsets walking forward through a single stream.

use std::io::{self, BufRead, Read, Seek, SeekFrom};

use crate::error::{Error, Result};

const CHUNK: usize = 256;

/// Reads whole lines at arbitrary byte offsets of a seekable stream.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    position: u64,
    line: Vec<u8>,
}

impl<R: Read + Seek> LineReader<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let position = inner.stream_position()?;
        Ok(Self {
            inner,
            position,
            line: Vec::with_capacity(CHUNK),
        })
    }

    /// Byte offset the next sequential read starts from.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        if offset != self.position {
            let delta = offset as i64 - self.position as i64;
            self.inner.seek(SeekFrom::Current(delta))?;
            self.position = offset;
        }
        Ok(())
    }

    /// Line starting at `offset`, or `None` past the end of the stream.
    pub fn read_line_at(&mut self, offset: u64) -> Result<Option<String>> {
        self.seek_to(offset)?;
        self.next_line()
    }

    /// Line at `offset` that must hold a record.
    ///
    /// Missing, blank and sentinel lines (license headers, comments) fail
    /// with [`Error::InvalidOffset`].
    pub fn read_record_at(
        &mut self,
        offset: u64,
        is_sentinel: impl Fn(&str) -> bool,
    ) -> Result<String> {
        match self.read_line_at(offset)? {
            Some(line) if !line.trim().is_empty() && !is_sentinel(&line) => Ok(line),
            _ => Err(Error::InvalidOffset { offset }),
        }
    }

    /// Line starting at the current position.
    ///
    /// Reads in small chunks and seeks back over whatever was read past the
    /// newline, so the stream always rests on the start of the next line.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        self.line.clear();
        let mut chunk = [0u8; CHUNK];
        loop {
            let n = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if n == 0 {
                if self.line.is_empty() {
                    return Ok(None);
                }
                break;
            }
            match chunk[..n].iter().position(|&b| b == b'\n') {
                Some(i) => {
                    self.line.extend_from_slice(&chunk[..i]);
                    let over = n - (i + 1);
                    if over > 0 {
                        self.inner.seek(SeekFrom::Current(-(over as i64)))?;
                    }
                    self.position += (i + 1) as u64;
                    break;
                }
                None => {
                    self.line.extend_from_slice(&chunk[..n]);
                    self.position += n as u64;
                }
            }
        }
        Ok(Some(decode_line(&self.line)))
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Sequential lines of a buffered reader with 1-based line numbers.
///
/// Uses the same materialization as [`LineReader`]: trailing `\r` stripped,
/// invalid UTF-8 replaced.
pub struct Lines<B> {
    reader: B,
    buf: Vec<u8>,
    number: usize,
}

impl<B: BufRead> Lines<B> {
    pub fn new(reader: B) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            number: 0,
        }
    }
}

impl<B: BufRead> Iterator for Lines<B> {
    type Item = Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.number += 1;
                let bytes = self.buf.strip_suffix(b"\n").unwrap_or(&self.buf);
                Some(Ok((self.number, decode_line(bytes))))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn reader(text: &str) -> LineReader<Cursor<Vec<u8>>> {
        LineReader::new(Cursor::new(text.as_bytes().to_vec())).unwrap()
    }

    #[test]
    fn reads_at_offsets_in_any_order() {
        let mut r = reader("first\nsecond line\r\nthird");
        assert_eq!(r.read_line_at(6).unwrap().as_deref(), Some("second line"));
        assert_eq!(r.position(), 19);
        assert_eq!(r.read_line_at(0).unwrap().as_deref(), Some("first"));
        assert_eq!(r.next_line().unwrap().as_deref(), Some("second line"));
        assert_eq!(r.next_line().unwrap().as_deref(), Some("third"));
        assert_eq!(r.next_line().unwrap(), None);
    }

    #[test]
    fn stream_rests_after_newline() {
        let mut r = reader("ab\ncd\n");
        r.read_line_at(0).unwrap();
        let mut inner = r.into_inner();
        assert_eq!(inner.stream_position().unwrap(), 3);
        let mut rest = String::new();
        inner.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "cd\n");
    }

    #[test]
    fn long_lines_span_chunks() {
        let long = "x".repeat(CHUNK * 3 + 17);
        let text = format!("{long}\nshort\n");
        let mut r = reader(&text);
        assert_eq!(r.next_line().unwrap().unwrap().len(), long.len());
        assert_eq!(r.next_line().unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn record_reads_reject_blank_sentinel_and_past_end() {
        let mut r = reader("  1 license\n\n00000013 record\n");
        let header = |line: &str| line.starts_with("  ");
        assert!(matches!(
            r.read_record_at(0, header),
            Err(Error::InvalidOffset { offset: 0 })
        ));
        assert!(matches!(
            r.read_record_at(12, header),
            Err(Error::InvalidOffset { offset: 12 })
        ));
        assert_eq!(r.read_record_at(13, header).unwrap(), "00000013 record");
        assert!(matches!(
            r.read_record_at(500, header),
            Err(Error::InvalidOffset { offset: 500 })
        ));
    }

    #[test]
    fn sequential_lines_are_numbered() {
        let lines: Vec<_> = Lines::new(Cursor::new("a\r\n\nb"))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            lines,
            vec![(1, "a".to_string()), (2, String::new()), (3, "b".to_string())]
        );
    }
}
