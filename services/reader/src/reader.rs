//! Streaming segment reader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use pitchcap_types::BinaryLogRecord;
use zerocopy::FromBytes;

use crate::error::ReadError;

/// Reads `(record, payload)` pairs out of one segment file in file order.
///
/// Also usable as an [`Iterator`]; iteration ends at clean end-of-file and
/// yields an `Err` item on truncation, after which it fuses.
pub struct LogFileReader {
    reader: BufReader<File>,
    file_size: u64,
    bytes_read: u64,
    failed: bool,
}

impl LogFileReader {
    pub fn open(path: &Path) -> Result<Self, ReadError> {
        let file = File::open(path).map_err(|source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let file_size = file.metadata()?.len();
        Ok(Self {
            reader: BufReader::new(file),
            file_size,
            bytes_read: 0,
            failed: false,
        })
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Scan progress in percent.
    pub fn progress(&self) -> f64 {
        if self.file_size > 0 {
            self.bytes_read as f64 / self.file_size as f64 * 100.0
        } else {
            100.0
        }
    }

    /// Next record, `Ok(None)` at clean end-of-file.
    ///
    /// A partial record header or a payload shorter than declared is
    /// [`ReadError::Truncated`]; the trailing fragment is never delivered.
    pub fn next_record(&mut self) -> Result<Option<(BinaryLogRecord, Vec<u8>)>, ReadError> {
        let mut header = [0u8; BinaryLogRecord::SIZE];
        let got = read_fully(&mut self.reader, &mut header)?;
        if got == 0 {
            return Ok(None);
        }
        if got < BinaryLogRecord::SIZE {
            return Err(ReadError::Truncated {
                offset: self.bytes_read,
                need: BinaryLogRecord::SIZE,
                got,
            });
        }
        let Some(record) = BinaryLogRecord::read_from(&header[..]) else {
            return Err(ReadError::Truncated {
                offset: self.bytes_read,
                need: BinaryLogRecord::SIZE,
                got,
            });
        };
        self.bytes_read += BinaryLogRecord::SIZE as u64;

        let payload_len = record.payload_length.get() as usize;
        let mut payload = vec![0u8; payload_len];
        if payload_len > 0 {
            let got = read_fully(&mut self.reader, &mut payload)?;
            if got < payload_len {
                return Err(ReadError::Truncated {
                    offset: self.bytes_read,
                    need: payload_len,
                    got,
                });
            }
            self.bytes_read += payload_len as u64;
        }

        Ok(Some((record, payload)))
    }
}

impl Iterator for LogFileReader {
    type Item = Result<(BinaryLogRecord, Vec<u8>), ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_record() {
            Ok(Some(pair)) => Some(Ok(pair)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Read until `buf` is full or end-of-file; returns bytes read.
fn read_fully(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
