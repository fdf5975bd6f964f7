use std::{fs, path::Path};

use crate::{NetErr, Result};

const LABELS_MAGIC: u32 = 0x0801;
const IMAGES_MAGIC: u32 = 0x0803;

/// The header of an IDX file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdxMetadata {
    pub magic: u32,
    /// The amount of records in the file.
    pub len: usize,
    /// `(rows, cols)` of every image, `None` for label files.
    pub dims: Option<(usize, usize)>,
}

impl IdxMetadata {
    /// Returns the amount of bytes of a single record.
    pub fn record_size(&self) -> usize {
        self.dims.map_or(1, |(rows, cols)| rows * cols)
    }
}

/// A single record of an IDX file.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Label(u8),
    Pixels(Vec<f64>),
}

/// A sequential reader over an IDX label or image file (the MNIST distribution format).
#[derive(Debug, Clone)]
pub struct IdxReader {
    metadata: IdxMetadata,
    data: Vec<u8>,
    header_len: usize,
    head: usize,
}

impl IdxReader {
    /// Reads a whole IDX file into memory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        Self::from_bytes(data).map_err(|e| match e {
            NetErr::Dataset(msg) => NetErr::Dataset(format!("{}: {msg}", path.display())),
            e => e,
        })
    }

    /// Parses an in-memory IDX file.
    ///
    /// # Returns
    /// The reader positioned at the first record, or an error if the header is malformed or
    /// the file is shorter than the header announces.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let word = |i: usize| -> Result<usize> {
            data.get(i * 4..i * 4 + 4)
                .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as usize)
                .ok_or_else(|| NetErr::Dataset("truncated header".into()))
        };

        let magic = word(0)? as u32;
        let len = word(1)?;
        let (dims, header_len) = match magic {
            LABELS_MAGIC => (None, 8),
            IMAGES_MAGIC => (Some((word(2)?, word(3)?)), 16),
            other => {
                return Err(NetErr::Dataset(format!(
                    "unknown magic number {other:#06x}"
                )))
            }
        };

        let metadata = IdxMetadata { magic, len, dims };
        let needed = len
            .saturating_mul(metadata.record_size())
            .saturating_add(header_len);
        if data.len() < needed {
            return Err(NetErr::Dataset(format!(
                "file has {} bytes but the header announces {needed}",
                data.len()
            )));
        }

        Ok(Self {
            metadata,
            data,
            header_len,
            head: 0,
        })
    }

    pub fn metadata(&self) -> IdxMetadata {
        self.metadata
    }

    /// Returns the index of the record `next` will yield.
    pub fn head_position(&self) -> usize {
        self.head
    }

    /// Moves the reader so `next` yields the record at `index`.
    pub fn set_head_position(&mut self, index: usize) -> Result<()> {
        if index > self.metadata.len {
            return Err(NetErr::Dataset(format!(
                "head position {index} is past the {} records",
                self.metadata.len
            )));
        }

        self.head = index;
        Ok(())
    }
}

impl Iterator for IdxReader {
    type Item = Record;

    /// Reads the record under the head and advances it. Returns `None` once exhausted.
    fn next(&mut self) -> Option<Record> {
        if self.head >= self.metadata.len {
            return None;
        }

        let size = self.metadata.record_size();
        let start = self.header_len + self.head * size;
        let bytes = &self.data[start..start + size];
        self.head += 1;

        let record = match self.metadata.dims {
            None => Record::Label(bytes[0]),
            Some(_) => Record::Pixels(bytes.iter().map(|&b| b as f64).collect()),
        };

        Some(record)
    }
}

#[cfg(test)]
pub(crate) fn encode(magic: u32, dims: &[u32], body: &[u8]) -> Vec<u8> {
    let mut out = magic.to_be_bytes().to_vec();
    for d in dims {
        out.extend(d.to_be_bytes());
    }
    out.extend(body);
    out
}
