//! Entry codec
//!
//! Length-prefixed binary framing for a single key-value entry. Deletions
//! are first-class: an entry carries a one-byte kind tag, and a tombstone
//! entry has no value bytes at all, so no user value can alias a deletion.

use std::fmt;

use crate::error::{BigsbyError, Result};

/// Kind tag for an entry holding a live value
const KIND_DATA: u8 = 0;

/// Kind tag for a deletion marker
const KIND_TOMBSTONE: u8 = 1;

/// A stored value: live data or a deletion marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A live user value
    Data(String),

    /// A tombstone (deleted key)
    Tombstone,
}

impl Value {
    /// Byte length contributed by the value (a tombstone contributes none)
    pub fn len(&self) -> usize {
        match self {
            Value::Data(data) => data.len(),
            Value::Tombstone => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Value::Tombstone)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Data(data) => write!(f, "{data}"),
            Value::Tombstone => write!(f, "<tombstone>"),
        }
    }
}

/// A single key-value entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: Value,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Entry {
            key: key.into(),
            value,
        }
    }

    /// Encode the entry into its on-disk framing:
    /// `keyLen (u32 BE) | key | kind (u8) | [valLen (u32 BE) | value]`
    /// where the value length and bytes are present only for live data.
    pub fn encode(&self) -> Vec<u8> {
        let key = self.key.as_bytes();
        let mut buf = Vec::with_capacity(4 + key.len() + 1 + 4 + self.value.len());

        buf.extend_from_slice(&(key.len() as u32).to_be_bytes());
        buf.extend_from_slice(key);
        match &self.value {
            Value::Data(data) => {
                buf.push(KIND_DATA);
                buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
                buf.extend_from_slice(data.as_bytes());
            }
            Value::Tombstone => buf.push(KIND_TOMBSTONE),
        }

        buf
    }

    /// Decode one entry from the front of `buf`, returning it together with
    /// the number of bytes consumed.
    pub fn decode(buf: &[u8]) -> Result<(Entry, usize)> {
        let mut needed = 4;
        ensure(buf, needed)?;
        let key_len = u32::from_be_bytes(buf[0..4].try_into().unwrap()) as usize;

        needed += key_len + 1;
        ensure(buf, needed)?;
        let key = decode_utf8(&buf[4..4 + key_len], "key")?;
        let kind = buf[4 + key_len];

        match kind {
            KIND_TOMBSTONE => Ok((Entry::new(key, Value::Tombstone), needed)),
            KIND_DATA => {
                let len_at = needed;
                needed += 4;
                ensure(buf, needed)?;
                let val_len =
                    u32::from_be_bytes(buf[len_at..len_at + 4].try_into().unwrap()) as usize;

                needed += val_len;
                ensure(buf, needed)?;
                let value = decode_utf8(&buf[len_at + 4..len_at + 4 + val_len], "value")?;

                Ok((Entry::new(key, Value::Data(value)), needed))
            }
            other => Err(BigsbyError::Decode(format!("unknown entry kind {other}"))),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.key, self.value)
    }
}

fn ensure(buf: &[u8], needed: usize) -> Result<()> {
    if buf.len() < needed {
        return Err(BigsbyError::ShortRead {
            needed,
            had: buf.len(),
        });
    }
    Ok(())
}

fn decode_utf8(bytes: &[u8], what: &str) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| BigsbyError::Decode(format!("{what} is not valid UTF-8")))
}
