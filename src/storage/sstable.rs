//! Sorted string table
//!
//! A segment is a single immutable file holding entries in strictly
//! ascending key order, fronted by a membership filter. A `Table` handle
//! owns only the file path and the filter — every search or scan opens the
//! file, reads what it needs, and closes it again, so handles are cheap and
//! never hold descriptors.

use std::cmp::Ordering;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use super::entry::{Entry, Value};
use super::filter::{Filter, FILTER_SIZE};
use crate::error::{BigsbyError, Result};

/// Magic bytes identifying a Bigsby segment file
const COOKIE: &[u8; 13] = b"BIGSBYSEGMENT";

/// Current segment format version. Version 1 framed tombstones as an
/// in-band sentinel value; version 2 tags every entry with a kind byte.
const FORMAT_VERSION: u16 = 2;

/// Header length: cookie + version + filter length + filter bytes.
/// Entries start immediately after.
const HEADER_SIZE: usize = COOKIE.len() + 2 + 4 + FILTER_SIZE;

/// Handle to one immutable on-disk segment
#[derive(Debug)]
pub struct Table {
    /// Path to the segment file
    path: PathBuf,
    /// Membership filter over the segment's key set
    filter: Filter,
    /// Offset where the entry stream begins
    data_start: usize,
}

impl Table {
    /// Write a new segment at `path` from entries the caller guarantees are
    /// sorted by key with no duplicates.
    pub fn create(path: &Path, entries: &[Entry]) -> Result<Table> {
        let mut filter = Filter::new();
        for entry in entries {
            filter.insert(&entry.key);
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(COOKIE)?;
        writer.write_all(&FORMAT_VERSION.to_be_bytes())?;
        writer.write_all(&(FILTER_SIZE as u32).to_be_bytes())?;
        writer.write_all(filter.as_bytes())?;

        for entry in entries {
            writer.write_all(&entry.encode())?;
        }

        writer.flush()?;
        writer.get_ref().sync_all()?;

        Ok(Table {
            path: path.to_path_buf(),
            filter,
            data_start: HEADER_SIZE,
        })
    }

    /// Open an existing segment, validating its header and loading the
    /// membership filter.
    pub fn load(path: &Path) -> Result<Table> {
        let mut file = File::open(path)?;

        let mut cookie = [0u8; COOKIE.len()];
        file.read_exact(&mut cookie)?;
        if &cookie != COOKIE {
            return Err(BigsbyError::BadSegment(format!(
                "cookie mismatch in {}",
                path.display()
            )));
        }

        let mut version = [0u8; 2];
        file.read_exact(&mut version)?;
        let version = u16::from_be_bytes(version);
        if version != FORMAT_VERSION {
            return Err(BigsbyError::BadSegment(format!(
                "unsupported segment version {version}"
            )));
        }

        let mut filter_len = [0u8; 4];
        file.read_exact(&mut filter_len)?;
        let filter_len = u32::from_be_bytes(filter_len) as usize;
        if filter_len != FILTER_SIZE {
            return Err(BigsbyError::BadSegment(format!(
                "unsupported filter length {filter_len}"
            )));
        }

        let mut filter_buf = [0u8; FILTER_SIZE];
        file.read_exact(&mut filter_buf)?;

        Ok(Table {
            path: path.to_path_buf(),
            filter: Filter::from_bytes(filter_buf),
            data_start: HEADER_SIZE,
        })
    }

    /// Path to the underlying segment file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a key. Returns the stored value — which may be a tombstone —
    /// or `None` if the key is not in this segment.
    ///
    /// A negative filter answer short-circuits before any file I/O; the
    /// filter's no-false-negative guarantee is what makes that safe.
    pub fn search(&self, key: &str) -> Result<Option<Value>> {
        if !self.filter.contains(key) {
            return Ok(None);
        }

        let data = fs::read(&self.path)?;
        let mut ptr = self.data_start;
        while ptr < data.len() {
            let (entry, consumed) = Entry::decode(&data[ptr..])?;
            if entry.key == key {
                return Ok(Some(entry.value));
            }
            ptr += consumed;
        }
        Ok(None)
    }

    /// Decode and return every entry in stored order
    pub fn read(&self) -> Result<Vec<Entry>> {
        let data = fs::read(&self.path)?;
        let mut entries = Vec::new();
        let mut ptr = self.data_start;
        while ptr < data.len() {
            let (entry, consumed) = Entry::decode(&data[ptr..])?;
            entries.push(entry);
            ptr += consumed;
        }
        Ok(entries)
    }

    /// Two-way sorted merge of two segments into a new segment at `path`,
    /// with `newer` taking precedence on key equality.
    ///
    /// When `last` is true the merged output will sit at the bottom of the
    /// tree with nothing older beneath it, so tombstones shadow nothing and
    /// are dropped entirely; otherwise they are preserved to keep shadowing
    /// older segments.
    pub fn merge(newer: &Table, older: &Table, path: &Path, last: bool) -> Result<Table> {
        let mut newer_iter = newer.read()?.into_iter().peekable();
        let mut older_iter = older.read()?.into_iter().peekable();
        let mut merged = Vec::new();

        while let (Some(new), Some(old)) = (newer_iter.peek(), older_iter.peek()) {
            match new.key.cmp(&old.key) {
                Ordering::Greater => merged.extend(older_iter.next()),
                Ordering::Less => merged.extend(newer_iter.next()),
                Ordering::Equal => {
                    // Latest wins: advance both, keep the newer entry.
                    older_iter.next();
                    merged.extend(newer_iter.next());
                }
            }
        }
        merged.extend(newer_iter);
        merged.extend(older_iter);

        if last {
            merged.retain(|entry| !entry.value.is_tombstone());
        }

        Table::create(path, &merged)
    }
}
