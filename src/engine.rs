//! Engine Module
//!
//! The LSM tree core that coordinates all components.
//!
//! ## Responsibilities
//! - Buffer writes in the memtable and track its byte size
//! - Flush the memtable into new level-0 segments past the size threshold
//! - Discover persisted segments on startup, newest first within each level
//! - Serve reads from the memtable and all segments with latest-wins
//!   shadowing
//! - Merge over-full levels downward, dropping tombstones where safe

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use rand::Rng;

use crate::config::Config;
use crate::error::Result;
use crate::memtable::Tree;
use crate::storage::{Entry, Table, Value};

/// The in-memory write buffer: an ordered map from key to value
type Memtable = Tree<String, Value>;

/// Alphabet for random segment file names
const SEGMENT_NAME_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of a random segment file name, without the suffix
const SEGMENT_NAME_LEN: usize = 16;

/// Suffix of every segment file
const SEGMENT_SUFFIX: &str = ".segment";

/// The main storage engine: a memtable in front of leveled, immutable
/// on-disk segments.
///
/// Single-owner and single-threaded: every operation is blocking and
/// mutates through `&mut self`. For any key, the most recently written
/// value wins; resolution order is memtable, then level 0 newest to
/// oldest, then deeper levels the same way. A tombstone seen first means
/// the key is absent, no matter what older segments hold.
pub struct Engine {
    config: Config,
    memtable: Memtable,
    /// Sum of key + value lengths over live memtable entries
    memtable_size: usize,
    /// levels[L] holds level L's segments, newest first
    levels: Vec<Vec<Table>>,
}

impl Engine {
    /// Open a store over `config.data_dir`, discovering previously flushed
    /// segments.
    ///
    /// Level directories are visited in ascending order; the first missing
    /// one terminates discovery. Within a level, segments are ordered by
    /// file modification time, newest first, so `levels[L][0]` is always
    /// the freshest segment of level L.
    pub fn open(config: Config) -> Result<Engine> {
        let segment_dir = segment_directory(&config.data_dir);
        fs::create_dir_all(&segment_dir)?;

        let mut levels = Vec::new();
        for level in 0.. {
            let level_dir = segment_dir.join(level.to_string());
            let dir = match fs::read_dir(&level_dir) {
                Ok(dir) => dir,
                Err(err) if err.kind() == io::ErrorKind::NotFound => break,
                Err(err) => return Err(err.into()),
            };

            let mut files: Vec<(PathBuf, SystemTime)> = Vec::new();
            for dirent in dir {
                let dirent = dirent?;
                let path = dirent.path();
                if !dirent.file_type()?.is_file() {
                    continue;
                }
                let is_segment = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(SEGMENT_SUFFIX));
                if !is_segment {
                    continue;
                }
                files.push((path, dirent.metadata()?.modified()?));
            }
            files.sort_by(|a, b| b.1.cmp(&a.1));

            let mut segments = Vec::with_capacity(files.len());
            for (path, _) in files {
                segments.push(Table::load(&path)?);
            }
            tracing::debug!(level, segments = segments.len(), "loaded level");
            levels.push(segments);
        }

        Ok(Engine {
            config,
            memtable: Memtable::new(),
            memtable_size: 0,
            levels,
        })
    }

    /// Insert a key-value pair, overwriting any previous value. May trigger
    /// a flush when the memtable outgrows the configured limit.
    pub fn insert(&mut self, key: String, value: String) -> Result<()> {
        self.write(key, Value::Data(value))
    }

    /// Delete a key. Deletion is a write of a tombstone that shadows every
    /// older value for the key until compaction retires it.
    pub fn remove(&mut self, key: String) -> Result<()> {
        self.write(key, Value::Tombstone)
    }

    fn write(&mut self, key: String, value: Value) -> Result<()> {
        let key_len = key.len();
        let added = key_len + value.len();

        match self.memtable.insert(key, value) {
            Some(displaced) => {
                self.memtable_size -= key_len + displaced.len();
                self.memtable_size += added;
            }
            None => self.memtable_size += added,
        }

        if self.memtable_size > self.config.compaction_limit {
            self.flush()?;
        }
        Ok(())
    }

    /// Look up a key, resolving through the memtable and then every segment
    /// newest-first. Returns `None` for keys never written or deleted.
    pub fn search(&self, key: &str) -> Result<Option<String>> {
        if let Some(value) = self.memtable.search(key) {
            return Ok(match value {
                Value::Data(data) => Some(data.clone()),
                Value::Tombstone => None,
            });
        }
        self.search_segments(key)
    }

    /// Walk levels top-down, newest segment first within each level. The
    /// first entry found for the key decides: a tombstone means the key is
    /// deleted and nothing older may resurrect it.
    fn search_segments(&self, key: &str) -> Result<Option<String>> {
        for level in &self.levels {
            for segment in level {
                match segment.search(key)? {
                    Some(Value::Data(data)) => return Ok(Some(data)),
                    Some(Value::Tombstone) => return Ok(None),
                    None => continue,
                }
            }
        }
        Ok(None)
    }

    /// Drain the memtable into a fresh level-0 segment.
    ///
    /// The memtable is reset only after the segment is durably written; on
    /// any failure it is left intact. Flushing an empty memtable is a
    /// no-op.
    pub fn flush(&mut self) -> Result<()> {
        if self.memtable.is_empty() {
            return Ok(());
        }

        let entries: Vec<Entry> = self
            .memtable
            .iter()
            .map(|(key, value)| Entry::new(key.clone(), value.clone()))
            .collect();

        let path = self.new_segment_path(0)?;
        let segment = Table::create(&path, &entries)?;
        tracing::debug!(path = %path.display(), entries = entries.len(), "flushed memtable");

        if self.levels.is_empty() {
            self.levels.push(Vec::new());
        }
        self.levels[0].insert(0, segment);

        self.memtable = Memtable::new();
        self.memtable_size = 0;

        self.compact()
    }

    /// Merge over-full levels downward: while a level holds more segments
    /// than the configured maximum, its two oldest are merged into a
    /// segment that becomes the newest of the level below, and the inputs
    /// are deleted.
    ///
    /// Compaction always takes the oldest segments of a level, so every
    /// segment remaining above is newer than everything below — prepending
    /// the output keeps each level newest-first.
    fn compact(&mut self) -> Result<()> {
        let max = self.config.level_max_segments.max(1);
        let mut level = 0;
        while level < self.levels.len() {
            if self.levels[level].len() <= max {
                level += 1;
                continue;
            }

            // With nothing below the output, dropped tombstones cannot
            // resurrect older values.
            let last = self.levels.get(level + 1).map_or(true, |l| l.is_empty())
                && self.levels.iter().skip(level + 2).all(|l| l.is_empty());

            let path = self.new_segment_path(level + 1)?;
            let count = self.levels[level].len();
            let newer = &self.levels[level][count - 2];
            let older = &self.levels[level][count - 1];
            let merged = Table::merge(newer, older, &path, last)?;
            tracing::debug!(
                from = level,
                to = level + 1,
                path = %path.display(),
                "compacted two segments"
            );

            for table in [self.levels[level].pop(), self.levels[level].pop()]
                .into_iter()
                .flatten()
            {
                fs::remove_file(table.path())?;
            }

            if self.levels.len() <= level + 1 {
                self.levels.push(Vec::new());
            }
            self.levels[level + 1].insert(0, merged);
        }
        Ok(())
    }

    /// Current memtable size in bytes
    pub fn memtable_size(&self) -> usize {
        self.memtable_size
    }

    /// Number of live entries in the memtable
    pub fn memtable_len(&self) -> usize {
        self.memtable.len()
    }

    /// The persisted levels; `levels()[L][0]` is level L's newest segment
    pub fn levels(&self) -> &[Vec<Table>] {
        &self.levels
    }

    /// Dump the memtable's size, height, and shape for debugging
    pub fn print_memtable<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Size: {}", self.memtable_size)?;
        writeln!(out, "Height: {}", self.memtable.height())?;
        writeln!(out, "Tree:")?;
        writeln!(out)?;
        self.memtable.print(out)?;
        writeln!(out)?;
        Ok(())
    }

    /// Dump every level's segments and their entries for debugging
    pub fn print_segments<W: Write>(&self, out: &mut W) -> Result<()> {
        for (level, segments) in self.levels.iter().enumerate() {
            writeln!(out, "Level {level}:")?;
            for segment in segments {
                writeln!(out, "Segment path: {}", segment.path().display())?;
                writeln!(out, "Table:")?;
                writeln!(out)?;
                for entry in segment.read()? {
                    writeln!(out, "{entry}")?;
                }
                writeln!(out)?;
            }
        }
        Ok(())
    }

    /// Generate a fresh, collision-checked path for a new segment in
    /// `level`, creating the level directory if needed.
    fn new_segment_path(&self, level: usize) -> Result<PathBuf> {
        let level_dir = segment_directory(&self.config.data_dir).join(level.to_string());
        fs::create_dir_all(&level_dir)?;

        let mut rng = rand::thread_rng();
        loop {
            let name: String = (0..SEGMENT_NAME_LEN)
                .map(|_| SEGMENT_NAME_LETTERS[rng.gen_range(0..SEGMENT_NAME_LETTERS.len())] as char)
                .collect();
            let path = level_dir.join(format!("{name}{SEGMENT_SUFFIX}"));
            if !path.exists() {
                return Ok(path);
            }
        }
    }
}

fn segment_directory(data_dir: &Path) -> PathBuf {
    data_dir.join("segments")
}
