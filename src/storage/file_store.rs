//! File Store
//!
//! Reads and writes the line-pair store file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::SyncStrategy;
use crate::error::{FlatKvError, Result};
use crate::format::{write_record, Entry, Record};

/// Outcome of a successful save
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveStats {
    /// Records written
    pub entries: usize,

    /// Bytes written, line terminators included
    pub bytes: u64,
}

/// Owns the store file path and performs whole-file load/save
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Store file
    path: PathBuf,

    /// Whether to fsync before replacing the file
    sync_strategy: SyncStrategy,
}

impl FileStore {
    /// Suffix appended to the store file name while a save is in flight
    const TEMP_SUFFIX: &'static str = ".tmp";

    /// Create a file store over `path`; nothing is touched until load/save
    pub fn new(path: impl Into<PathBuf>, sync_strategy: SyncStrategy) -> Self {
        Self {
            path: path.into(),
            sync_strategy,
        }
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the store file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Read every entry in file order
    ///
    /// A missing file yields an empty list. An odd number of lines, a
    /// final line without a terminator, non-UTF-8 content or a bad escape
    /// fails the whole load with `FlatKvError::CorruptFile`.
    pub fn load(&self) -> Result<Vec<Entry>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No store file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut line_no = 0usize;
        let mut entries = Vec::new();

        while let Some(key_line) = self.read_line(&mut reader, &mut buf, &mut line_no)? {
            let key_line_no = line_no;
            let value_line = self
                .read_line(&mut reader, &mut buf, &mut line_no)?
                .ok_or_else(|| {
                    self.corrupt(key_line_no, "odd number of lines: key has no value line")
                })?;

            let entry = Record::from_lines(key_line, value_line)
                .decode()
                .map_err(|e| self.corrupt(key_line_no + e.field.line_offset(), e.to_string()))?;
            entries.push(entry);
        }

        tracing::trace!(
            "Loaded {} entries ({} lines) from {}",
            entries.len(),
            line_no,
            self.path.display()
        );

        Ok(entries)
    }

    /// Read one `\n`-terminated line without its terminator
    ///
    /// Only `\n` ends a line; a `\r` before it is part of the data.
    fn read_line<R: BufRead>(
        &self,
        reader: &mut R,
        buf: &mut Vec<u8>,
        line_no: &mut usize,
    ) -> Result<Option<String>> {
        buf.clear();
        if reader.read_until(b'\n', buf)? == 0 {
            return Ok(None);
        }
        *line_no += 1;

        if buf.pop() != Some(b'\n') {
            return Err(self.corrupt(*line_no, "last line has no terminator"));
        }

        String::from_utf8(std::mem::take(buf))
            .map(Some)
            .map_err(|_| self.corrupt(*line_no, "line is not valid UTF-8"))
    }

    fn corrupt(&self, line: usize, reason: impl Into<String>) -> FlatKvError {
        FlatKvError::CorruptFile {
            path: self.path.clone(),
            line,
            reason: reason.into(),
        }
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Replace the store file with `entries`, in order
    ///
    /// Records are written to a sibling temp file which is then renamed
    /// over the store file. On failure the temp file is removed and the
    /// previous store file is left as it was.
    pub fn save<'a, I>(&self, entries: I) -> Result<SaveStats>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let temp_path = self.temp_path();

        match self.write_temp(&temp_path, entries) {
            Ok(stats) => {
                if let Err(e) = fs::rename(&temp_path, &self.path) {
                    let _ = fs::remove_file(&temp_path);
                    return Err(e.into());
                }
                Ok(stats)
            }
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                Err(e)
            }
        }
    }

    /// Write every record to `temp_path` and flush it
    fn write_temp<'a, I>(&self, temp_path: &Path, entries: I) -> Result<SaveStats>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(temp_path)?;

        let mut writer = BufWriter::new(file);
        let mut stats = SaveStats::default();

        for entry in entries {
            stats.bytes += write_record(&mut writer, &entry.key, &entry.value)? as u64;
            stats.entries += 1;
        }

        writer.flush()?;
        let file = writer
            .into_inner()
            .map_err(|e| FlatKvError::Io(e.into_error()))?;

        if self.sync_strategy == SyncStrategy::EveryWrite {
            file.sync_all()?;
        }

        Ok(stats)
    }

    /// `{store file}.tmp` in the same directory, so the rename stays on
    /// one filesystem
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(Self::TEMP_SUFFIX);
        self.path.with_file_name(name)
    }
}
