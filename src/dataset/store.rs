// src/dataset/store.rs

use csv::{ReaderBuilder, WriterBuilder};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::Dataset;
use crate::error::PersistError;
use crate::reading::PriceReading;

const BOM: &str = "\u{feff}";

/// The CSV file that holds the dataset between runs.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the table, or an empty one if the file does not exist yet.
    pub fn load(&self) -> Result<Dataset, PersistError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "dataset not found, starting empty");
                return Ok(Dataset::new());
            }
            Err(source) => {
                return Err(PersistError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let body = bytes.strip_prefix(BOM.as_bytes()).unwrap_or(&bytes);
        let parse_err = |source| PersistError::Parse {
            path: self.path.clone(),
            source,
        };

        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(body);
        let headers: Vec<String> = rdr
            .headers()
            .map_err(parse_err)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(parse_err)?;
            if record.len() > headers.len() {
                let line = record.position().map_or(0, |p| p.line());
                warn!(line, cells = record.len(), "row wider than header");
                return Err(PersistError::RowTooWide {
                    path: self.path.clone(),
                    line,
                    found: record.len(),
                    expected: headers.len(),
                });
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        let ds = Dataset::from_parts(headers, rows);
        info!(path = %self.path.display(), rows = ds.len(), "loaded existing dataset");
        Ok(ds)
    }

    /// Replace the file with `ds`.
    ///
    /// The table is written to a temporary file next to the target and renamed
    /// over it, so a failed write leaves the previous file untouched.
    pub fn save(&self, ds: &Dataset) -> Result<(), PersistError> {
        let write_err = |source| PersistError::Write {
            path: self.path.clone(),
            source,
        };
        let ser_err = |source| PersistError::Serialize {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(BOM.as_bytes()).map_err(write_err)?;
        {
            let mut wtr = WriterBuilder::new().from_writer(tmp.as_file_mut());
            if !ds.headers().is_empty() {
                wtr.write_record(ds.headers()).map_err(ser_err)?;
            }
            for row in ds.rows() {
                wtr.write_record(row).map_err(ser_err)?;
            }
            wtr.flush().map_err(write_err)?;
        }

        tmp.as_file().sync_all().map_err(write_err)?;
        self.match_permissions(tmp.path()).map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        debug!(path = %self.path.display(), rows = ds.len(), "dataset written");
        Ok(())
    }

    /// Temp files are created owner-only. Give the replacement the mode of the
    /// file it replaces, or a world-readable one for a new file.
    fn match_permissions(&self, tmp: &Path) -> io::Result<()> {
        match fs::metadata(&self.path) {
            Ok(meta) => fs::set_permissions(tmp, meta.permissions()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => set_default_mode(tmp),
            Err(e) => Err(e),
        }
    }

    /// Load, append `reading` as the newest row, save. Returns the new table.
    pub fn append(&self, reading: &PriceReading) -> Result<Dataset, PersistError> {
        let mut ds = self.load()?;
        ds.push(reading);
        self.save(&ds)?;
        info!(path = %self.path.display(), rows = ds.len(), "dataset updated");
        Ok(ds)
    }
}

#[cfg(unix)]
fn set_default_mode(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_mode(_path: &Path) -> io::Result<()> {
    Ok(())
}
