//! Offset store — persists how far into the monitored file processing got.
//!
//! The state is a single JSON document (`{"last_offset": N}`). Saves go to a
//! sibling temp file which is then renamed over the target, so a crash leaves
//! either the previous or the new value on disk.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::StateError;

/// Byte position in the monitored file up to which processing is complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub last_offset: u64,
}

impl State {
    pub fn at(last_offset: u64) -> Self {
        Self { last_offset }
    }

    /// Restore the state at `path`. A missing file is a fresh start at
    /// offset 0; a file that exists but does not parse is [`StateError::Corrupt`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(StateError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_reader(BufReader::new(file)).map_err(|source| StateError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overwrite the state at `path` via write-to-temp-then-rename.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StateError> {
        let path = path.as_ref();
        let io_err = |source| StateError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let temp_path = path.with_extension(format!("tmp.{}", std::process::id()));
        let file = File::create(&temp_path).map_err(io_err)?;
        let written = self
            .write_to(file)
            .and_then(|()| fs::rename(&temp_path, path));
        if let Err(source) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(io_err(source));
        }
        Ok(())
    }

    fn write_to(&self, file: File) -> std::io::Result<()> {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        writer.get_ref().sync_all()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
