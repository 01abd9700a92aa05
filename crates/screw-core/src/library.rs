//! Track library - loaded sources and their tempo
//!
//! Keeps the BPM for every track the performer has added, so reloading a
//! track does not need another analysis pass. Detection itself is external
//! ([`BpmDetector`]); when it fails the track gets [`DEFAULT_BPM`].

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::types::{is_valid_bpm, DEFAULT_BPM};

/// Re-detected BPMs closer than this to the stored value are ignored
pub const BPM_UPDATE_THRESHOLD: f64 = 0.1;

/// External tempo analysis
pub trait BpmDetector {
    /// Estimate the tempo of a file, `None` if detection failed
    fn estimate_bpm(&self, path: &Path) -> Option<f64>;
}

/// Errors from library edits
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LibraryError {
    #[error("No track at row {0}")]
    NoSuchRow(usize),

    #[error("BPM must be between 1 and 1000, got {0}")]
    InvalidBpm(f64),
}

/// A library row
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEntry {
    /// Source file
    pub path: PathBuf,
    /// Display name (file stem)
    pub name: String,
    /// Tempo in BPM
    pub bpm: f64,
}

/// Column to sort the library by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Bpm,
}

/// In-memory track library
#[derive(Debug, Clone, Default)]
pub struct TrackLibrary {
    entries: Vec<TrackEntry>,
}

fn usable_bpm(bpm: Option<f64>) -> Option<f64> {
    bpm.filter(|b| is_valid_bpm(*b))
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl TrackLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows in display order
    pub fn entries(&self) -> &[TrackEntry] {
        &self.entries
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Row index of a path
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.path == path)
    }

    /// Tempo [`TrackLibrary::add`] would give `path` for a detection result,
    /// without changing the library
    pub fn resolve_bpm(&self, path: &Path, detected: Option<f64>) -> f64 {
        let detected = usable_bpm(detected);
        match self.position(path) {
            Some(idx) => {
                let stored = self.entries[idx].bpm;
                match detected {
                    Some(bpm) if (stored - bpm).abs() > BPM_UPDATE_THRESHOLD => bpm,
                    _ => stored,
                }
            }
            None => detected.unwrap_or(DEFAULT_BPM),
        }
    }

    /// Add a track with a detected BPM, or update an existing row
    ///
    /// A failed detection (`None`, zero, negative) falls back to
    /// [`DEFAULT_BPM`] for new rows and leaves existing rows untouched.
    /// Returns the row index.
    pub fn add(&mut self, path: impl Into<PathBuf>, detected: Option<f64>) -> usize {
        let path = path.into();
        let detected = usable_bpm(detected);

        if let Some(idx) = self.position(&path) {
            let entry = &mut self.entries[idx];
            if let Some(bpm) = detected {
                if (entry.bpm - bpm).abs() > BPM_UPDATE_THRESHOLD {
                    log::info!(
                        "library: updating BPM of '{}' from {:.1} to {:.1}",
                        entry.name,
                        entry.bpm,
                        bpm
                    );
                    entry.bpm = bpm;
                }
            }
            return idx;
        }

        let bpm = detected.unwrap_or_else(|| {
            log::debug!("library: BPM detection failed for {:?}, using default", path);
            DEFAULT_BPM
        });
        let name = display_name(&path);
        log::info!("library: added '{}' (BPM: {:.1})", name, bpm);
        self.entries.push(TrackEntry { path, name, bpm });
        self.entries.len() - 1
    }

    /// Add a track, running the detector on it
    pub fn add_detected(&mut self, path: impl Into<PathBuf>, detector: &dyn BpmDetector) -> usize {
        let path = path.into();
        let detected = detector.estimate_bpm(&path);
        self.add(path, detected)
    }

    /// Edit the BPM of a row
    pub fn set_bpm(&mut self, row: usize, bpm: f64) -> Result<(), LibraryError> {
        if !is_valid_bpm(bpm) {
            return Err(LibraryError::InvalidBpm(bpm));
        }
        let entry = self.entries.get_mut(row).ok_or(LibraryError::NoSuchRow(row))?;
        log::info!("library: BPM of '{}' set to {:.1}", entry.name, bpm);
        entry.bpm = bpm;
        Ok(())
    }

    /// Remove a row
    pub fn remove(&mut self, row: usize) -> Result<TrackEntry, LibraryError> {
        if row >= self.entries.len() {
            return Err(LibraryError::NoSuchRow(row));
        }
        Ok(self.entries.remove(row))
    }

    /// Tempo for a path, [`DEFAULT_BPM`] if unknown
    pub fn bpm_for(&self, path: &Path) -> f64 {
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.bpm)
            .unwrap_or(DEFAULT_BPM)
    }

    /// Sort rows by a column
    pub fn sort(&mut self, column: SortColumn, ascending: bool) {
        self.entries.sort_by(|a, b| {
            let ord = match column {
                SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortColumn::Bpm => a.bpm.partial_cmp(&b.bpm).unwrap_or(Ordering::Equal),
            };
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
    }
}
