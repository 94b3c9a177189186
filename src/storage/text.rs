//! Text file storage implementation

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::Result;
use crate::graph::{LoadReport, SchoolGraph};

/// File-backed storage for a [`SchoolGraph`]
#[derive(Debug, Clone)]
pub struct TextStore {
    path: PathBuf,
}

impl TextStore {
    /// Point at a records file. Nothing is opened until load or save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the file into `graph`. A missing file is an IO error.
    pub fn load_into(&self, graph: &mut SchoolGraph) -> Result<LoadReport> {
        let file = File::open(&self.path)?;
        tracing::debug!("Loading records from {}", self.path.display());
        graph.load(BufReader::new(file))
    }

    /// Load the file into a fresh graph.
    pub fn load(&self) -> Result<(SchoolGraph, LoadReport)> {
        let mut graph = SchoolGraph::new();
        let report = self.load_into(&mut graph)?;
        Ok((graph, report))
    }

    /// Like [`TextStore::load`], but a missing file yields an empty graph.
    pub fn load_or_default(&self) -> Result<(SchoolGraph, LoadReport)> {
        if !self.exists() {
            tracing::debug!("{} does not exist, starting empty", self.path.display());
            return Ok((SchoolGraph::new(), LoadReport::default()));
        }
        self.load()
    }

    /// Replace the file with the current contents of `graph`.
    ///
    /// Records go to a temporary file next to the destination, which is
    /// synced and then renamed over it. On failure the temporary file is
    /// removed and the destination is left untouched.
    pub fn save(&self, graph: &SchoolGraph) -> Result<()> {
        let temp_path = self.temp_path();

        if let Err(e) = Self::write_synced(&temp_path, graph) {
            Self::discard(&temp_path);
            return Err(e);
        }

        // Atomic rename
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            Self::discard(&temp_path);
            return Err(e.into());
        }

        tracing::debug!("Replaced {}", self.path.display());
        Ok(())
    }

    fn write_synced(temp_path: &Path, graph: &SchoolGraph) -> Result<()> {
        let mut writer = BufWriter::new(File::create(temp_path)?);
        graph.save(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }

    fn discard(temp_path: &Path) {
        if let Err(e) = fs::remove_file(temp_path) {
            tracing::debug!("Could not remove {}: {}", temp_path.display(), e);
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
