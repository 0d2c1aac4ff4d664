//! Menu image staging
//!
//! Copies the menu photos into the shell's static directory so production
//! builds can serve them under `/images/<file>`.

use std::fs;
use std::path::{Path, PathBuf};

use smoothie_core::prelude::*;

use crate::config::AssetSettings;

/// What a copy run did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyReport {
    /// Directory the files came from, `None` when no candidate existed
    pub source: Option<PathBuf>,
    pub dest: PathBuf,
    pub copied: Vec<String>,
}

impl CopyReport {
    pub fn is_empty(&self) -> bool {
        self.copied.is_empty()
    }
}

/// Copy every regular file of the first existing candidate into `dest`.
///
/// `dest` is created when missing. No existing candidate is not an error:
/// a warning is logged and an empty report returned.
pub fn copy_menu_images(candidates: &[PathBuf], dest: &Path) -> Result<CopyReport> {
    fs::create_dir_all(dest).map_err(|e| Error::asset_copy(dest, e.to_string()))?;

    let mut report = CopyReport {
        source: None,
        dest: dest.to_path_buf(),
        copied: Vec::new(),
    };

    let Some(source) = candidates.iter().find(|c| c.is_dir()) else {
        warn!(
            "No menu image directory found (tried: {})",
            candidates
                .iter()
                .map(|c| c.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        return Ok(report);
    };

    let entries = fs::read_dir(source).map_err(|e| Error::asset_copy(source, e.to_string()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Listing {}", source.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("Reading file type of {}", path.display()))?;
        if !file_type.is_file() {
            trace!("Skipping non-file {}", path.display());
            continue;
        }
        let name = entry.file_name();
        fs::copy(&path, dest.join(&name)).map_err(|e| Error::asset_copy(&path, e.to_string()))?;
        report.copied.push(name.to_string_lossy().into_owned());
    }
    report.copied.sort();

    info!(
        "Copied {} menu image(s) from {} to {}",
        report.copied.len(),
        source.display(),
        dest.display()
    );
    report.source = Some(source.clone());
    Ok(report)
}

/// Resolve the configured candidates and destination against `root`
pub fn copy_configured_images(root: &Path, settings: &AssetSettings) -> Result<CopyReport> {
    let candidates: Vec<PathBuf> = settings.sources.iter().map(|s| root.join(s)).collect();
    copy_menu_images(&candidates, &root.join(&settings.dest))
}
