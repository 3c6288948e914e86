//! Output packaging: a single file as is, several files as a zip archive.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::converter::ConvertedArtifact;
use crate::metrics::ARCHIVES_CREATED;

use super::error::ConversionError;
use super::types::PackagedOutput;

/// Turns the artifacts of a batch into one downloadable output.
#[derive(Debug, Clone)]
pub struct OutputPackager {
    temp_dir: PathBuf,
}

impl OutputPackager {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Packages the artifacts.
    ///
    /// One artifact is returned unchanged. Several artifacts are written to
    /// a zip archive in order and deleted as they are archived.
    pub async fn package(
        &self,
        mut artifacts: Vec<ConvertedArtifact>,
    ) -> Result<PackagedOutput, ConversionError> {
        match artifacts.len() {
            0 => Err(ConversionError::NoSuccessfulConversions { attempted: 0 }),
            1 => {
                let artifact = artifacts.remove(0);
                debug!(file = %artifact.download_name(), "Returning single converted file");
                Ok(PackagedOutput::Single(artifact))
            }
            count => {
                let temp_dir = self.temp_dir.clone();
                let output = tokio::task::spawn_blocking(move || {
                    write_archive(&temp_dir, artifacts)
                })
                .await
                .map_err(io::Error::other)??;

                ARCHIVES_CREATED.inc();
                info!(files = count, "Packaged converted files into archive");
                Ok(output)
            }
        }
    }
}

fn write_archive(
    temp_dir: &Path,
    artifacts: Vec<ConvertedArtifact>,
) -> Result<PackagedOutput, ConversionError> {
    std::fs::create_dir_all(temp_dir)?;
    let (file, path) = tempfile::Builder::new()
        .prefix("convertino_archive_")
        .suffix(".zip")
        .tempfile_in(temp_dir)?
        .into_parts();

    let file_count = artifacts.len();
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut used = HashSet::new();

    for artifact in artifacts {
        let entry = unique_entry_name(artifact.download_name(), &mut used);
        zip.start_file(entry.as_str(), options)?;
        let mut source = File::open(artifact.path())?;
        io::copy(&mut source, &mut zip)?;
        drop(source);

        debug!(entry = %entry, "Added file to archive");
        if let Err(e) = artifact.close() {
            warn!(error = %e, "Failed to delete archived file");
        }
    }

    let mut writer = zip.finish()?;
    writer.flush()?;

    Ok(PackagedOutput::Archive { path, file_count })
}

/// Entry names are flat; repeated names get a " (n)" counter before the
/// extension.
fn unique_entry_name(download_name: &str, used: &mut HashSet<String>) -> String {
    let flat = download_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(download_name)
        .to_string();

    if used.insert(flat.clone()) {
        return flat;
    }

    let (stem, ext) = match flat.rfind('.') {
        Some(dot) if dot > 0 => flat.split_at(dot),
        _ => (flat.as_str(), ""),
    };
    let mut n = 2;
    loop {
        let candidate = format!("{} ({}){}", stem, n, ext);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
