//! Archive expander
//!
//! Unpacks one downloaded bundle into a working directory of flat data
//! files. The directory name is derived from the archive name, so a rerun
//! on the same archive name overwrites in place while differently-named
//! archives never collide.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Expansion failures; the working directory must be treated as unusable
/// when any variant is returned.
#[derive(Debug, Error)]
pub enum ExpansionError {
    #[error("Cannot open archive {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt or unreadable archive {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Expand `archive_path` into `<parent>/extracted_<stem>` and return the
/// working directory. Extraction is all-or-nothing: any failure is
/// reported and the caller must not assume the directory is usable.
pub fn expand(archive_path: &Path) -> Result<PathBuf, ExpansionError> {
    let stem = archive_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ExpansionError::Corrupt {
            path: archive_path.to_path_buf(),
            message: "archive has no usable file name".to_string(),
        })?;

    let extract_dir = archive_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("extracted_{}", stem));
    std::fs::create_dir_all(&extract_dir)?;

    let file = std::fs::File::open(archive_path).map_err(|source| ExpansionError::Open {
        path: archive_path.to_path_buf(),
        source,
    })?;

    let mut archive = zip::ZipArchive::new(file).map_err(|e| ExpansionError::Corrupt {
        path: archive_path.to_path_buf(),
        message: e.to_string(),
    })?;

    archive
        .extract(&extract_dir)
        .map_err(|e| ExpansionError::Corrupt {
            path: archive_path.to_path_buf(),
            message: e.to_string(),
        })?;

    tracing::info!(
        "Extracted {} to {}",
        archive_path.display(),
        extract_dir.display()
    );
    Ok(extract_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, contents) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn expands_into_deterministic_directory() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("LM_licenses_20240101.zip");
        write_zip(&archive, &[("HD.dat", "HD|1001|\n"), ("EN.dat", "EN|1001|\n")]);

        let workdir = expand(&archive).unwrap();
        assert_eq!(
            workdir,
            dir.path().join("extracted_LM_licenses_20240101")
        );
        assert!(workdir.join("HD.dat").exists());
        assert!(workdir.join("EN.dat").exists());

        // Re-expansion overwrites in place
        let workdir_again = expand(&archive).unwrap();
        assert_eq!(workdir, workdir_again);
    }

    #[test]
    fn corrupt_archive_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.zip");
        std::fs::write(&archive, b"this is not a zip archive").unwrap();

        let result = expand(&archive);
        assert!(matches!(result, Err(ExpansionError::Corrupt { .. })));
    }

    #[test]
    fn missing_archive_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = expand(&dir.path().join("absent.zip"));
        assert!(matches!(result, Err(ExpansionError::Open { .. })));
    }
}
