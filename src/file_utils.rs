use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::formats::DocumentFormat;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: <output_root>/<format dir>/<stem>-<lang>.<ext>
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_root: P2,
        format: DocumentFormat,
        target_language: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();

        let extension = format
            .output_extension()
            .map(str::to_string)
            .or_else(|| input_file.extension().map(|e| e.to_string_lossy().to_string()));

        let file_name = match extension {
            Some(ext) => format!("{}-{}.{}", stem, target_language, ext),
            None => format!("{}-{}", stem, target_language),
        };

        output_root.as_ref().join(format.output_dir()).join(file_name)
    }

    /// Expand inputs into the supported documents they contain
    ///
    /// Files are taken as given; directories are walked recursively and
    /// only files with a known extension are kept.
    pub fn collect_documents<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<(PathBuf, DocumentFormat)>> {
        let mut documents = Vec::new();

        for input in inputs {
            let input = input.as_ref();

            if Self::file_exists(input) {
                let format = DocumentFormat::from_path(input)
                    .with_context(|| format!("Unsupported document type: {:?}", input))?;
                documents.push((input.to_path_buf(), format));
                continue;
            }

            if !Self::dir_exists(input) {
                anyhow::bail!("Input path does not exist: {:?}", input);
            }

            let mut found = Vec::new();
            for entry in WalkDir::new(input).follow_links(true) {
                let entry = entry.context("Failed to read directory entry")?;
                let path = entry.path();
                if !path.is_file() || path.extension().is_none() {
                    continue;
                }
                if let Some(format) = DocumentFormat::from_path(path) {
                    found.push((path.to_path_buf(), format));
                }
            }
            found.sort_by(|a, b| a.0.cmp(&b.0));
            documents.extend(found);
        }

        Ok(documents)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
