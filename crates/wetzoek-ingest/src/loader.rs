//! Filesystem document loader.
//!
//! Walks the data directory for `.txt`/`.md`/`.pdf` files and annotates each
//! loaded document with `source_path`, `source_rel` and `category` (first
//! path segment under the data root, `"root"` for top-level files). PDF text
//! comes from the `pdftotext` system binary, one document per page; files
//! that fail extraction are skipped with a warning rather than aborting the
//! whole load.

use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::Command;
use tracing::warn;

use wetzoek_core::traits::DocumentLoader;
use wetzoek_core::types::{keys, Meta, SourceDocument};

const LOADABLE_EXTENSIONS: [&str; 3] = ["txt", "md", "pdf"];

#[derive(Debug, Default)]
pub struct FsLoader;

impl FsLoader {
    pub fn new() -> Self {
        Self
    }

    fn list_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
            if LOADABLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        files
    }

    fn base_metadata(path: &Path, data_dir: &Path) -> Meta {
        let rel = path.strip_prefix(data_dir).unwrap_or(path);
        let parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();
        let category =
            if parts.len() > 1 { parts[0].clone() } else { "root".to_string() };

        let mut meta = Meta::new();
        meta.insert(keys::SOURCE_PATH.to_string(), path.to_string_lossy().to_string());
        meta.insert(keys::SOURCE_REL.to_string(), parts.join("/"));
        meta.insert(keys::CATEGORY.to_string(), category);
        meta
    }
}

impl DocumentLoader for FsLoader {
    fn load_dir(&self, data_dir: &Path) -> Result<Vec<SourceDocument>> {
        let files = self.list_files(data_dir);
        let mut docs = Vec::new();
        for path in &files {
            let meta = Self::base_metadata(path, data_dir);
            let ext = path
                .extension()
                .and_then(|s| s.to_str())
                .map(str::to_lowercase)
                .unwrap_or_default();
            if ext == "pdf" {
                match extract_pdf_pages(path) {
                    Ok(pages) => {
                        for (page_no, page_text) in pages.iter().enumerate() {
                            if page_text.trim().is_empty() {
                                continue;
                            }
                            let mut page_meta = meta.clone();
                            page_meta.insert(keys::PAGE.to_string(), page_no.to_string());
                            docs.push(SourceDocument::new(page_text.clone(), page_meta));
                        }
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable PDF");
                    }
                }
            } else {
                match read_file_content(path) {
                    Ok(content) if !content.trim().is_empty() => {
                        docs.push(SourceDocument::new(content, meta));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    }
                }
            }
        }
        Ok(docs)
    }
}

fn read_file_content(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).to_string()),
    }
}

/// Extract per-page text via the `pdftotext` system binary. Pages come back
/// separated by form feeds on stdout.
fn extract_pdf_pages(path: &Path) -> Result<Vec<String>> {
    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg(path)
        .arg("-")
        .output()
        .map_err(|e| anyhow!("failed to run pdftotext: {}", e))?;
    if !output.status.success() {
        return Err(anyhow!(
            "pdftotext exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    let text = String::from_utf8_lossy(&output.stdout).to_string();
    if text.trim().is_empty() {
        return Err(anyhow!("pdftotext produced no text output"));
    }
    Ok(text.split('\u{000C}').map(str::to_string).collect())
}
