//! Loading canonical JSON documents from disk into a [`DocumentIndex`]
//!
//! Layout: every subdirectory holds the documents of one EHR, named after the EHR id.
//! JSON files directly in the root form one more group. An `EHR` document in a group
//! decides the group's EHR id; otherwise the directory name does. Documents of a class
//! without a typed model are indexed as raw JSON under their `_type`.

use anyhow::{bail, Context};
use ipehr_aql::DocumentIndex;
use ipehr_models::{Document, Error as ModelError};
use std::fs;
use std::path::{Path, PathBuf};

enum Loaded {
    Typed(Document),
    Raw(String, serde_json::Value),
}

/// Load every document under `dir`.
pub fn load_index(dir: &Path) -> anyhow::Result<DocumentIndex> {
    let mut index = DocumentIndex::new();
    let mut root_files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in sorted_entries(dir)? {
        if entry.is_dir() {
            subdirs.push(entry);
        } else if is_json(&entry) {
            root_files.push(entry);
        }
    }

    let mut total = 0;
    if !root_files.is_empty() {
        total += load_group(&mut index, &root_files, None)?;
    }
    for subdir in subdirs {
        let files: Vec<_> = sorted_entries(&subdir)?
            .into_iter()
            .filter(|path| path.is_file() && is_json(path))
            .collect();
        let fallback = subdir.file_name().and_then(|name| name.to_str());
        total += load_group(&mut index, &files, fallback)?;
    }

    tracing::info!(directory = %dir.display(), documents = total, "Documents loaded");
    Ok(index)
}

/// Parse one document file.
pub fn read_document(path: &Path) -> anyhow::Result<Document> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    text.parse()
        .with_context(|| format!("Failed to parse document {}", path.display()))
}

fn load_group(
    index: &mut DocumentIndex,
    files: &[PathBuf],
    fallback_ehr_id: Option<&str>,
) -> anyhow::Result<usize> {
    let mut loaded = Vec::with_capacity(files.len());
    for path in files {
        loaded.push((path, read_loaded(path)?));
    }

    let ehr_id = loaded
        .iter()
        .find_map(|(_, doc)| match doc {
            Loaded::Typed(Document::Ehr(ehr)) => Some(ehr.ehr_id.value.clone()),
            _ => None,
        })
        .or_else(|| fallback_ehr_id.map(str::to_string));

    let Some(ehr_id) = ehr_id else {
        if loaded.is_empty() {
            return Ok(0);
        }
        bail!(
            "No EHR document and no directory name to assign {} document(s) to",
            loaded.len()
        );
    };

    let count = loaded.len();
    for (path, doc) in loaded {
        match doc {
            Loaded::Typed(document) => {
                tracing::debug!(
                    path = %path.display(),
                    ehr_id = %ehr_id,
                    document_type = document.type_name(),
                    "Indexing document"
                );
                index
                    .add_document(Some(&ehr_id), document)
                    .with_context(|| format!("Failed to index {}", path.display()))?;
            }
            Loaded::Raw(type_name, json) => {
                tracing::warn!(
                    path = %path.display(),
                    document_type = %type_name,
                    "No typed model for document class, indexing raw JSON"
                );
                index.add_raw(&type_name, &ehr_id, json);
            }
        }
    }
    Ok(count)
}

fn read_loaded(path: &Path) -> anyhow::Result<Loaded> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    match Document::from_json(json.clone()) {
        Ok(document) => Ok(Loaded::Typed(document)),
        Err(ModelError::UnsupportedType(type_name)) => Ok(Loaded::Raw(type_name, json)),
        Err(e) => Err(e).with_context(|| format!("Failed to parse document {}", path.display())),
    }
}

fn sorted_entries(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to list directory {}", dir.display()))?;
    entries.sort();
    Ok(entries)
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("json")
}
