//! Definition store — one JSON file per record.
//!
//! # Storage layout
//!
//! ```text
//! <collections-dir>/<collection-name>.json   (one file per collection)
//! <flows-dir>/<flow-id>.json                 (one file per flow; operations embedded)
//! ```
//!
//! Every function takes the directory explicitly so tests run against
//! `tempfile::TempDir`. Loads walk the directory in sorted filename order;
//! saves go through a `.json.tmp` sibling and an atomic rename.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{io_err, StoreError};
use crate::types::{Collection, Flow};

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<dir>/<collection-name>.json` — pure, no I/O.
pub fn collection_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

/// `<dir>/<flow-id>.json` — pure, no I/O.
pub fn flow_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.json"))
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load every collection definition under `dir`, sorted by filename.
///
/// Returns `StoreError::DirNotFound` if the directory is absent — a push
/// with nothing to read is a configuration mistake, not an empty run.
pub fn load_collections(dir: &Path) -> Result<Vec<Collection>, StoreError> {
    load_records(dir)
}

/// Load every flow definition under `dir`, sorted by filename.
pub fn load_flows(dir: &Path) -> Result<Vec<Flow>, StoreError> {
    load_records(dir)
}

fn load_records<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, StoreError> {
    if !dir.is_dir() {
        return Err(StoreError::DirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut records = Vec::new();
    for path in paths {
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            log::debug!("skipping non-JSON file {}", path.display());
            continue;
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let record = serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
            path: path.clone(),
            source: e,
        })?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Save (atomic, content-gated)
// ---------------------------------------------------------------------------

/// Outcome of saving a single definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was left alone — current content already matches.
    Unchanged { path: PathBuf },
}

/// Save a collection to `<dir>/<name>.json`.
pub fn save_collection(dir: &Path, collection: &Collection) -> Result<SaveOutcome, StoreError> {
    save_record(&collection_path(dir, &collection.collection), collection)
}

/// Save a flow (with embedded operations) to `<dir>/<id>.json`.
pub fn save_flow(dir: &Path, flow: &Flow) -> Result<SaveOutcome, StoreError> {
    save_record(&flow_path(dir, &flow.id), flow)
}

/// Write flow: serialize pretty → compare with on-disk content → `.json.tmp`
/// sibling → rename. The `.tmp` lives next to the target so the rename never
/// crosses filesystems.
fn save_record(path: &Path, record: &impl Serialize) -> Result<SaveOutcome, StoreError> {
    let json = format!("{}\n", serde_json::to_string_pretty(record)?);

    match std::fs::read_to_string(path) {
        Ok(existing) if existing == json => {
            log::debug!("unchanged: {}", path.display());
            return Ok(SaveOutcome::Unchanged {
                path: path.to_path_buf(),
            });
        }
        _ => {}
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    log::debug!("wrote: {}", path.display());
    Ok(SaveOutcome::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn sample_collection(name: &str) -> Collection {
        serde_json::from_value(json!({
            "collection": name,
            "schema": {},
            "fields": [{ "field": "id", "type": "integer" }]
        }))
        .expect("sample collection")
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_collections(&tmp.path().join("absent")).unwrap_err();
        assert!(matches!(err, StoreError::DirNotFound { .. }));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let collection = sample_collection("articles");
        let outcome = save_collection(tmp.path(), &collection).unwrap();
        assert!(matches!(outcome, SaveOutcome::Written { .. }));

        let loaded = load_collections(tmp.path()).unwrap();
        assert_eq!(loaded, vec![collection]);
    }

    #[test]
    fn second_save_with_same_content_is_unchanged() {
        let tmp = TempDir::new().unwrap();
        let collection = sample_collection("articles");
        save_collection(tmp.path(), &collection).unwrap();
        let outcome = save_collection(tmp.path(), &collection).unwrap();
        assert!(matches!(outcome, SaveOutcome::Unchanged { .. }));
    }

    #[test]
    fn load_order_follows_sorted_filenames() {
        let tmp = TempDir::new().unwrap();
        for name in ["zebra", "articles", "mango"] {
            save_collection(tmp.path(), &sample_collection(name)).unwrap();
        }
        let names: Vec<String> = load_collections(tmp.path())
            .unwrap()
            .into_iter()
            .map(|c| c.collection)
            .collect();
        assert_eq!(names, ["articles", "mango", "zebra"]);
    }

    #[test]
    fn non_json_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        save_collection(tmp.path(), &sample_collection("articles")).unwrap();
        std::fs::write(tmp.path().join("README.md"), "notes").unwrap();

        let loaded = load_collections(tmp.path()).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn parse_error_names_the_offending_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("broken.json"), "{ not json").unwrap();

        let err = load_flows(tmp.path()).unwrap_err();
        match err {
            StoreError::Parse { path, .. } => {
                assert!(path.ends_with("broken.json"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let tmp = TempDir::new().unwrap();
        save_collection(tmp.path(), &sample_collection("articles")).unwrap();
        assert!(!tmp.path().join("articles.json.tmp").exists());
    }
}
