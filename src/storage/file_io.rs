//! File I/O utilities for the JSON document store

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::SystemTime;

use serde::de::DeserializeOwned;

use crate::error::BudgetError;

/// Read JSON from a file, returning an error if the file doesn't exist
pub fn read_json_required<T, P>(path: P) -> Result<T, BudgetError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Err(BudgetError::ServiceUnavailable(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let file = File::open(path).map_err(|e| {
        BudgetError::ServiceUnavailable(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| BudgetError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Last modification time of a file
pub fn modified_time<P: AsRef<Path>>(path: P) -> Result<SystemTime, BudgetError> {
    let path = path.as_ref();
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| {
            BudgetError::ServiceUnavailable(format!("Failed to stat {}: {}", path.display(), e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_read_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");
        std::fs::write(&path, r#"{"name": "test", "value": 42}"#).unwrap();

        let loaded: TestData = read_json_required(&path).unwrap();
        assert_eq!(
            loaded,
            TestData {
                name: "test".into(),
                value: 42
            }
        );
        assert!(modified_time(&path).is_ok());
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let err = read_json_required::<TestData, _>(&path).unwrap_err();
        assert!(matches!(err, BudgetError::ServiceUnavailable(_)));
        assert!(modified_time(&path).is_err());
    }

    #[test]
    fn test_invalid_json_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("invalid.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_json_required::<TestData, _>(&path).unwrap_err();
        assert!(matches!(err, BudgetError::Storage(_)));
    }
}
