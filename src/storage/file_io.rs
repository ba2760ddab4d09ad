//! File I/O for analysis inputs and report outputs
//!
//! Inputs are read as JSON or YAML depending on the file extension. Outputs
//! are written atomically so a failed export never leaves a half-written
//! report behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{FinsightError, FinsightResult};
use crate::models::AnalysisInput;

/// Document format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// `.yaml` and `.yml` are YAML; anything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Read a document that must exist
pub fn read_required<T, P>(path: P) -> FinsightResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Err(FinsightError::input_not_found(path.display().to_string()));
    }

    let file = File::open(path)
        .map_err(|e| FinsightError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    let reader = BufReader::new(file);

    match InputFormat::from_path(path) {
        InputFormat::Json => serde_json::from_reader(reader)
            .map_err(|e| FinsightError::Input(format!("Failed to parse {}: {}", path.display(), e))),
        InputFormat::Yaml => serde_yaml::from_reader(reader)
            .map_err(|e| FinsightError::Input(format!("Failed to parse {}: {}", path.display(), e))),
    }
}

/// Load and validate an analysis input document
pub fn load_input<P: AsRef<Path>>(path: P) -> FinsightResult<AnalysisInput> {
    let path = path.as_ref();
    let input: AnalysisInput = read_required(path)?;
    input.validate()?;

    tracing::info!(
        path = %path.display(),
        goals = input.goals.len(),
        budgets = input.budgets.len(),
        commitments = input.commitments.len(),
        "loaded analysis input"
    );

    Ok(input)
}

/// Write bytes to a file atomically (write to temp, then rename)
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> FinsightResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            FinsightError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path);

    let file = File::create(&temp_path)
        .map_err(|e| FinsightError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents)
        .map_err(|e| FinsightError::Io(format!("Failed to write data: {}", e)))?;
    writer
        .flush()
        .map_err(|e| FinsightError::Io(format!("Failed to flush data: {}", e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| FinsightError::Io(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        FinsightError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote report");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const JSON_INPUT: &str = r#"{
        "current": {
            "start_date": "2025-02-01",
            "end_date": "2025-02-28",
            "total_income": 4200,
            "total_expenses": 3100
        },
        "goals": [
            {"name": "Trip", "target_amount": 2000, "current_amount": 500, "target_date": "2025-12-01"}
        ]
    }"#;

    #[test]
    fn test_format_by_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.yaml")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("a.YML")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("a.json")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("input")), InputFormat::Json);
    }

    #[test]
    fn test_load_json_input() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("input.json");
        fs::write(&path, JSON_INPUT).unwrap();

        let input = load_input(&path).unwrap();
        assert_eq!(input.current.total_income(), 4200.0);
        assert_eq!(input.goals.len(), 1);
    }

    #[test]
    fn test_load_yaml_input() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("input.yml");
        fs::write(
            &path,
            "current:\n  start_date: 2025-02-01\n  end_date: 2025-02-28\n  total_expenses: 90\n",
        )
        .unwrap();

        let input = load_input(&path).unwrap();
        assert_eq!(input.current.total_expenses(), 90.0);
    }

    #[test]
    fn test_missing_input_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_input(temp_dir.path().join("missing.json")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_malformed_input() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "{\"current\": 5}").unwrap();

        let err = load_input(&path).unwrap_err();
        assert!(matches!(err, FinsightError::Input(_)));
    }

    #[test]
    fn test_invalid_goal_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("input.json");
        fs::write(&path, JSON_INPUT.replace("\"target_amount\": 2000", "\"target_amount\": 0"))
            .unwrap();

        assert!(load_input(&path).unwrap_err().is_validation());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("report.csv");

        write_atomic(&path, b"a,b\n1,2\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,2\n");
        assert!(!temp_dir.path().join("nested").join("report.csv.tmp").exists());
    }
}
