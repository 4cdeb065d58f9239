use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::CampusData;

/// Default filename for a campus dataset.
pub const DATASET_FILENAME: &str = "campus.json";

/// Environment variable overriding the dataset location.
pub const DATASET_ENV_VAR: &str = "CAMPUSNAV_DATASET";

/// Resolve the default dataset location using platform-specific project directories.
pub fn default_dataset_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("org", "campusnav", "campusnav").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATASET_FILENAME))
}

/// Work out which dataset file to load.
///
/// The resolution order is:
/// 1. Explicit `target` argument when provided.
/// 2. `CAMPUSNAV_DATASET` environment variable.
/// 3. Platform-specific project data directory.
///
/// Directory paths (anything without an extension) get `campus.json`
/// appended. The returned path is not checked for existence.
pub fn resolve_dataset_path(target: Option<&Path>) -> Result<PathBuf> {
    if let Some(explicit) = target {
        return Ok(canonical_dataset_path(explicit));
    }

    if let Some(env_path) = env::var_os(DATASET_ENV_VAR) {
        return Ok(canonical_dataset_path(Path::new(&env_path)));
    }

    default_dataset_path()
}

fn canonical_dataset_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        return path.to_path_buf();
    }

    path.join(DATASET_FILENAME)
}

/// Load and validate a campus dataset from a JSON file.
pub fn load_campus(path: &Path) -> Result<CampusData> {
    if !path.exists() {
        return Err(Error::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "loading campus dataset");
    let contents = fs::read_to_string(path)?;
    let campus = CampusData::from_json(&contents)?;
    campus.validate()?;

    info!(
        levels = campus.levels.len(),
        units = campus.units.len(),
        coordinates = ?campus.coordinates,
        "loaded campus dataset"
    );
    Ok(campus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_get_default_filename() {
        let resolved = resolve_dataset_path(Some(Path::new("/data/campus"))).unwrap();
        assert_eq!(resolved, PathBuf::from("/data/campus").join(DATASET_FILENAME));
    }

    #[test]
    fn explicit_files_are_kept() {
        let resolved = resolve_dataset_path(Some(Path::new("/data/north.json"))).unwrap();
        assert_eq!(resolved, PathBuf::from("/data/north.json"));
    }

    #[test]
    fn missing_dataset_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("absent.json");
        assert!(matches!(
            load_campus(&path),
            Err(Error::DatasetNotFound { .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_campus(&path), Err(Error::Json(_))));
    }
}
