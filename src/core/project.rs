//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents a PFT project: a directory tree of record files
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .pft/)
    root: PathBuf,
}

/// Collection directories created under the project root
pub const COLLECTION_DIRS: [&str; 6] = [
    "storage/shelves",
    "storage/cabinets",
    "storage/folders",
    "storage/boxes",
    "divisions",
    "records",
];

impl Project {
    /// Find the project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let cwd = std::env::current_dir().map_err(io_err)?;
        Self::discover_from(&cwd)
    }

    /// Find the project root by walking up from the given directory,
    /// looking for the `.pft/` marker
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let start_abs = start.canonicalize().map_err(io_err)?;
        start_abs
            .ancestors()
            .find(|dir| dir.join(".pft").is_dir())
            .map(|root| Self {
                root: root.to_path_buf(),
            })
            .ok_or_else(|| ProjectError::NotFound {
                searched_from: start.to_path_buf(),
            })
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(".pft").exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::create_structure(&root)?;
        Ok(Self { root })
    }

    /// Force initialization even if .pft/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create_structure(&root)?;
        Ok(Self { root })
    }

    fn create_structure(root: &Path) -> Result<(), ProjectError> {
        let pft_dir = root.join(".pft");
        std::fs::create_dir_all(&pft_dir).map_err(io_err)?;

        // Existing config survives a --force re-init
        let config_path = pft_dir.join("config.yaml");
        if !config_path.exists() {
            std::fs::write(&config_path, Self::default_config()).map_err(io_err)?;
        }

        for dir in COLLECTION_DIRS {
            std::fs::create_dir_all(root.join(dir)).map_err(io_err)?;
        }

        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# PFT Project Configuration

# Default author for new entities (can be overridden by global config)
# author: ""

# Editor to use for `pft ... edit` commands (default: $EDITOR)
# editor: ""

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .pft configuration directory
    pub fn pft_dir(&self) -> PathBuf {
        self.root.join(".pft")
    }
}

fn io_err(e: std::io::Error) -> ProjectError {
    ProjectError::IoError(e.to_string())
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a PFT project (searched from {searched_from:?}). Run 'pft init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("PFT project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.pft_dir().exists());
        assert!(project.pft_dir().join("config.yaml").exists());
        for dir in COLLECTION_DIRS {
            assert!(project.root().join(dir).is_dir(), "missing {}", dir);
        }
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
    }

    #[test]
    fn test_project_discover_walks_up() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("records/deep/nested");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_marker() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }
}
