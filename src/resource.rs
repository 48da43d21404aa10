// Resource scaffolding: derives where the model, migration and controller
// of a resource live inside a Vapor project.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, ToolboxError};

/// File whose presence marks a directory as a project root.
pub const PROJECT_MARKER: &str = "Package.swift";

const MODELS_DIR: &str = "Sources/App/Models";
const MIGRATIONS_DIR: &str = "Sources/App/Migrations";
const CONTROLLERS_DIR: &str = "Sources/App/Controllers";

/// Uppercase the first character of `raw`, leaving the rest untouched.
pub fn normalize_name(raw: &str) -> Result<String> {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => Ok(first.to_uppercase().chain(chars).collect()),
        None => Err(ToolboxError::InvalidResourceName),
    }
}

/// The three files generated for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    pub name: String,
    pub model: PathBuf,
    pub migration: PathBuf,
    pub controller: PathBuf,
}

impl ResourcePaths {
    /// Derive paths under `root` for an already normalized `name`.
    pub fn derive(root: &Path, name: &str) -> Self {
        ResourcePaths {
            name: name.to_string(),
            model: root.join(MODELS_DIR).join(format!("{name}.swift")),
            migration: root.join(MIGRATIONS_DIR).join(format!("Create{name}.swift")),
            controller: root
                .join(CONTROLLERS_DIR)
                .join(format!("{name}Controller.swift")),
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [
            self.model.as_path(),
            self.migration.as_path(),
            self.controller.as_path(),
        ]
    }

    /// Paths that already exist on disk.
    pub fn existing(&self) -> Vec<&Path> {
        self.all().into_iter().filter(|p| p.exists()).collect()
    }
}

/// Check that `root` is a project and work out where the files of
/// `raw_name` go. Nothing is written.
pub fn plan(root: &Path, raw_name: &str) -> Result<ResourcePaths> {
    let name = normalize_name(raw_name)?;
    if !root.join(PROJECT_MARKER).is_file() {
        return Err(ToolboxError::NotAProject {
            dir: root.to_path_buf(),
        });
    }
    let paths = ResourcePaths::derive(root, &name);
    debug!(?paths, "derived resource paths");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_MARKER), "// swift-tools-version:5.2\n").unwrap();
        dir
    }

    #[test]
    fn normalize_uppercases_first_letter_only() {
        assert_eq!(normalize_name("user").unwrap(), "User");
        assert_eq!(normalize_name("blogPost").unwrap(), "BlogPost");
        assert_eq!(normalize_name("Todo").unwrap(), "Todo");
        assert_eq!(normalize_name("élan").unwrap(), "Élan");
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            normalize_name(""),
            Err(ToolboxError::InvalidResourceName)
        ));
    }

    #[test]
    fn surrounding_whitespace_is_kept() {
        assert_eq!(normalize_name("user ").unwrap(), "User ");
        assert_eq!(normalize_name(" user").unwrap(), " user");
    }

    #[test]
    fn user_derives_capitalized_paths() {
        let dir = project();
        let paths = plan(dir.path(), "user").unwrap();
        assert_eq!(paths.name, "User");
        assert_eq!(paths.model, dir.path().join("Sources/App/Models/User.swift"));
        assert_eq!(
            paths.migration,
            dir.path().join("Sources/App/Migrations/CreateUser.swift")
        );
        assert_eq!(
            paths.controller,
            dir.path().join("Sources/App/Controllers/UserController.swift")
        );
    }

    #[test]
    fn outside_a_project_fails_without_writing() {
        let dir = TempDir::new().unwrap();
        let err = plan(dir.path(), "user").unwrap_err();
        assert!(matches!(err, ToolboxError::NotAProject { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn marker_directory_does_not_count() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(PROJECT_MARKER)).unwrap();
        assert!(plan(dir.path(), "user").is_err());
    }

    #[test]
    fn existing_reports_files_already_present() {
        let dir = project();
        let paths = plan(dir.path(), "todo").unwrap();
        assert!(paths.existing().is_empty());

        fs::create_dir_all(paths.model.parent().unwrap()).unwrap();
        fs::write(&paths.model, "").unwrap();
        assert_eq!(paths.existing(), vec![paths.model.as_path()]);
    }
}
