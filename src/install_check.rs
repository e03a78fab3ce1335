use std::path::{Path, PathBuf};

/// Directory components an installation must provide before the server can
/// be launched: the application itself, the bundled runtime, installed
/// dependencies and the built frontend.
fn required_dirs(root: &Path) -> [(PathBuf, &'static str); 4] {
    [
        (root.join("core"), "core"),
        (root.join("node"), "node"),
        (root.join("core").join("node_modules"), "core/node_modules"),
        (root.join("core").join("dist"), "core/dist"),
    ]
}

pub(crate) fn installation_complete(root: &Path) -> bool {
    missing_components(root).is_empty()
}

pub(crate) fn missing_components(root: &Path) -> Vec<&'static str> {
    required_dirs(root)
        .into_iter()
        .filter(|(path, _)| !path.is_dir())
        .map(|(_, name)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn empty_root_is_missing_everything() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(!installation_complete(dir.path()));
        assert_eq!(
            missing_components(dir.path()),
            vec!["core", "node", "core/node_modules", "core/dist"]
        );
    }

    #[test]
    fn complete_layout_passes_the_check() {
        let dir = tempfile::tempdir().expect("tempdir");
        for sub in ["core/node_modules", "core/dist", "node"] {
            fs::create_dir_all(dir.path().join(sub)).expect("create layout dir");
        }
        assert!(installation_complete(dir.path()));
    }

    #[test]
    fn file_in_place_of_directory_does_not_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("core/node_modules")).expect("create core");
        fs::create_dir_all(dir.path().join("core/dist")).expect("create dist");
        fs::write(dir.path().join("node"), b"not a directory").expect("write file");
        assert_eq!(missing_components(dir.path()), vec!["node"]);
    }
}
