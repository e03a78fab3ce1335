use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{ROOT_ENV, SERVER_LOG_FILE};

/// Root directory holding the installed runtime, application and data.
/// `STATUSWATCH_ROOT` overrides the default `~/.statuswatch`.
pub(crate) fn default_root_dir() -> Option<PathBuf> {
    if let Ok(root) = env::var(ROOT_ENV) {
        let path = PathBuf::from(root.trim());
        if !path.as_os_str().is_empty() {
            return Some(path);
        }
    }

    home::home_dir().map(|home| home.join(".statuswatch"))
}

pub(crate) fn core_dir(root: &Path) -> PathBuf {
    root.join("core")
}

pub(crate) fn node_dir(root: &Path) -> PathBuf {
    root.join("node")
}

pub(crate) fn data_dir(root: &Path) -> PathBuf {
    root.join("data")
}

pub(crate) fn node_executable(root: &Path) -> PathBuf {
    node_dir(root).join(node_executable_relative())
}

pub(crate) fn node_executable_relative() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from("node.exe")
    } else {
        PathBuf::from("bin").join("node")
    }
}

pub(crate) fn server_log_path(root: &Path) -> PathBuf {
    root.join("logs").join(SERVER_LOG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_dirs_hang_off_the_root() {
        let root = Path::new("/opt/statuswatch");
        assert_eq!(core_dir(root), PathBuf::from("/opt/statuswatch/core"));
        assert_eq!(node_dir(root), PathBuf::from("/opt/statuswatch/node"));
        assert_eq!(data_dir(root), PathBuf::from("/opt/statuswatch/data"));
        assert_eq!(
            server_log_path(root),
            PathBuf::from("/opt/statuswatch/logs/server.log")
        );
    }

    #[test]
    fn node_executable_lives_under_the_node_dir() {
        let root = Path::new("/opt/statuswatch");
        let exe = node_executable(root);
        assert!(exe.starts_with(node_dir(root)));
        if cfg!(target_os = "windows") {
            assert!(exe.ends_with("node.exe"));
        } else {
            assert!(exe.ends_with("bin/node"));
        }
    }
}
