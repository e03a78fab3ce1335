use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DesktopLogCategory {
    Startup,
    Runtime,
    Download,
    Update,
    Shutdown,
}

impl DesktopLogCategory {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            DesktopLogCategory::Startup => "startup",
            DesktopLogCategory::Runtime => "runtime",
            DesktopLogCategory::Download => "download",
            DesktopLogCategory::Update => "update",
            DesktopLogCategory::Shutdown => "shutdown",
        }
    }
}

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    match root_dir {
        Some(root) => root.join("logs").join(file_name),
        None => std::env::temp_dir().join("statuswatch").join(file_name),
    }
}

fn rotate_log_if_needed(path: &Path, max_bytes: u64, backup_count: usize) {
    let Ok(metadata) = fs::metadata(path) else {
        return;
    };
    if metadata.len() < max_bytes {
        return;
    }

    for index in (1..backup_count).rev() {
        let from = backup_path(path, index);
        let to = backup_path(path, index + 1);
        if from.exists() {
            let _ = fs::rename(&from, &to);
        }
    }
    let _ = fs::rename(path, backup_path(path, 1));
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Appends one timestamped, category-tagged line to the desktop log,
/// rotating the file once it crosses `max_bytes`. Logging must never
/// take the process down, so every failure here is swallowed.
pub(crate) fn append_desktop_log(
    category: DesktopLogCategory,
    message: &str,
    root_dir: Option<PathBuf>,
    file_name: &str,
    max_bytes: u64,
    backup_count: usize,
    write_lock: &OnceLock<Mutex<()>>,
) {
    let path = resolve_desktop_log_path(root_dir, file_name);
    let lock = write_lock.get_or_init(|| Mutex::new(()));
    let _guard = match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    rotate_log_if_needed(&path, max_bytes, backup_count);

    let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let _ = writeln!(file, "{timestamp} [{}] {message}", category.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_LOG_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    #[test]
    fn append_desktop_log_writes_tagged_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        append_desktop_log(
            DesktopLogCategory::Startup,
            "hello from test",
            Some(dir.path().to_path_buf()),
            "desktop.log",
            1024 * 1024,
            3,
            &TEST_LOG_LOCK,
        );

        let contents =
            fs::read_to_string(dir.path().join("logs").join("desktop.log")).expect("log file");
        assert!(contents.contains("[startup] hello from test"));
    }

    #[test]
    fn append_desktop_log_rotates_when_file_grows_past_limit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Some(dir.path().to_path_buf());

        for index in 0..40 {
            append_desktop_log(
                DesktopLogCategory::Runtime,
                &format!("filler line {index}"),
                root.clone(),
                "desktop.log",
                256,
                3,
                &TEST_LOG_LOCK,
            );
        }

        let logs_dir = dir.path().join("logs");
        assert!(logs_dir.join("desktop.log").exists());
        assert!(logs_dir.join("desktop.log.1").exists());
    }

    #[test]
    fn resolve_desktop_log_path_prefers_root_dir() {
        let path = resolve_desktop_log_path(Some(PathBuf::from("/srv/statuswatch")), "desktop.log");
        assert_eq!(path, PathBuf::from("/srv/statuswatch/logs/desktop.log"));
    }
}
