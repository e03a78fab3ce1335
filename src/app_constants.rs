use std::sync::{Mutex, OnceLock};

pub(crate) const APP_NAME: &str = "StatusWatch";

pub(crate) const DEFAULT_SERVER_URL: &str = "http://localhost:3001/";
pub(crate) const SERVER_URL_ENV: &str = "STATUSWATCH_SERVER_URL";
pub(crate) const ROOT_ENV: &str = "STATUSWATCH_ROOT";
pub(crate) const SERVER_CMD_ENV: &str = "STATUSWATCH_SERVER_CMD";
pub(crate) const SERVER_CWD_ENV: &str = "STATUSWATCH_SERVER_CWD";
pub(crate) const SERVER_TIMEOUT_ENV: &str = "STATUSWATCH_SERVER_TIMEOUT_MS";
pub(crate) const STARTUP_UPDATE_CHECK_ENV: &str = "STATUSWATCH_STARTUP_UPDATE_CHECK";
pub(crate) const NODE_ARCHIVE_URL_ENV: &str = "STATUSWATCH_NODE_ARCHIVE_URL";
pub(crate) const APP_ARCHIVE_URL_ENV: &str = "STATUSWATCH_APP_ARCHIVE_URL";

#[cfg(target_os = "windows")]
pub(crate) const DEFAULT_NODE_ARCHIVE_URL: &str =
    "https://github.com/statuswatch/statuswatch/releases/latest/download/node-runtime-win-x64.zip";
#[cfg(target_os = "macos")]
pub(crate) const DEFAULT_NODE_ARCHIVE_URL: &str =
    "https://github.com/statuswatch/statuswatch/releases/latest/download/node-runtime-darwin-x64.zip";
#[cfg(all(unix, not(target_os = "macos")))]
pub(crate) const DEFAULT_NODE_ARCHIVE_URL: &str =
    "https://github.com/statuswatch/statuswatch/releases/latest/download/node-runtime-linux-x64.zip";

pub(crate) const DEFAULT_APP_ARCHIVE_URL: &str =
    "https://github.com/statuswatch/statuswatch/releases/latest/download/statuswatch-core.zip";

pub(crate) const REPO_URL: &str = "https://github.com/statuswatch/statuswatch-desktop";
pub(crate) const RELEASES_URL: &str = "https://github.com/statuswatch/statuswatch-desktop/releases";
pub(crate) const RELEASE_OWNER: &str = "statuswatch";
pub(crate) const RELEASE_REPO: &str = "statuswatch-desktop";

pub(crate) const RUNTIME_MANIFEST_FILE: &str = "runtime-manifest.json";
pub(crate) const DEFAULT_SERVER_ENTRYPOINT: &str = "server/server.js";
pub(crate) const SERVER_DATA_DIR_ARG: &str = "--data-dir=../data/";

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const SERVER_LOG_FILE: &str = "server.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub(crate) const LOG_BACKUP_COUNT: usize = 5;
pub(crate) const SERVER_OUTPUT_TAIL_MAX_BYTES: usize = 8 * 1024;

pub(crate) const DEFAULT_SERVER_TIMEOUT_MS: u64 = 60_000;
pub(crate) const SERVER_READY_POLL_INTERVAL_MS: u64 = 600;
pub(crate) const SERVER_PING_TIMEOUT_MS: u64 = 800;
pub(crate) const EXIT_WATCH_POLL_INTERVAL_MS: u64 = 500;

pub(crate) const TRAY_ID: &str = "statuswatch-tray";

#[cfg(target_os = "windows")]
pub(crate) const CREATE_NO_WINDOW: u32 = 0x0800_0000;
#[cfg(target_os = "windows")]
pub(crate) const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

pub(crate) static DESKTOP_LOG_WRITE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
