use crate::{
    logging, runtime_paths, LaunchPlan, DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES,
    DESKTOP_LOG_WRITE_LOCK, LOG_BACKUP_COUNT,
};

pub(crate) fn append_desktop_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Runtime, message);
}

pub(crate) fn append_startup_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Startup, message);
}

pub(crate) fn append_download_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Download, message);
}

pub(crate) fn append_update_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Update, message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Shutdown, message);
}

fn append_desktop_log_with_category(category: logging::DesktopLogCategory, message: &str) {
    logging::append_desktop_log(
        category,
        message,
        runtime_paths::default_root_dir(),
        DESKTOP_LOG_FILE,
        DESKTOP_LOG_MAX_BYTES,
        LOG_BACKUP_COUNT,
        &DESKTOP_LOG_WRITE_LOCK,
    )
}

pub(crate) fn build_debug_command(plan: &LaunchPlan) -> Vec<String> {
    let mut parts = vec![plan.cmd.clone()];
    parts.extend(plan.args.clone());
    parts
}
