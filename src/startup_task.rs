use std::thread;

use tauri::Manager;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::{
    append_desktop_log, append_download_log, append_startup_log, download_install, install_check,
    launch_plan, runtime_paths, server_exit_watch, server_launch, server_readiness, tray_labels,
    ServerState, APP_NAME,
};

/// First-run and every-run startup flow: complete the installation if the
/// layout check fails, then launch the server and wait for it to answer.
pub(crate) fn spawn_startup_task(app_handle: tauri::AppHandle) {
    thread::spawn(move || {
        let Some(root) = runtime_paths::default_root_dir() else {
            fail_startup(
                &app_handle,
                "Could not resolve a home directory for the installation root.",
            );
            return;
        };

        let missing = install_check::missing_components(&root);
        if !missing.is_empty() {
            append_download_log(&format!(
                "installation incomplete under {}: missing {}",
                root.display(),
                missing.join(", ")
            ));
            let progress_handle = app_handle.clone();
            let progress = move |message: &str| {
                append_download_log(message);
                tray_labels::set_status_text(&progress_handle, message, append_desktop_log);
            };
            if let Err(error) = download_install::install_missing(&root, progress) {
                fail_startup(&app_handle, &format!("Download failed: {error}"));
                return;
            }
            append_download_log("installation completed");
        }

        tray_labels::set_status_text(&app_handle, "Starting server…", append_desktop_log);
        let plan = match launch_plan::resolve_launch_plan(&root) {
            Ok(plan) => plan,
            Err(error) => {
                fail_startup(&app_handle, &format!("Startup failed: {error}"));
                return;
            }
        };

        if let Err(error) = server_launch::start_server_process(&app_handle, &plan) {
            fail_startup(&app_handle, &format!("Startup failed: {error}"));
            return;
        }
        server_exit_watch::spawn_exit_watcher(app_handle.clone());

        let timeout = server_readiness::resolve_server_timeout();
        match server_readiness::wait_for_server(&app_handle, timeout, append_startup_log) {
            Ok(()) => {
                let state = app_handle.state::<ServerState>();
                tray_labels::set_status_text(
                    &app_handle,
                    &format!("Running at {}", state.server_url),
                    append_desktop_log,
                );
            }
            Err(error) => {
                // The exit watcher reports crashes; a slow server only
                // degrades the status line.
                append_startup_log(&format!("server readiness wait ended: {error}"));
                tray_labels::set_status_text(
                    &app_handle,
                    "Server not responding",
                    append_desktop_log,
                );
            }
        }
    });
}

fn fail_startup(app_handle: &tauri::AppHandle, message: &str) {
    append_startup_log(message);
    tray_labels::set_status_text(app_handle, "Startup failed", append_desktop_log);
    app_handle
        .dialog()
        .message(message)
        .title(format!("{APP_NAME} Error"))
        .kind(MessageDialogKind::Error)
        .blocking_show();

    let state = app_handle.state::<ServerState>();
    state.mark_quitting();
    app_handle.exit(1);
}
