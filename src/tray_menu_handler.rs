use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::{
    append_desktop_log, append_shutdown_log, autostart_control, browser_open, tray_actions,
    tray_labels, update_check, ServerState, APP_NAME, REPO_URL,
};

pub(crate) fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match tray_actions::action_from_menu_id(menu_id) {
        Some(tray_actions::TrayMenuAction::OpenDashboard) => {
            let state = app_handle.state::<ServerState>();
            browser_open::open_in_browser(&state.server_url, append_desktop_log);
        }
        Some(tray_actions::TrayMenuAction::ToggleRunAtLogin) => {
            handle_run_at_login_toggle(app_handle);
        }
        Some(tray_actions::TrayMenuAction::CheckForUpdates) => {
            let app_handle_cloned = app_handle.clone();
            tauri::async_runtime::spawn(async move {
                update_check::run_interactive_check(app_handle_cloned).await;
            });
        }
        Some(tray_actions::TrayMenuAction::VisitRepository) => {
            browser_open::open_in_browser(REPO_URL, append_desktop_log);
        }
        Some(tray_actions::TrayMenuAction::About) => {
            let app_handle_cloned = app_handle.clone();
            tauri::async_runtime::spawn(async move {
                app_handle_cloned
                    .dialog()
                    .message(about_message())
                    .title(format!("About {APP_NAME}"))
                    .kind(MessageDialogKind::Info)
                    .blocking_show();
            });
        }
        Some(tray_actions::TrayMenuAction::Quit) => {
            let state = app_handle.state::<ServerState>();
            state.mark_quitting();
            append_shutdown_log("tray quit requested, exiting desktop process");
            app_handle.exit(0);
        }
        None => {}
    }
}

fn handle_run_at_login_toggle(app_handle: &AppHandle) {
    match autostart_control::toggle(app_handle) {
        Ok(enabled) => {
            append_desktop_log(&format!(
                "run at login {}",
                if enabled { "enabled" } else { "disabled" }
            ));
            tray_labels::set_run_at_login_checked(app_handle, enabled, append_desktop_log);
        }
        Err(error) => {
            append_desktop_log(&format!("run at login toggle failed: {error}"));
            // The check item already flipped visually; put it back in sync
            // with whatever the platform actually has registered.
            let actual = autostart_control::is_enabled(app_handle).unwrap_or(false);
            tray_labels::set_run_at_login_checked(app_handle, actual, append_desktop_log);

            let app_handle_cloned = app_handle.clone();
            tauri::async_runtime::spawn(async move {
                app_handle_cloned
                    .dialog()
                    .message(format!("Unable to change the run-at-login setting.\n{error}"))
                    .title(format!("{APP_NAME} Error"))
                    .kind(MessageDialogKind::Error)
                    .blocking_show();
            });
        }
    }
}

pub(crate) fn about_message() -> String {
    format!(
        "{APP_NAME} Desktop v{}\n© 2026 the {APP_NAME} contributors",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::about_message;

    #[test]
    fn about_message_carries_the_build_version() {
        let message = about_message();
        assert!(message.contains(env!("CARGO_PKG_VERSION")));
        assert!(message.contains("StatusWatch"));
    }
}
