use tauri::{menu::MenuItem, AppHandle, Manager};

use crate::{tray_actions, TrayMenuState};

fn set_menu_text_safe<F>(item: &MenuItem<tauri::Wry>, text: &str, item_name: &str, log: F)
where
    F: Fn(&str),
{
    if let Err(error) = item.set_text(text) {
        log(&format!(
            "failed to update tray menu text for {item_name}: {error}"
        ));
    }
}

/// Updates the disabled status line at the top of the tray menu.
pub(crate) fn set_status_text<F>(app_handle: &AppHandle, text: &str, log: F)
where
    F: Fn(&str),
{
    let Some(tray_state) = app_handle.try_state::<TrayMenuState>() else {
        return;
    };
    set_menu_text_safe(&tray_state.status_item, text, "status line", log);
}

/// Keeps the run-at-login check mark in sync with the actual registration.
pub(crate) fn set_run_at_login_checked<F>(app_handle: &AppHandle, checked: bool, log: F)
where
    F: Fn(&str),
{
    let Some(tray_state) = app_handle.try_state::<TrayMenuState>() else {
        return;
    };
    if let Err(error) = tray_state.run_at_login_item.set_checked(checked) {
        log(&format!(
            "failed to update check state for {}: {error}",
            tray_actions::TRAY_MENU_RUN_AT_LOGIN
        ));
    }
}
