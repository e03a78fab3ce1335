use tauri_plugin_autostart::ManagerExt;

pub(crate) fn is_enabled(app_handle: &tauri::AppHandle) -> Result<bool, String> {
    app_handle
        .autolaunch()
        .is_enabled()
        .map_err(|error| format!("Failed to read run-at-login state: {error}"))
}

/// Flips the run-at-login registration and returns the new state.
pub(crate) fn toggle(app_handle: &tauri::AppHandle) -> Result<bool, String> {
    let autolaunch = app_handle.autolaunch();
    if is_enabled(app_handle)? {
        autolaunch
            .disable()
            .map_err(|error| format!("Failed to disable run at login: {error}"))?;
        Ok(false)
    } else {
        autolaunch
            .enable()
            .map_err(|error| format!("Failed to enable run at login: {error}"))?;
        Ok(true)
    }
}
