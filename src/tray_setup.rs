use tauri::{
    menu::{CheckMenuItem, Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

use crate::{
    append_desktop_log, append_startup_log, autostart_control, browser_open, tray_actions,
    tray_menu_handler, ServerState, TrayMenuState, APP_NAME, TRAY_ID,
};

pub(crate) fn setup_tray(app_handle: &AppHandle) -> Result<(), String> {
    let run_at_login_checked = match autostart_control::is_enabled(app_handle) {
        Ok(enabled) => enabled,
        Err(error) => {
            append_startup_log(&format!("could not read run-at-login state: {error}"));
            false
        }
    };

    let status_item = MenuItem::with_id(
        app_handle,
        "tray_status",
        "Starting…",
        false,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray status item: {error}"))?;
    let open_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_OPEN,
        format!("Open {APP_NAME}"),
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray open menu item: {error}"))?;
    let run_at_login_item = CheckMenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_RUN_AT_LOGIN,
        "Run at login",
        true,
        run_at_login_checked,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray run-at-login menu item: {error}"))?;
    let check_update_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_CHECK_UPDATES,
        "Check for Updates…",
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray update menu item: {error}"))?;
    let visit_repository_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_VISIT_REPOSITORY,
        "Visit Repository…",
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray repository menu item: {error}"))?;
    let about_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_ABOUT,
        format!("About {APP_NAME}"),
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray about menu item: {error}"))?;
    let quit_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_QUIT,
        "Quit",
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray quit menu item: {error}"))?;
    let separator_top = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create tray separator menu item: {error}"))?;
    let separator_middle = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create tray separator menu item: {error}"))?;
    let separator_bottom = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create tray separator menu item: {error}"))?;

    let menu = Menu::with_items(
        app_handle,
        &[
            &status_item,
            &separator_top,
            &open_item,
            &run_at_login_item,
            &separator_middle,
            &check_update_item,
            &visit_repository_item,
            &about_item,
            &separator_bottom,
            &quit_item,
        ],
    )
    .map_err(|error| format!("Failed to build tray menu: {error}"))?;

    if !app_handle.manage(TrayMenuState {
        status_item: status_item.clone(),
        run_at_login_item: run_at_login_item.clone(),
    }) {
        append_desktop_log("tray menu state already exists, skipping manage");
    }

    let tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip(APP_NAME)
        .icon(tauri::include_image!("./icons/tray.png"))
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            tray_menu_handler::handle_tray_menu_event(app, event.id().as_ref())
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::DoubleClick {
                button: MouseButton::Left,
                ..
            } = event
            {
                let app_handle = tray.app_handle();
                let state = app_handle.state::<ServerState>();
                browser_open::open_in_browser(&state.server_url, append_desktop_log);
            }
        });

    #[cfg(target_os = "macos")]
    let tray_builder = tray_builder.icon_as_template(true);

    tray_builder
        .build(app_handle)
        .map_err(|error| format!("Failed to create tray icon: {error}"))?;

    Ok(())
}
