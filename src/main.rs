#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_helpers;
mod app_runtime;
mod app_types;
mod autostart_control;
mod browser_open;
mod download_install;
mod exit_events;
mod exit_state;
mod install_check;
mod launch_plan;
mod logging;
mod process_control;
mod runtime_paths;
mod server_exit_watch;
mod server_launch;
mod server_readiness;
mod server_url;
mod startup_task;
mod tray_actions;
mod tray_labels;
mod tray_menu_handler;
mod tray_setup;
mod update_check;

pub(crate) use app_constants::*;
pub(crate) use app_helpers::{
    append_desktop_log, append_download_log, append_shutdown_log, append_startup_log,
    append_update_log, build_debug_command,
};
pub(crate) use app_types::{
    AtomicFlagGuard, LaunchPlan, RuntimeManifest, ServerState, TrayMenuState,
};

fn main() {
    app_runtime::run();
}
