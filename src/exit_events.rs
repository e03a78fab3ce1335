use std::thread;

use tauri::{AppHandle, ExitRequestApi, Manager};

use crate::{append_shutdown_log, ServerState};

/// First exit request is deferred so the server child can be stopped off
/// the main thread; the stored allowance lets the follow-up request pass.
/// The original exit code is carried over to the re-issued exit.
pub(crate) fn handle_exit_requested(
    app_handle: &AppHandle,
    code: Option<i32>,
    api: &ExitRequestApi,
) {
    let state = app_handle.state::<ServerState>();
    if state.take_exit_request_allowance() {
        return;
    }

    api.prevent_exit();
    if !state.try_begin_exit_cleanup() {
        // Cleanup already running; it will re-issue the exit.
        return;
    }

    let app_handle = app_handle.clone();
    thread::spawn(move || {
        append_shutdown_log("stopping server before exit");
        let state = app_handle.state::<ServerState>();
        state.stop_server();
        append_shutdown_log("server stopped");
        state.allow_next_exit_request();
        app_handle.exit(code.unwrap_or(0));
    });
}

/// Final safety net on `RunEvent::Exit`: by now cleanup normally already
/// took the child, so this is a no-op unless the run loop terminated
/// through an unexpected path.
pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    let state = app_handle.state::<ServerState>();
    state.stop_server();
    append_shutdown_log("desktop process exited");
}
