use std::{process::ExitStatus, thread, time::Duration};

use tauri::Manager;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::{
    append_desktop_log, append_shutdown_log, ServerState, APP_NAME, EXIT_WATCH_POLL_INTERVAL_MS,
};

/// Watches the server child and turns an unexpected exit into a blocking
/// error dialog followed by app shutdown. A quit requested through the tray
/// takes the child out of the state first, which ends this thread quietly.
pub(crate) fn spawn_exit_watcher(app_handle: tauri::AppHandle) {
    thread::spawn(move || loop {
        thread::sleep(Duration::from_millis(EXIT_WATCH_POLL_INTERVAL_MS));

        let state = app_handle.state::<ServerState>();
        let exited = {
            let mut guard = match state.child.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            match guard.as_mut() {
                Some(child) => match child.try_wait() {
                    Ok(Some(status)) => {
                        *guard = None;
                        Some(Ok(status))
                    }
                    Ok(None) => None,
                    Err(error) => {
                        *guard = None;
                        Some(Err(format!("failed to poll server process: {error}")))
                    }
                },
                // Child already taken by the shutdown path.
                None => {
                    return;
                }
            }
        };

        let Some(outcome) = exited else {
            continue;
        };

        match outcome {
            Ok(status) => handle_server_exit(&app_handle, status),
            Err(error) => {
                append_desktop_log(&error);
                handle_unexpected_stop(&app_handle, error);
            }
        }
        return;
    });
}

fn handle_server_exit(app_handle: &tauri::AppHandle, status: ExitStatus) {
    let state = app_handle.state::<ServerState>();
    if state.is_quitting() {
        append_shutdown_log(&format!("server exited during shutdown: {status}"));
        return;
    }

    if status.success() {
        append_desktop_log("server exited with code 0; shutting down desktop process");
        state.mark_quitting();
        app_handle.exit(0);
        return;
    }

    let message = exit_dialog_message(status.code(), &state.output_tail_snapshot());
    append_desktop_log(&format!("server exited unexpectedly: {status}"));
    show_blocking_error(app_handle, &message);
    state.mark_quitting();
    app_handle.exit(status.code().unwrap_or(1));
}

fn handle_unexpected_stop(app_handle: &tauri::AppHandle, error: String) {
    let state = app_handle.state::<ServerState>();
    if state.is_quitting() {
        return;
    }
    show_blocking_error(app_handle, &error);
    state.mark_quitting();
    app_handle.exit(1);
}

fn show_blocking_error(app_handle: &tauri::AppHandle, message: &str) {
    app_handle
        .dialog()
        .message(message)
        .title(format!("{APP_NAME} Error"))
        .kind(MessageDialogKind::Error)
        .blocking_show();
}

pub(crate) fn exit_dialog_message(exit_code: Option<i32>, output_tail: &str) -> String {
    let code_text = match exit_code {
        Some(code) => code.to_string(),
        None => "terminated by signal".to_string(),
    };
    let tail = output_tail.trim();
    if tail.is_empty() {
        format!("{APP_NAME} server exited unexpectedly. Exit code: {code_text}")
    } else {
        format!("{APP_NAME} server exited unexpectedly. Exit code: {code_text}\n\n{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::exit_dialog_message;

    #[test]
    fn exit_dialog_message_includes_code_and_output() {
        let message = exit_dialog_message(Some(7), "EADDRINUSE: port 3001 in use\n");
        assert!(message.contains("Exit code: 7"));
        assert!(message.contains("EADDRINUSE"));
    }

    #[test]
    fn exit_dialog_message_handles_signal_exit_and_empty_output() {
        let message = exit_dialog_message(None, "   ");
        assert!(message.contains("terminated by signal"));
        assert!(!message.ends_with('\n'));
    }
}
