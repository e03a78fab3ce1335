use serde::Deserialize;
use std::{
    env,
    path::PathBuf,
    process::Child,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};
use tauri::menu::{CheckMenuItem, MenuItem};

use crate::{
    append_desktop_log, exit_state, process_control, server_url, DEFAULT_SERVER_URL,
    SERVER_URL_ENV,
};

/// Menu items the app mutates after the tray is built: the status line text
/// and the run-at-login check mark.
#[derive(Clone)]
pub(crate) struct TrayMenuState {
    pub(crate) status_item: MenuItem<tauri::Wry>,
    pub(crate) run_at_login_item: CheckMenuItem<tauri::Wry>,
}

/// Optional `runtime-manifest.json` dropped next to the installed runtime.
/// Every field falls back to the packaged defaults.
#[derive(Debug, Deserialize)]
pub(crate) struct RuntimeManifest {
    pub(crate) node: Option<String>,
    pub(crate) entrypoint: Option<String>,
    pub(crate) extra_args: Option<String>,
}

#[derive(Debug)]
pub(crate) struct LaunchPlan {
    pub(crate) cmd: String,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: PathBuf,
    pub(crate) root_dir: Option<PathBuf>,
    pub(crate) packaged_mode: bool,
}

#[derive(Debug)]
pub(crate) struct ServerState {
    pub(crate) child: Mutex<Option<Child>>,
    pub(crate) server_url: String,
    pub(crate) output_tail: Arc<Mutex<String>>,
    pub(crate) exit_state: Mutex<exit_state::ExitStateMachine>,
    pub(crate) is_spawning: AtomicBool,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            child: Mutex::new(None),
            server_url: server_url::normalize_server_url(
                &env::var(SERVER_URL_ENV).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string()),
                DEFAULT_SERVER_URL,
            ),
            output_tail: Arc::new(Mutex::new(String::new())),
            exit_state: Mutex::new(exit_state::ExitStateMachine::default()),
            is_spawning: AtomicBool::new(false),
        }
    }
}

impl ServerState {
    pub(crate) fn mark_quitting(&self) {
        match self.exit_state.lock() {
            Ok(mut guard) => guard.mark_quitting(),
            Err(error) => {
                append_desktop_log(&format!(
                    "exit state lock poisoned when marking quitting: {error}"
                ));
                error.into_inner().mark_quitting();
            }
        }
    }

    pub(crate) fn is_quitting(&self) -> bool {
        match self.exit_state.lock() {
            Ok(guard) => guard.is_quitting(),
            Err(error) => {
                append_desktop_log(&format!(
                    "exit state lock poisoned when reading quitting state: {error}"
                ));
                error.into_inner().is_quitting()
            }
        }
    }

    pub(crate) fn try_begin_exit_cleanup(&self) -> bool {
        match self.exit_state.lock() {
            Ok(mut guard) => guard.try_begin_cleanup(),
            Err(error) => {
                append_desktop_log(&format!(
                    "exit state lock poisoned when beginning cleanup: {error}"
                ));
                error.into_inner().try_begin_cleanup()
            }
        }
    }

    pub(crate) fn allow_next_exit_request(&self) {
        match self.exit_state.lock() {
            Ok(mut guard) => guard.allow_next_exit_request(),
            Err(error) => {
                append_desktop_log(&format!(
                    "exit state lock poisoned when allowing next exit request: {error}"
                ));
                error.into_inner().allow_next_exit_request();
            }
        }
    }

    pub(crate) fn take_exit_request_allowance(&self) -> bool {
        match self.exit_state.lock() {
            Ok(mut guard) => guard.take_exit_request_allowance(),
            Err(error) => {
                append_desktop_log(&format!(
                    "exit state lock poisoned when taking exit request allowance: {error}"
                ));
                error.into_inner().take_exit_request_allowance()
            }
        }
    }

    pub(crate) fn output_tail_snapshot(&self) -> String {
        match self.output_tail.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Takes the child handle out of the state and stops it.
    pub(crate) fn stop_server(&self) {
        let mut child = match self.child.lock() {
            Ok(mut guard) => guard.take(),
            Err(error) => {
                append_desktop_log(&format!(
                    "server child lock poisoned when stopping server: {error}"
                ));
                error.into_inner().take()
            }
        };
        if let Some(process) = child.as_mut() {
            process_control::stop_child_process(process);
        }
    }
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}
