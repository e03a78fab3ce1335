use std::{
    fs::{self, OpenOptions},
    io::{BufRead, BufReader, Write},
    process::{Command, Stdio},
    sync::{Arc, Mutex},
    thread,
};

use tauri::Manager;

use crate::{
    append_desktop_log, build_debug_command, runtime_paths, AtomicFlagGuard, LaunchPlan,
    ServerState, SERVER_OUTPUT_TAIL_MAX_BYTES,
};

/// Spawns the server child, wires its output into `logs/server.log` and the
/// in-memory tail buffer, and stores the handle in [`ServerState`].
pub(crate) fn start_server_process(
    app_handle: &tauri::AppHandle,
    plan: &LaunchPlan,
) -> Result<(), String> {
    let state = app_handle.state::<ServerState>();
    let _spawn_guard = AtomicFlagGuard::try_set(&state.is_spawning)
        .ok_or_else(|| "Server start already in progress.".to_string())?;

    {
        let guard = state
            .child
            .lock()
            .map_err(|_| "Server process lock poisoned.".to_string())?;
        if guard.is_some() {
            return Err("Server process is already running.".to_string());
        }
    }

    if !plan.cwd.exists() {
        fs::create_dir_all(&plan.cwd).map_err(|error| {
            format!("Failed to create server cwd {}: {}", plan.cwd.display(), error)
        })?;
    }
    if let Some(root_dir) = &plan.root_dir {
        let data_dir = runtime_paths::data_dir(root_dir);
        fs::create_dir_all(&data_dir).map_err(|error| {
            format!(
                "Failed to create data directory {}: {}",
                data_dir.display(),
                error
            )
        })?;
    }

    let mut command = Command::new(&plan.cmd);
    command
        .args(&plan.args)
        .current_dir(&plan.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped());
    if plan.packaged_mode {
        command.env("NODE_ENV", "production");
    }

    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        command.creation_flags(crate::CREATE_NO_WINDOW | crate::CREATE_NEW_PROCESS_GROUP);
    }

    // stderr goes straight to the log file; stdout is teed through the
    // reader thread so the exit dialog can show the last output.
    let log_file = open_server_log(plan)?;
    match log_file.as_ref().map(|file| file.try_clone()) {
        Some(Ok(stderr_file)) => {
            command.stderr(Stdio::from(stderr_file));
        }
        Some(Err(error)) => {
            append_desktop_log(&format!("failed to clone server log handle: {error}"));
            command.stderr(Stdio::null());
        }
        None => {
            command.stderr(Stdio::null());
        }
    }

    let mut child = command.spawn().map_err(|error| {
        format!(
            "Failed to spawn server process with command {:?}: {}",
            build_debug_command(plan),
            error
        )
    })?;

    if let Some(stdout) = child.stdout.take() {
        spawn_output_reader(stdout, log_file, Arc::clone(&state.output_tail));
    }

    *state
        .child
        .lock()
        .map_err(|_| "Server process lock poisoned.".to_string())? = Some(child);
    append_desktop_log(&format!(
        "server process started: {:?}",
        build_debug_command(plan)
    ));
    Ok(())
}

fn open_server_log(plan: &LaunchPlan) -> Result<Option<std::fs::File>, String> {
    let Some(root_dir) = &plan.root_dir else {
        return Ok(None);
    };
    let log_path = runtime_paths::server_log_path(root_dir);
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            format!(
                "Failed to create server log directory {}: {}",
                parent.display(),
                error
            )
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|error| format!("Failed to open server log {}: {}", log_path.display(), error))?;
    Ok(Some(file))
}

fn spawn_output_reader(
    stdout: std::process::ChildStdout,
    log_file: Option<std::fs::File>,
    tail: Arc<Mutex<String>>,
) {
    thread::spawn(move || {
        let mut log_file = log_file;
        let reader = BufReader::new(stdout);
        for line in reader.lines() {
            let Ok(line) = line else {
                break;
            };
            if let Some(file) = log_file.as_mut() {
                let _ = writeln!(file, "{line}");
            }
            push_output_tail(&tail, &line, SERVER_OUTPUT_TAIL_MAX_BYTES);
        }
    });
}

/// Appends a line to the bounded tail buffer, trimming from the front on a
/// char boundary once the buffer exceeds `max_bytes`.
fn push_output_tail(tail: &Mutex<String>, line: &str, max_bytes: usize) {
    let mut guard = match tail.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    guard.push_str(line);
    guard.push('\n');

    if guard.len() > max_bytes {
        let mut cut = guard.len() - max_bytes;
        while cut < guard.len() && !guard.is_char_boundary(cut) {
            cut += 1;
        }
        guard.drain(..cut);
    }
}

#[cfg(test)]
mod tests {
    use super::push_output_tail;
    use std::sync::Mutex;

    #[test]
    fn push_output_tail_keeps_recent_lines() {
        let tail = Mutex::new(String::new());
        push_output_tail(&tail, "first", 64);
        push_output_tail(&tail, "second", 64);

        let snapshot = tail.lock().expect("tail lock").clone();
        assert_eq!(snapshot, "first\nsecond\n");
    }

    #[test]
    fn push_output_tail_trims_old_output_past_the_limit() {
        let tail = Mutex::new(String::new());
        for index in 0..100 {
            push_output_tail(&tail, &format!("line {index}"), 32);
        }

        let snapshot = tail.lock().expect("tail lock").clone();
        assert!(snapshot.len() <= 32);
        assert!(snapshot.contains("line 99"));
        assert!(!snapshot.contains("line 0\n"));
    }

    #[test]
    fn push_output_tail_trims_on_char_boundaries() {
        let tail = Mutex::new(String::new());
        push_output_tail(&tail, "日本語のログ出力テスト", 16);
        let snapshot = tail.lock().expect("tail lock").clone();
        assert!(snapshot.len() <= 16);
        // A cut inside a multi-byte char would have panicked in drain.
        assert!(std::str::from_utf8(snapshot.as_bytes()).is_ok());
    }
}
