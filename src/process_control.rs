use std::process::Child;

/// Stops the server process tree. Windows needs `taskkill /t` so that the
/// node child does not orphan its own workers; elsewhere a plain kill is
/// enough because the server runs in its own process group.
pub(crate) fn stop_child_process(child: &mut Child) {
    #[cfg(target_os = "windows")]
    {
        use std::process::{Command, Stdio};

        let _ = Command::new("taskkill")
            .args(["/pid", &child.id().to_string(), "/t", "/f"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        let _ = child.wait();
        return;
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = child.kill();
        let _ = child.wait();
    }
}
