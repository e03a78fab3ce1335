use std::{
    env,
    net::{TcpStream, ToSocketAddrs},
    thread,
    time::{Duration, Instant},
};

use tauri::Manager;

use crate::{
    server_url, ServerState, DEFAULT_SERVER_TIMEOUT_MS, SERVER_PING_TIMEOUT_MS,
    SERVER_READY_POLL_INTERVAL_MS, SERVER_TIMEOUT_ENV,
};

pub(crate) fn ping_server(server_url: &str, timeout_ms: u64) -> bool {
    let Some((host, port)) = server_url::server_host_port(server_url) else {
        return false;
    };
    let timeout = Duration::from_millis(timeout_ms.max(50));

    let addrs = match (host.as_str(), port).to_socket_addrs() {
        Ok(addrs) => addrs.collect::<Vec<_>>(),
        Err(_) => return false,
    };
    addrs
        .iter()
        .any(|address| TcpStream::connect_timeout(address, timeout).is_ok())
}

pub(crate) fn resolve_server_timeout() -> Option<Duration> {
    let timeout_ms = env::var(SERVER_TIMEOUT_ENV)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_SERVER_TIMEOUT_MS);

    // 0 disables the deadline.
    (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms))
}

/// Polls the server port until it answers, the child disappears, or the
/// timeout passes. The exit watcher owns crash reporting; this loop only
/// reports reachability.
pub(crate) fn wait_for_server<F>(
    app_handle: &tauri::AppHandle,
    timeout: Option<Duration>,
    log: F,
) -> Result<(), String>
where
    F: Fn(&str),
{
    let state = app_handle.state::<ServerState>();
    let started = Instant::now();

    loop {
        if ping_server(&state.server_url, SERVER_PING_TIMEOUT_MS) {
            log(&format!(
                "server reachable at {} after {}ms",
                state.server_url,
                started.elapsed().as_millis()
            ));
            return Ok(());
        }

        let child_present = match state.child.lock() {
            Ok(guard) => guard.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        };
        if !child_present {
            return Err("Server process is no longer running.".to_string());
        }

        if let Some(limit) = timeout {
            if started.elapsed() >= limit {
                return Err(format!(
                    "Timed out after {}ms waiting for the server to respond.",
                    limit.as_millis()
                ));
            }
        }

        thread::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn ping_server_rejects_unparseable_urls() {
        assert!(!ping_server("definitely not a url", 100));
    }

    #[test]
    fn ping_server_reaches_a_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        assert!(ping_server(&format!("http://127.0.0.1:{port}/"), 500));
    }

    #[test]
    fn ping_server_fails_fast_on_a_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);
        assert!(!ping_server(&format!("http://127.0.0.1:{port}/"), 200));
    }
}
