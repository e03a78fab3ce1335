use url::Url;

pub(crate) fn normalize_server_url(raw: &str, default_url: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default_url.to_string();
    }

    match Url::parse(trimmed) {
        Ok(mut parsed) => {
            if parsed.path().is_empty() {
                parsed.set_path("/");
            }
            parsed.to_string()
        }
        Err(_) => default_url.to_string(),
    }
}

/// Host/port pair used by the TCP readiness probe.
pub(crate) fn server_host_port(server_url: &str) -> Option<(String, u16)> {
    let parsed = Url::parse(server_url).ok()?;
    let host = parsed.host_str()?.to_string();
    let port = parsed.port_or_known_default()?;
    Some((host, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_SERVER_URL;

    #[test]
    fn normalize_server_url_keeps_valid_urls() {
        assert_eq!(
            normalize_server_url("http://localhost:3001", DEFAULT_SERVER_URL),
            "http://localhost:3001/"
        );
    }

    #[test]
    fn normalize_server_url_falls_back_on_garbage() {
        assert_eq!(
            normalize_server_url("not a url", DEFAULT_SERVER_URL),
            DEFAULT_SERVER_URL
        );
        assert_eq!(normalize_server_url("   ", DEFAULT_SERVER_URL), DEFAULT_SERVER_URL);
    }

    #[test]
    fn server_host_port_extracts_explicit_and_default_ports() {
        assert_eq!(
            server_host_port("http://localhost:3001/"),
            Some(("localhost".to_string(), 3001))
        );
        assert_eq!(
            server_host_port("https://status.example.com/"),
            Some(("status.example.com".to_string(), 443))
        );
        assert_eq!(server_host_port("nonsense"), None);
    }
}
