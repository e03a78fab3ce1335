use std::{env, time::Duration};

use semver::Version;
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};

use crate::{
    append_update_log, browser_open, APP_NAME, RELEASES_URL, RELEASE_OWNER, RELEASE_REPO,
    STARTUP_UPDATE_CHECK_ENV,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UpdateCheckOutcome {
    UpToDate { current: Version },
    UpdateAvailable { current: Version, latest: Version },
}

pub(crate) fn startup_check_enabled() -> bool {
    env::var(STARTUP_UPDATE_CHECK_ENV)
        .map(|value| value.trim() != "0")
        .unwrap_or(true)
}

pub(crate) fn parse_release_version(tag: &str) -> Option<Version> {
    let trimmed = tag.trim();
    let stripped = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(stripped).ok()
}

pub(crate) fn compare_versions(current: Version, latest: Version) -> UpdateCheckOutcome {
    if latest > current {
        UpdateCheckOutcome::UpdateAvailable { current, latest }
    } else {
        UpdateCheckOutcome::UpToDate { current }
    }
}

fn build_release_client() -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(format!("statuswatch-desktop/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|error| format!("Failed to build update check client: {error}"))
}

async fn latest_release_tag(client: &reqwest::Client) -> Result<String, String> {
    let url = format!(
        "https://api.github.com/repos/{RELEASE_OWNER}/{RELEASE_REPO}/releases/latest"
    );
    let response = client
        .get(&url)
        .header("Accept", "application/vnd.github+json")
        .send()
        .await
        .map_err(|error| format!("release request failed: {error}"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("release endpoint returned http status {status}"));
    }

    let body = response
        .text()
        .await
        .map_err(|error| format!("failed to read release response: {error}"))?;
    let root: serde_json::Value = serde_json::from_str(&body)
        .map_err(|error| format!("release json parse failed: {error}"))?;
    let tag = root
        .get("tag_name")
        .and_then(|value| value.as_str())
        .unwrap_or("")
        .trim();
    if tag.is_empty() {
        return Err("release response is missing tag_name".to_string());
    }
    Ok(tag.to_string())
}

async fn check_for_update() -> Result<UpdateCheckOutcome, String> {
    let current = Version::parse(env!("CARGO_PKG_VERSION"))
        .map_err(|error| format!("invalid build version: {error}"))?;
    let client = build_release_client()?;
    let tag = latest_release_tag(&client).await?;
    let latest = parse_release_version(&tag)
        .ok_or_else(|| format!("release tag is not a version: {tag}"))?;
    Ok(compare_versions(current, latest))
}

fn prompt_open_releases(app_handle: &tauri::AppHandle, latest: &Version, current: &Version) {
    let should_open = app_handle
        .dialog()
        .message(format!(
            "A new version {latest} is available (you have {current}).\nOpen the releases page?"
        ))
        .title(format!("{APP_NAME} Update"))
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::YesNo)
        .blocking_show();

    if should_open {
        browser_open::open_in_browser(RELEASES_URL, append_update_log);
    } else {
        append_update_log("user deferred opening the releases page");
    }
}

/// Menu-driven check: every outcome, including failure, gets a dialog.
pub(crate) async fn run_interactive_check(app_handle: tauri::AppHandle) {
    append_update_log("manual update check requested");
    match check_for_update().await {
        Ok(UpdateCheckOutcome::UpdateAvailable { current, latest }) => {
            append_update_log(&format!(
                "update available: current={current} latest={latest}"
            ));
            prompt_open_releases(&app_handle, &latest, &current);
        }
        Ok(UpdateCheckOutcome::UpToDate { current }) => {
            append_update_log(&format!("up to date: current={current}"));
            app_handle
                .dialog()
                .message(format!("{APP_NAME} {current} is up to date."))
                .title(format!("{APP_NAME} Update"))
                .kind(MessageDialogKind::Info)
                .blocking_show();
        }
        Err(error) => {
            append_update_log(&format!("manual update check failed: {error}"));
            app_handle
                .dialog()
                .message(format!("Could not check for updates: {error}"))
                .title(format!("{APP_NAME} Update"))
                .kind(MessageDialogKind::Warning)
                .blocking_show();
        }
    }
}

/// Startup check: silent unless an update actually exists. A missing
/// release or an offline machine is normal here and only hits the log.
pub(crate) fn spawn_startup_check(app_handle: tauri::AppHandle) {
    tauri::async_runtime::spawn(async move {
        match check_for_update().await {
            Ok(UpdateCheckOutcome::UpdateAvailable { current, latest }) => {
                append_update_log(&format!(
                    "startup check found update: current={current} latest={latest}"
                ));
                prompt_open_releases(&app_handle, &latest, &current);
            }
            Ok(UpdateCheckOutcome::UpToDate { current }) => {
                append_update_log(&format!("startup check: up to date (current={current})"));
            }
            Err(error) => {
                append_update_log(&format!("startup check failed (silent): {error}"));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_release_version_accepts_v_prefixed_tags() {
        assert_eq!(
            parse_release_version("v1.4.2"),
            Some(Version::new(1, 4, 2))
        );
        assert_eq!(parse_release_version("2.0.0"), Some(Version::new(2, 0, 0)));
        assert_eq!(parse_release_version("nightly"), None);
    }

    #[test]
    fn compare_versions_flags_only_newer_releases() {
        let current = Version::new(1, 4, 2);
        assert_eq!(
            compare_versions(current.clone(), Version::new(1, 5, 0)),
            UpdateCheckOutcome::UpdateAvailable {
                current: current.clone(),
                latest: Version::new(1, 5, 0),
            }
        );
        assert_eq!(
            compare_versions(current.clone(), Version::new(1, 4, 2)),
            UpdateCheckOutcome::UpToDate {
                current: current.clone()
            }
        );
        assert_eq!(
            compare_versions(current.clone(), Version::new(1, 0, 0)),
            UpdateCheckOutcome::UpToDate { current }
        );
    }
}
