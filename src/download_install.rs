use std::{
    env,
    io::Cursor,
    path::{Component, Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::{
    install_check, APP_ARCHIVE_URL_ENV, DEFAULT_APP_ARCHIVE_URL, DEFAULT_NODE_ARCHIVE_URL,
    NODE_ARCHIVE_URL_ENV,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArchiveSpec {
    pub(crate) name: &'static str,
    pub(crate) url: String,
    pub(crate) dest: &'static str,
}

fn now_unix_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or(0)
}

fn archive_url(env_key: &str, default_url: &str) -> String {
    env::var(env_key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default_url.to_string())
}

/// Maps missing installation components onto the archives that provide
/// them: the `node` directory comes from the runtime archive, everything
/// under `core` from the application archive.
pub(crate) fn plan_downloads(missing: &[&str]) -> Vec<ArchiveSpec> {
    let mut specs = Vec::new();
    if missing.contains(&"node") {
        specs.push(ArchiveSpec {
            name: "Node.js runtime",
            url: archive_url(NODE_ARCHIVE_URL_ENV, DEFAULT_NODE_ARCHIVE_URL),
            dest: "node",
        });
    }
    if missing
        .iter()
        .any(|component| *component == "core" || component.starts_with("core/"))
    {
        specs.push(ArchiveSpec {
            name: "application",
            url: archive_url(APP_ARCHIVE_URL_ENV, DEFAULT_APP_ARCHIVE_URL),
            dest: "core",
        });
    }
    specs
}

fn build_download_client() -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .user_agent(format!(
            "statuswatch-desktop/{}",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .map_err(|error| format!("Failed to build download client: {error}"))
}

fn download_archive(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, String> {
    let client = client.clone();
    let url = url.to_string();
    tauri::async_runtime::block_on(async move {
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|error| format!("Download request failed for {url}: {error}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Download of {url} returned http status {status}"));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|error| format!("Failed to read download body for {url}: {error}"))?;
        Ok(bytes.to_vec())
    })
}

/// Extracts a zip archive into `dst_dir`, refusing entries that would
/// escape it, and returns the archive's single root directory.
pub(crate) fn extract_zip_archive(zip_bytes: &[u8], dst_dir: &Path) -> Result<PathBuf, String> {
    std::fs::create_dir_all(dst_dir)
        .map_err(|error| format!("failed to create {}: {error}", dst_dir.display()))?;

    let mut archive = zip::ZipArchive::new(Cursor::new(zip_bytes))
        .map_err(|error| format!("failed to open zip archive: {error}"))?;

    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|error| format!("failed to read zip entry: {error}"))?;
        let name = file.name().replace('\\', "/");
        if name.is_empty() {
            continue;
        }

        let rel = Path::new(&name);
        if rel.is_absolute() {
            return Err("invalid zip entry path (absolute)".to_string());
        }
        for component in rel.components() {
            match component {
                Component::CurDir | Component::Normal(_) => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(format!("invalid zip entry path: {name}"));
                }
            }
        }

        let out_path = dst_dir.join(rel);
        if file.is_dir() {
            std::fs::create_dir_all(&out_path)
                .map_err(|error| format!("failed to create {}: {error}", out_path.display()))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|error| format!("failed to create {}: {error}", parent.display()))?;
        }

        let mut out_file = std::fs::File::create(&out_path)
            .map_err(|error| format!("failed to create {}: {error}", out_path.display()))?;
        std::io::copy(&mut file, &mut out_file)
            .map_err(|error| format!("failed to write {}: {error}", out_path.display()))?;
    }

    let mut top_dirs = Vec::new();
    let mut top_files = 0_usize;
    let entries = std::fs::read_dir(dst_dir)
        .map_err(|error| format!("failed to read dir {}: {error}", dst_dir.display()))?;
    for entry in entries {
        let entry = entry
            .map_err(|error| format!("failed to read dir entry {}: {error}", dst_dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            top_dirs.push(path);
        } else {
            top_files += 1;
        }
    }

    if top_dirs.len() != 1 || top_files != 0 {
        return Err(format!(
            "expected a single root directory in archive (dirs={}, files={top_files})",
            top_dirs.len()
        ));
    }

    Ok(top_dirs.remove(0))
}

fn remove_path_if_exists(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    if path.is_dir() {
        std::fs::remove_dir_all(path)
            .map_err(|error| format!("failed to remove {}: {error}", path.display()))?;
        return Ok(());
    }
    std::fs::remove_file(path)
        .map_err(|error| format!("failed to remove {}: {error}", path.display()))
}

/// Extracts downloaded bytes into a staging directory under the root, then
/// activates the result with a rename swap so a failed install never leaves
/// a half-written `node/` or `core/` behind.
pub(crate) fn install_archive_bytes(
    root: &Path,
    dest: &str,
    zip_bytes: &[u8],
) -> Result<(), String> {
    std::fs::create_dir_all(root)
        .map_err(|error| format!("failed to create {}: {error}", root.display()))?;

    let nonce = now_unix_nanos();
    let staging = root.join(format!(".{dest}.staging-{nonce}"));
    let _ = remove_path_if_exists(&staging);

    let extracted_root = match extract_zip_archive(zip_bytes, &staging) {
        Ok(path) => path,
        Err(error) => {
            let _ = remove_path_if_exists(&staging);
            return Err(error);
        }
    };

    let target = root.join(dest);
    let backup = root.join(format!(".{dest}.old-{nonce}"));
    if target.exists() && std::fs::rename(&target, &backup).is_err() {
        if let Err(error) = remove_path_if_exists(&target) {
            let _ = remove_path_if_exists(&staging);
            return Err(format!("failed to replace {}: {error}", target.display()));
        }
    }

    if let Err(error) = std::fs::rename(&extracted_root, &target) {
        let _ = remove_path_if_exists(&staging);
        if backup.exists() {
            let _ = std::fs::rename(&backup, &target);
        }
        return Err(format!(
            "failed to activate {} from staging: {error}",
            target.display()
        ));
    }

    let _ = remove_path_if_exists(&backup);
    let _ = remove_path_if_exists(&staging);
    Ok(())
}

/// Downloads and installs every archive the installation check reports as
/// missing. `progress` receives one human-readable line per stage.
pub(crate) fn install_missing<F>(root: &Path, progress: F) -> Result<(), String>
where
    F: Fn(&str),
{
    let missing = install_check::missing_components(root);
    let specs = plan_downloads(&missing);
    if specs.is_empty() {
        return Ok(());
    }

    let client = build_download_client()?;
    for spec in specs {
        progress(&format!("Downloading {}…", spec.name));
        let bytes = download_archive(&client, &spec.url)?;
        progress(&format!(
            "Installing {} ({} bytes)…",
            spec.name,
            bytes.len()
        ));
        install_archive_bytes(root, spec.dest, &bytes)?;
    }

    let still_missing = install_check::missing_components(root);
    if !still_missing.is_empty() {
        return Err(format!(
            "installation incomplete after download: missing {}",
            still_missing.join(", ")
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_with_entries(entries: &[(&str, Option<&[u8]>)]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            let options = SimpleFileOptions::default();
            for (name, contents) in entries {
                match contents {
                    Some(data) => {
                        writer.start_file(*name, options).expect("start file");
                        writer.write_all(data).expect("write entry");
                    }
                    None => {
                        writer.add_directory(*name, options).expect("add dir");
                    }
                }
            }
            writer.finish().expect("finish zip");
        }
        buffer.into_inner()
    }

    #[test]
    fn extract_zip_archive_rejects_parent_dir_entries() {
        let bytes = zip_with_entries(&[("../evil.txt", Some(b"nope"))]);
        let dir = tempfile::tempdir().expect("tempdir");
        let error = extract_zip_archive(&bytes, dir.path()).expect_err("must reject");
        assert!(error.contains("invalid zip entry path"));
    }

    #[test]
    fn extract_zip_archive_requires_a_single_root_directory() {
        let bytes = zip_with_entries(&[
            ("a/file.txt", Some(b"a")),
            ("b/file.txt", Some(b"b")),
        ]);
        let dir = tempfile::tempdir().expect("tempdir");
        let error = extract_zip_archive(&bytes, dir.path()).expect_err("must reject");
        assert!(error.contains("single root directory"));
    }

    #[test]
    fn extract_zip_archive_returns_the_root_directory() {
        let bytes = zip_with_entries(&[
            ("core-1.0/", None),
            ("core-1.0/server/server.js", Some(b"console.log('hi')")),
        ]);
        let dir = tempfile::tempdir().expect("tempdir");
        let root = extract_zip_archive(&bytes, dir.path()).expect("extract");
        assert!(root.join("server/server.js").is_file());
    }

    #[test]
    fn install_archive_bytes_swaps_the_target_into_place() {
        let bytes = zip_with_entries(&[
            ("core-1.0/", None),
            ("core-1.0/server/server.js", Some(b"new")),
        ]);
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("core/stale")).expect("stale dir");

        install_archive_bytes(dir.path(), "core", &bytes).expect("install");

        assert!(dir.path().join("core/server/server.js").is_file());
        assert!(!dir.path().join("core/stale").exists());
        // No staging or backup leftovers.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read root")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with('.'))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn plan_downloads_selects_archives_for_missing_components() {
        assert!(plan_downloads(&[]).is_empty());

        let node_only = plan_downloads(&["node"]);
        assert_eq!(node_only.len(), 1);
        assert_eq!(node_only[0].dest, "node");

        let core_pieces = plan_downloads(&["core/node_modules", "core/dist"]);
        assert_eq!(core_pieces.len(), 1);
        assert_eq!(core_pieces[0].dest, "core");

        let everything = plan_downloads(&["core", "node", "core/node_modules", "core/dist"]);
        assert_eq!(everything.len(), 2);
    }
}
