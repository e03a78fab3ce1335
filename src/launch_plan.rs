use std::{env, fs, path::Path};

use crate::{
    runtime_paths, LaunchPlan, RuntimeManifest, DEFAULT_SERVER_ENTRYPOINT, RUNTIME_MANIFEST_FILE,
    SERVER_CMD_ENV, SERVER_CWD_ENV, SERVER_DATA_DIR_ARG,
};

/// Resolution order: explicit command override, then the installed layout,
/// optionally shaped by `runtime-manifest.json`.
pub(crate) fn resolve_launch_plan(root: &Path) -> Result<LaunchPlan, String> {
    if let Some(custom_cmd) = env::var(SERVER_CMD_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    {
        return resolve_custom_launch(root, custom_cmd);
    }

    let manifest = read_runtime_manifest(root)?;
    build_installed_plan(root, manifest)
}

fn resolve_custom_launch(root: &Path, custom_cmd: String) -> Result<LaunchPlan, String> {
    let mut pieces =
        shlex::split(&custom_cmd).ok_or_else(|| format!("Invalid {SERVER_CMD_ENV}: {custom_cmd}"))?;
    if pieces.is_empty() {
        return Err(format!("{SERVER_CMD_ENV} is empty."));
    }

    let cmd = pieces.remove(0);
    let cwd = env::var(SERVER_CWD_ENV)
        .map(Into::into)
        .unwrap_or_else(|_| runtime_paths::core_dir(root));

    Ok(LaunchPlan {
        cmd,
        args: pieces,
        cwd,
        root_dir: Some(root.to_path_buf()),
        packaged_mode: false,
    })
}

fn read_runtime_manifest(root: &Path) -> Result<Option<RuntimeManifest>, String> {
    let manifest_path = root.join(RUNTIME_MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Ok(None);
    }

    let manifest_text = fs::read_to_string(&manifest_path).map_err(|error| {
        format!(
            "Failed to read runtime manifest {}: {}",
            manifest_path.display(),
            error
        )
    })?;
    let manifest: RuntimeManifest = serde_json::from_str(&manifest_text).map_err(|error| {
        format!(
            "Failed to parse runtime manifest {}: {}",
            manifest_path.display(),
            error
        )
    })?;
    Ok(Some(manifest))
}

fn build_installed_plan(
    root: &Path,
    manifest: Option<RuntimeManifest>,
) -> Result<LaunchPlan, String> {
    let manifest = manifest.unwrap_or(RuntimeManifest {
        node: None,
        entrypoint: None,
        extra_args: None,
    });

    let node_path = match manifest.node.as_deref() {
        Some(relative) => root.join(relative),
        None => runtime_paths::node_executable(root),
    };
    if !node_path.is_file() {
        return Err(format!(
            "Node runtime executable is missing: {}",
            node_path.display()
        ));
    }

    let entrypoint = manifest
        .entrypoint
        .as_deref()
        .unwrap_or(DEFAULT_SERVER_ENTRYPOINT)
        .to_string();
    let mut args = vec![entrypoint, SERVER_DATA_DIR_ARG.to_string()];
    if let Some(extra) = manifest.extra_args.as_deref() {
        let extra_pieces = shlex::split(extra)
            .ok_or_else(|| format!("Invalid extra_args in runtime manifest: {extra}"))?;
        args.extend(extra_pieces);
    }

    Ok(LaunchPlan {
        cmd: node_path.to_string_lossy().to_string(),
        args,
        cwd: runtime_paths::core_dir(root),
        root_dir: Some(root.to_path_buf()),
        packaged_mode: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn install_fake_node(root: &Path) {
        let node_path = runtime_paths::node_executable(root);
        fs::create_dir_all(node_path.parent().expect("node parent")).expect("node dir");
        fs::write(&node_path, b"#!node").expect("node stub");
    }

    #[test]
    fn default_plan_launches_the_bundled_server() {
        let dir = tempfile::tempdir().expect("tempdir");
        install_fake_node(dir.path());

        let plan = build_installed_plan(dir.path(), None).expect("plan");
        assert_eq!(plan.args, vec!["server/server.js", "--data-dir=../data/"]);
        assert_eq!(plan.cwd, runtime_paths::core_dir(dir.path()));
        assert!(plan.packaged_mode);
        assert!(plan.cmd.contains("node"));
    }

    #[test]
    fn manifest_overrides_entrypoint_and_appends_extra_args() {
        let dir = tempfile::tempdir().expect("tempdir");
        install_fake_node(dir.path());

        let manifest = RuntimeManifest {
            node: None,
            entrypoint: Some("server/alt.js".to_string()),
            extra_args: Some("--port 3005 --verbose".to_string()),
        };
        let plan = build_installed_plan(dir.path(), Some(manifest)).expect("plan");
        assert_eq!(
            plan.args,
            vec![
                "server/alt.js",
                "--data-dir=../data/",
                "--port",
                "3005",
                "--verbose"
            ]
        );
    }

    #[test]
    fn missing_node_runtime_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = build_installed_plan(dir.path(), None).expect_err("should fail");
        assert!(error.contains("Node runtime executable is missing"));
    }

    #[test]
    fn malformed_manifest_extra_args_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        install_fake_node(dir.path());

        let manifest = RuntimeManifest {
            node: None,
            entrypoint: None,
            extra_args: Some("--flag \"unterminated".to_string()),
        };
        let error = build_installed_plan(dir.path(), Some(manifest)).expect_err("should fail");
        assert!(error.contains("Invalid extra_args"));
    }

    #[test]
    fn manifest_file_is_parsed_from_the_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(RUNTIME_MANIFEST_FILE),
            r#"{"entrypoint": "server/custom.js"}"#,
        )
        .expect("write manifest");

        let manifest = read_runtime_manifest(dir.path())
            .expect("read")
            .expect("manifest present");
        assert_eq!(manifest.entrypoint.as_deref(), Some("server/custom.js"));
        assert!(manifest.node.is_none());
    }
}
