//! Cross-process determinism: spawns the `construct_fixture` binary under
//! several environment variants and asserts identical output.

use std::path::Path;
use std::process::Command;

fn binary_path() -> String {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push("construct_fixture");
    path.to_string_lossy().to_string()
}

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = binary_path();
    let mut command = Command::new(&bin);
    command
        .current_dir(work_dir)
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("RUST_LOG");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });
    assert!(
        output.status.success(),
        "construct_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_four_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    assert!(baseline.contains("digest=sha256:"), "baseline missing digests");
    assert!(baseline.contains("engine=hs_dag"), "baseline missing DAG runs");
    assert!(baseline.trim_end().ends_with("runs=20"), "unexpected run count");

    let tmp = std::env::temp_dir();
    let variants: [(&str, &[(&str, &str)]); 3] = [
        (&root, &[("LC_ALL", "C")]),
        (&root, &[("LANG", "tr_TR.UTF-8"), ("TZ", "Pacific/Chatham")]),
        (tmp.to_str().expect("temp dir is UTF-8"), &[("RUST_LOG", "trace")]),
    ];
    for (dir, env) in variants {
        let out = run_variant(dir, env);
        assert_eq!(out, baseline, "output diverged under {env:?} in {dir}");
    }
}

#[test]
fn tree_and_dag_lines_share_result_digests() {
    let out = run_variant(&workspace_root(), &[]);
    let field = |line: &str, key: &str| -> String {
        line.split(' ')
            .find_map(|kv| kv.strip_prefix(&format!("{key}=")).map(str::to_string))
            .unwrap_or_default()
    };
    let lines: Vec<&str> = out.lines().filter(|l| l.starts_with("model=")).collect();
    for line in &lines {
        if field(line, "engine") != "hs_tree" {
            continue;
        }
        let twin = lines
            .iter()
            .find(|other| {
                field(other, "engine") == "hs_dag"
                    && field(other, "model") == field(line, "model")
                    && field(other, "labeler") == field(line, "labeler")
            })
            .expect("every tree run has a DAG twin");
        assert_eq!(field(line, "result_digest"), field(twin, "result_digest"), "{line}");
        assert_ne!(field(line, "digest"), field(twin, "digest"), "{line}");
    }
}
