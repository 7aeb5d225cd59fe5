use std::path::Path;
use std::process::Command;

fn main() {
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    let sha = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    let repo = git(&["config", "--get", "remote.origin.url"])
        .or_else(|| std::env::var("CARGO_PKG_REPOSITORY").ok().filter(|repo| !repo.is_empty()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    println!("cargo:rustc-env=LEDSTRIP_GIT_SHA={sha}");
    println!("cargo:rustc-env=LEDSTRIP_REPO={repo}");
    println!("cargo:rerun-if-changed=build.rs");
    rerun_on_new_commit();
}

fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Commits move the branch ref, checkouts move HEAD and `git gc` packs refs.
fn rerun_on_new_commit() {
    let (Some(git_dir), Some(common_dir)) = (
        git(&["rev-parse", "--git-dir"]),
        git(&["rev-parse", "--git-common-dir"]),
    ) else {
        return;
    };

    let head = Path::new(&git_dir).join("HEAD");
    println!("cargo:rerun-if-changed={}", head.display());

    let common_dir = Path::new(&common_dir);
    for file in ["packed-refs", "config"] {
        let path = common_dir.join(file);
        if path.exists() {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }

    let Ok(contents) = std::fs::read_to_string(&head) else {
        return;
    };
    if let Some(reference) = contents.trim().strip_prefix("ref: ") {
        // Missing until the branch gets its first commit; cargo then reruns every build.
        println!(
            "cargo:rerun-if-changed={}",
            common_dir.join(reference).display()
        );
    }
}
