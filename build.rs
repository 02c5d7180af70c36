use std::process::Command;

fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--tags"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let described = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!described.is_empty()).then_some(described)
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let pkg = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    // shown by `rep-tracker --version`, e.g. "0.1.0 (a1b2c3d-dirty)"
    let version = match git_describe() {
        Some(rev) => format!("{} ({})", pkg, rev),
        None => format!("{} (source build)", pkg),
    };

    println!("cargo:rustc-env=GIT_VERSION={}", version);
}
