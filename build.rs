use std::process::Command;

fn main() {
    // Build date shown by `perch --version`
    let now = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=PERCH_BUILD_DATE={}", now);

    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=PERCH_TARGET={}", target);

    // Short commit hash, "unknown" outside a git checkout
    let commit = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=PERCH_GIT_COMMIT={}", commit);

    println!("cargo:rerun-if-changed=.git/HEAD");
}
