//! Build script for svcs-core.
//!
//! Exposes `SVCS_VERSION_STRING`, the text printed by `svcs --version`: the
//! package version followed by the source revision when one is known, e.g.
//! `0.1.0 (1a2b3c4d)` or `0.1.0 (1a2b3c4d+dirty)`. Packagers building from a
//! tarball can pin the revision with `SVCS_BUILD_REVISION`.

use std::path::Path;
use std::process::Command;

const REVISION_ENV: &str = "SVCS_BUILD_REVISION";

fn main() {
    println!("cargo:rerun-if-env-changed={}", REVISION_ENV);

    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let manifest_dir = Path::new(&manifest_dir);

    if let Some(git_dir) = git(manifest_dir, &["rev-parse", "--absolute-git-dir"]) {
        let git_dir = Path::new(&git_dir);
        println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
        println!("cargo:rerun-if-changed={}", git_dir.join("index").display());
    }

    let revision = std::env::var(REVISION_ENV)
        .ok()
        .filter(|r| !r.trim().is_empty())
        .or_else(|| source_revision(manifest_dir));

    let version = env!("CARGO_PKG_VERSION");
    let display = match revision {
        Some(rev) => format!("{} ({})", version, rev),
        None => version.to_string(),
    };
    println!("cargo:rustc-env=SVCS_VERSION_STRING={}", display);
}

/// Short HEAD hash, marked `+dirty` when tracked files have local edits.
fn source_revision(dir: &Path) -> Option<String> {
    let head = git(dir, &["rev-parse", "--short=8", "HEAD"])?;
    let dirty = git(dir, &["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|changes| !changes.is_empty());
    Some(if dirty { format!("{}+dirty", head) } else { head })
}

/// Run git in `dir`; `None` unless it exits successfully.
fn git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
