//! git queries behind `add-buffers`.

use std::path::Path;
use std::process::Command;

use aidermux_session::RepoFiles;

/// Tracked files of the repository containing `cwd`, or `None` outside a
/// repository or when git is unavailable.
pub fn discover(cwd: &Path) -> Option<RepoFiles> {
    let root = match git(cwd, &["rev-parse", "--show-toplevel"]) {
        Ok(out) => out.trim().to_string(),
        Err(e) => {
            tracing::debug!("not in a git repository: {e}");
            return None;
        }
    };
    if root.is_empty() {
        return None;
    }
    match git(Path::new(&root), &["ls-files"]) {
        Ok(out) => Some(RepoFiles::new(&root, parse_ls_files(&out))),
        Err(e) => {
            tracing::warn!("git ls-files failed in {root}: {e}");
            None
        }
    }
}

fn parse_ls_files(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

fn git(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git").args(args).current_dir(dir).output()?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} exited with {}: {}",
            args.join(" "),
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
