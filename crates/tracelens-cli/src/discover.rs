//! Artifact discovery for the upload subcommand

use anyhow::{bail, Context, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Basename patterns used when no `--include` globs are given
pub const DEFAULT_INCLUDE: &[&str] = &["*.js", "*.map"];

/// One file picked up for upload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadCandidate {
    /// Where the file lives on disk
    pub path: PathBuf,
    /// Path recorded against the release
    pub logical_path: String,
}

/// Walk the given paths and pair every artifact with its logical path.
///
/// Explicitly named files are always taken; directories are walked
/// recursively and filtered by the basename globs. Results come back sorted
/// by logical path, with duplicate logical paths collapsed, so runs are
/// deterministic.
pub fn collect(
    paths: &[PathBuf],
    url_prefix: &str,
    include: &[String],
) -> Result<Vec<UploadCandidate>> {
    let patterns = compile_patterns(include)?;

    let mut candidates = Vec::new();
    for path in paths {
        if path.is_file() {
            let name = file_name_of(path)?;
            candidates.push(UploadCandidate {
                path: path.clone(),
                logical_path: join_logical(url_prefix, &name),
            });
        } else if path.is_dir() {
            walk_dir(path, path, url_prefix, &patterns, &mut candidates)?;
        } else {
            bail!("No such file or directory: {}", path.display());
        }
    }

    candidates.sort_by(|a, b| a.logical_path.cmp(&b.logical_path));
    candidates.dedup_by(|a, b| a.logical_path == b.logical_path);
    Ok(candidates)
}

fn compile_patterns(include: &[String]) -> Result<Vec<Pattern>> {
    let globs: Vec<&str> = if include.is_empty() {
        DEFAULT_INCLUDE.to_vec()
    } else {
        include.iter().map(String::as_str).collect()
    };

    globs
        .iter()
        .map(|g| Pattern::new(g).with_context(|| format!("Invalid glob pattern: {}", g)))
        .collect()
}

fn walk_dir(
    dir: &Path,
    root: &Path,
    url_prefix: &str,
    patterns: &[Pattern],
    out: &mut Vec<UploadCandidate>,
) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory {}", dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("Cannot read directory {}", dir.display()))?;
        let path = entry.path();

        if path.is_dir() {
            walk_dir(&path, root, url_prefix, patterns, out)?;
            continue;
        }
        if !path.is_file() {
            continue;
        }

        let name = file_name_of(&path)?;
        if !matches_any(&name, patterns) {
            debug!("Skipping {} (no pattern match)", path.display());
            continue;
        }

        let relative = relative_slash_path(&path, root)?;
        out.push(UploadCandidate {
            path,
            logical_path: join_logical(url_prefix, &relative),
        });
    }

    Ok(())
}

fn matches_any(name: &str, patterns: &[Pattern]) -> bool {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    patterns.iter().any(|p| p.matches_with(name, options))
}

fn file_name_of(path: &Path) -> Result<String> {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => Ok(name.to_string()),
        None => bail!("Path has no usable file name: {}", path.display()),
    }
}

/// Path below `root`, joined with forward slashes regardless of platform
fn relative_slash_path(path: &Path, root: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut parts = Vec::new();
    for component in relative.components() {
        match component.as_os_str().to_str() {
            Some(part) => parts.push(part),
            None => bail!("Path is not valid UTF-8: {}", path.display()),
        }
    }
    Ok(parts.join("/"))
}

/// Join the serving prefix and a relative path with exactly one slash.
/// A bare `~` or empty prefix still yields a separator, so `~/` + `app.js`
/// gives `~/app.js`.
fn join_logical(prefix: &str, relative: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_directory_walk_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("app.js"));
        touch(&dir.path().join("js/vendor.js"));
        touch(&dir.path().join("js/vendor.js.map"));
        touch(&dir.path().join("css/site.css"));

        let found = collect(&[dir.path().to_path_buf()], "~/", &[]).unwrap();
        let logical: Vec<&str> = found.iter().map(|c| c.logical_path.as_str()).collect();
        assert_eq!(
            logical,
            vec!["~/app.js", "~/js/vendor.js", "~/js/vendor.js.map"]
        );
    }

    #[test]
    fn test_explicit_file_skips_pattern_filter() {
        let dir = tempfile::tempdir().unwrap();
        let css = dir.path().join("site.css");
        touch(&css);

        let found = collect(&[css.clone()], "~/", &[]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, css);
        assert_eq!(found[0].logical_path, "~/site.css");
    }

    #[test]
    fn test_custom_include_patterns() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("app.js"));
        touch(&dir.path().join("styles/site.css"));

        let found = collect(
            &[dir.path().to_path_buf()],
            "~/",
            &["*.css".to_string()],
        )
        .unwrap();
        let logical: Vec<&str> = found.iter().map(|c| c.logical_path.as_str()).collect();
        assert_eq!(logical, vec!["~/styles/site.css"]);
    }

    #[test]
    fn test_duplicate_logical_paths_collapse() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.js");
        touch(&file);

        let found = collect(&[file.clone(), file], "~/", &[]).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_missing_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let error = collect(&[missing.clone()], "~/", &[]).unwrap_err();
        assert!(error.to_string().contains("No such file or directory"));
    }

    #[test]
    fn test_invalid_pattern_errors() {
        let dir = tempfile::tempdir().unwrap();
        let error = collect(
            &[dir.path().to_path_buf()],
            "~/",
            &["[".to_string()],
        )
        .unwrap_err();
        assert!(error.to_string().contains("Invalid glob pattern"));
    }

    #[test]
    fn test_join_logical() {
        assert_eq!(join_logical("~/", "app.js"), "~/app.js");
        assert_eq!(join_logical("~", "app.js"), "~/app.js");
        assert_eq!(join_logical("static/", "js/app.js"), "static/js/app.js");
        assert_eq!(join_logical("", "app.js"), "/app.js");
    }
}
