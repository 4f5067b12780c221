use std::path::{Path, PathBuf};

/// Expand the configured source selectors against the project root.
///
/// A selector that names an existing file or directory is taken as-is;
/// anything else is treated as a glob pattern. Results are project-relative
/// (tool processes run with the root as their working directory), sorted,
/// and deduplicated. Selectors matching nothing are skipped with a debug
/// log rather than an error: a project without a `tests/` directory is not
/// misconfigured.
pub fn expand_sources(root: &Path, selectors: &[String]) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();

    for selector in selectors {
        if root.join(selector).exists() {
            out.push(PathBuf::from(selector));
            continue;
        }

        let pattern = root.join(selector);
        let matches = match glob::glob(&pattern.to_string_lossy()) {
            Ok(paths) => paths,
            Err(err) => {
                tracing::warn!(selector = %selector, error = %err, "bad source pattern");
                continue;
            }
        };

        let mut hit = false;
        for path in matches.flatten() {
            hit = true;
            match path.strip_prefix(root) {
                Ok(rel) => out.push(rel.to_path_buf()),
                Err(_) => out.push(path),
            }
        }
        if !hit {
            tracing::debug!(selector = %selector, "source selector matched nothing");
        }
    }

    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn literal_directories_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();

        let sources = expand_sources(dir.path(), &["src".to_string(), "tests".to_string()]);
        assert_eq!(sources, vec![PathBuf::from("src")]);
    }

    #[test]
    fn globs_expand_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("pkg_a/src")).unwrap();
        std::fs::create_dir_all(dir.path().join("pkg_b/src")).unwrap();

        let sources = expand_sources(dir.path(), &["pkg_*/src".to_string()]);
        assert_eq!(
            sources,
            vec![PathBuf::from("pkg_a/src"), PathBuf::from("pkg_b/src")]
        );
    }
}
