//! Resolves command-line paths into the list of files to lint.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use graphql_tag_linter::is_processed;
use graphql_tag_types::Language;
use walkdir::{DirEntry, WalkDir};

/// Whether the linter understands `path`.
#[must_use]
pub fn is_lintable(path: &Path) -> bool {
    is_processed(path) || Language::from_path(path).is_some_and(|language| language.is_js_family())
}

fn is_glob(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name == "node_modules" || name.starts_with('.'))
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry));
    for entry in entries {
        match entry {
            Ok(entry) if entry.file_type().is_file() && is_lintable(entry.path()) => {
                out.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Skipping unreadable entry"),
        }
    }
}

fn add_path(path: PathBuf, out: &mut Vec<PathBuf>) {
    if path.is_dir() {
        walk(&path, out);
    } else if is_lintable(&path) {
        out.push(path);
    } else {
        tracing::warn!(path = %path.display(), "Skipping file with unsupported extension");
    }
}

/// Expand globs and walk directories, returning a sorted, deduplicated list.
///
/// Directories skip `node_modules` and hidden entries. A literal path that
/// does not exist is an error; a glob matching nothing is not.
pub fn collect_files(args: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for arg in args {
        if is_glob(arg) {
            let matches = glob::glob(arg).with_context(|| format!("Invalid glob pattern {arg}"))?;
            for entry in matches {
                match entry {
                    Ok(path) => add_path(path, &mut files),
                    Err(e) => tracing::warn!(error = %e, "Skipping unreadable glob match"),
                }
            }
        } else {
            let path = PathBuf::from(arg);
            if !path.exists() {
                bail!("No such file or directory: {arg}");
            }
            add_path(path, &mut files);
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn lintable_extensions() {
        assert!(is_lintable(Path::new("a.js")));
        assert!(is_lintable(Path::new("a.tsx")));
        assert!(is_lintable(Path::new("a.graphql")));
        assert!(is_lintable(Path::new("a.gql")));
        assert!(!is_lintable(Path::new("a.json")));
        assert!(!is_lintable(Path::new("README")));
    }

    #[test]
    fn walks_directories_skipping_vendored_and_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "src/app.js");
        touch(root, "src/queries/films.graphql");
        touch(root, "src/types.d.ts");
        touch(root, "src/data.json");
        touch(root, "node_modules/lib/index.js");
        touch(root, ".cache/build.js");

        let files = collect_files(&[root.to_string_lossy().into_owned()]).unwrap();
        assert_eq!(
            names(root, &files),
            vec!["src/app.js", "src/queries/films.graphql", "src/types.d.ts"]
        );
    }

    #[test]
    fn expands_globs_and_dedups() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "a.js");
        touch(root, "b.ts");
        touch(root, "c.md");

        let pattern = format!("{}/*", root.display());
        let explicit = root.join("a.js").to_string_lossy().into_owned();
        let files = collect_files(&[pattern, explicit]).unwrap();
        assert_eq!(names(root, &files), vec!["a.js", "b.ts"]);
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.js").to_string_lossy().into_owned();
        let err = collect_files(&[missing]).unwrap_err();
        assert!(err.to_string().starts_with("No such file or directory"));
    }

    #[test]
    fn empty_glob_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.js", dir.path().display());
        assert!(collect_files(&[pattern]).unwrap().is_empty());
    }
}
