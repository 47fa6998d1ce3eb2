//! Repository survey used by the review tool.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use walkdir::WalkDir;

const IGNORED_DIRS: &[&str] = &[
    "__pycache__",
    "node_modules",
    "target",
    "venv",
    "dist",
    "build",
];

/// Files found under a repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSurvey {
    pub root: PathBuf,
    /// Relative paths, sorted, at most `limit` entries.
    pub files: Vec<PathBuf>,
    /// Total file count, including entries past `limit`.
    pub total: usize,
}

impl RepoSurvey {
    pub fn render(&self) -> String {
        let mut out = format!("Files ({}):", self.total);
        for file in &self.files {
            out.push_str(&format!("\n- {}", file.display()));
        }
        let hidden = self.total - self.files.len();
        if hidden > 0 {
            out.push_str(&format!("\n- ... and {hidden} more"));
        }
        out
    }
}

/// List regular files under `root`, skipping hidden and build/cache dirs.
pub fn survey_repo(root: &Path, limit: usize) -> Result<RepoSurvey> {
    if !root.is_dir() {
        bail!("repository path {} is not a directory", root.display());
    }
    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry))
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect::<Vec<_>>();
    files.sort();

    let total = files.len();
    files.truncate(limit);
    Ok(RepoSurvey {
        root: root.to_path_buf(),
        files,
        total,
    })
}

fn is_ignored(entry: &walkdir::DirEntry) -> bool {
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    if name.starts_with('.') {
        return true;
    }
    entry.file_type().is_dir() && IGNORED_DIRS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lists_files_sorted_and_skips_noise() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        fs::create_dir_all(root.join("tests")).expect("mkdir");
        fs::create_dir_all(root.join(".git")).expect("mkdir");
        fs::create_dir_all(root.join("__pycache__")).expect("mkdir");
        fs::write(root.join("tests/test_auth.py"), "").expect("write");
        fs::write(root.join("auth.py"), "").expect("write");
        fs::write(root.join(".git/HEAD"), "").expect("write");
        fs::write(root.join("__pycache__/auth.pyc"), "").expect("write");
        fs::write(root.join(".env"), "").expect("write");

        let survey = survey_repo(root, 10).expect("survey");
        assert_eq!(
            survey.files,
            vec![PathBuf::from("auth.py"), PathBuf::from("tests/test_auth.py")]
        );
        assert_eq!(survey.total, 2);
    }

    #[test]
    fn render_notes_entries_past_limit() {
        let temp = tempfile::tempdir().expect("tempdir");
        for name in ["a.py", "b.py", "c.py"] {
            fs::write(temp.path().join(name), "").expect("write");
        }
        let survey = survey_repo(temp.path(), 2).expect("survey");
        assert_eq!(survey.render(), "Files (3):\n- a.py\n- b.py\n- ... and 1 more");
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = survey_repo(&temp.path().join("nope"), 10).expect_err("missing");
        assert!(err.to_string().contains("not a directory"));
    }
}
