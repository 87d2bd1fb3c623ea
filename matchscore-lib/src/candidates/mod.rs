//! Candidate discovery
//!
//! Directory listing order depends on the platform and filesystem, so
//! candidates are always returned sorted by file name.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::{Error, Result};

/// A candidate document found on disk
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Candidate {
    /// File name, used as the row identifier in the report
    pub name: String,
    /// Full path to the file
    pub path: PathBuf,
}

/// List regular files in `dir` whose extension equals `extension`
/// (case-sensitive, like a `*.pdf` glob).
///
/// A missing directory is not an error: it is logged and yields no candidates.
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<Candidate>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(dir = %dir.display(), "candidate directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::io(dir, e)),
    };

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();

        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            warn!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };

        candidates.push(Candidate { name, path });
    }

    candidates.sort();
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "zoe.pdf");
        touch(dir.path(), "adam.pdf");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "UPPER.PDF");
        touch(dir.path(), "mike.pdf");
        fs::create_dir(dir.path().join("folder.pdf")).unwrap();

        let found = discover(dir.path(), "pdf").unwrap();
        let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["adam.pdf", "mike.pdf", "zoe.pdf"]);
        assert_eq!(found[0].path, dir.path().join("adam.pdf"));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover(&dir.path().join("resumes"), "pdf").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path(), "pdf").unwrap().is_empty());
    }
}
