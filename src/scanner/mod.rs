use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A regular file found directly inside a watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryFile {
    pub name: String,
    pub path: PathBuf,
}

/// Lazily list the top-level files of `dir`. Subdirectories are neither yielded
/// nor descended into, and names that aren't valid UTF-8 are skipped.
///
/// An `Err` item means the listing can't be trusted any further; callers stop there.
pub fn list_files(dir: &Path) -> impl Iterator<Item = Result<DirectoryFile, walkdir::Error>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    return None;
                }
                let name = entry.file_name().to_str()?.to_string();
                Some(Ok(DirectoryFile {
                    name,
                    path: entry.into_path(),
                }))
            }
            Err(err) => Some(Err(err)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_list_files_is_top_level_only() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("a.png"), "a").unwrap();
        fs::write(tmp.path().join("b.png"), "b").unwrap();
        fs::create_dir(tmp.path().join("nested 01_02_2023 09_00_00")).unwrap();
        fs::write(tmp.path().join("nested 01_02_2023 09_00_00").join("c.png"), "c").unwrap();

        let mut names: Vec<String> = list_files(tmp.path())
            .map(|entry| entry.unwrap().name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.png".to_string(), "b.png".to_string()]);
    }

    #[test]
    fn test_list_files_missing_directory_errors() {
        let tmp = tempdir().unwrap();
        let mut listing = list_files(&tmp.path().join("missing"));
        assert!(matches!(listing.next(), Some(Err(_))));
    }
}
