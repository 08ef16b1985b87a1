//! File copy utilities.

use std::path::{Path, PathBuf};

use fs_err as fs;
use walkdir::WalkDir;

use crate::types::Result;

/// Copy every file under `source` into `dest`, preserving relative paths.
///
/// Creates `dest` and intermediate directories. Returns the number of files
/// copied. A missing `source` copies nothing.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<usize> {
    fs::create_dir_all(dest)?;
    if !source.is_dir() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = match entry.path().strip_prefix(source) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() || entry.file_type().is_symlink() {
            // Symlinks are copied by content; a dangling one is an error.
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    log::debug!(
        "Copied {} files from {} to {}",
        copied,
        source.display(),
        dest.display()
    );
    Ok(copied)
}

/// List regular files under `dir` as paths relative to `dir`, sorted.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        return Ok(files);
    }

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(dir) {
            files.push(rel.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Remove every entry of `dir` whose name matches `pred`. Returns the count.
///
/// A missing `dir` removes nothing.
pub fn remove_entries_where(dir: &Path, mut pred: impl FnMut(&str) -> bool) -> Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !pred(&name) {
            continue;
        }
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
        removed += 1;
    }
    Ok(removed)
}

/// Remove a directory tree, ignoring a missing path.
pub fn remove_dir_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_tree_copies_nested_files() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("a.txt"), b"a").unwrap();
        fs::write(src.join("nested").join("b.txt"), b"b").unwrap();

        let dest = temp.path().join("dest");
        let copied = copy_tree(&src, &dest).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"a");
        assert_eq!(fs::read(dest.join("nested").join("b.txt")).unwrap(), b"b");
    }

    #[test]
    fn test_copy_tree_is_independent_of_source() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.txt"), b"before").unwrap();

        let dest = temp.path().join("dest");
        copy_tree(&src, &dest).unwrap();
        fs::write(src.join("a.txt"), b"after").unwrap();

        assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"before");
    }

    #[test]
    fn test_copy_tree_missing_source() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("dest");

        assert_eq!(copy_tree(&temp.path().join("nope"), &dest).unwrap(), 0);
        assert!(dest.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_tree_fails_on_dangling_symlink() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone"), src.join("link")).unwrap();

        assert!(copy_tree(&src, &temp.path().join("dest")).is_err());
    }

    #[test]
    fn test_remove_entries_where() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("commit-a").join("files")).unwrap();
        fs::write(temp.path().join("add-1"), b"").unwrap();
        fs::write(temp.path().join("keep"), b"").unwrap();

        let removed = remove_entries_where(temp.path(), |n| n != "keep").unwrap();

        assert_eq!(removed, 2);
        assert_eq!(list_files(temp.path()).unwrap(), vec![PathBuf::from("keep")]);
        assert_eq!(remove_entries_where(&temp.path().join("nope"), |_| true).unwrap(), 0);
    }

    #[test]
    fn test_list_files_sorted_and_relative() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("b.txt"), b"").unwrap();
        fs::write(temp.path().join("a.txt"), b"").unwrap();
        fs::write(temp.path().join("sub").join("c.txt"), b"").unwrap();

        let files = list_files(temp.path()).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("sub/c.txt"),
            ]
        );
    }
}
