//! Host-side discovery of timelapse folders on disk.
//!
//! The game keeps timelapses in folders named `<label>_TIMELAPSE` (in
//! progress) or `<label>_TIMELAPSE-COMP` (complete), somewhere below its save
//! directory.  [`scan_save_directory`] walks a root, stops descending at each
//! timelapse folder, and reports the ones that hold at least one `.sav` file.
//! [`read_timelapse_files`] then loads a folder's `.sav` files into memory
//! for [`crate::timelapse::load_timelapse`]; the decoder itself never touches
//! the filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::name::process_name;
use crate::timelapse::RawFileEntry;

const IN_PROGRESS_DIR_SUFFIX: &str = "timelapse";
const COMPLETE_DIR_SUFFIX:    &str = "timelapse-comp";

/// A timelapse folder found by [`scan_save_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedTimelapse {
    pub folder_name:  String,
    pub display_name: String,
    /// From the folder suffix; the file layout is re-detected on load.
    pub is_complete:  bool,
    pub path:         PathBuf,
}

fn is_sav(name: &str) -> bool {
    name.to_lowercase().ends_with(".sav")
}

/// Recursively find timelapse folders below `root`, sorted by display name.
pub fn scan_save_directory<P: AsRef<Path>>(root: P) -> io::Result<Vec<ScannedTimelapse>> {
    let mut results = Vec::new();
    find_timelapses(root.as_ref(), &mut results)?;
    results.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    tracing::info!(root = %root.as_ref().display(), found = results.len(), "scanned for timelapses");
    Ok(results)
}

fn find_timelapses(dir: &Path, results: &mut Vec<ScannedTimelapse>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name  = entry.file_name().to_string_lossy().into_owned();
        let lower = name.to_lowercase();
        let path  = entry.path();

        if lower.ends_with(IN_PROGRESS_DIR_SUFFIX) || lower.ends_with(COMPLETE_DIR_SUFFIX) {
            if has_sav_file(&path)? {
                let is_complete = lower.ends_with(COMPLETE_DIR_SUFFIX);
                tracing::debug!(folder = %name, is_complete, "found timelapse folder");
                results.push(ScannedTimelapse {
                    display_name: process_name(&name, is_complete),
                    folder_name:  name,
                    is_complete,
                    path,
                });
            }
        } else {
            find_timelapses(&path, results)?;
        }
    }
    Ok(())
}

fn has_sav_file(dir: &Path) -> io::Result<bool> {
    for entry in fs::read_dir(dir)? {
        if is_sav(&entry?.file_name().to_string_lossy()) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Read every `.sav` file directly inside `dir`.
///
/// Entries are returned sorted by file name so the result does not depend on
/// directory iteration order; playback order is decided by the loader.
pub fn read_timelapse_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<RawFileEntry>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        let name  = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_file() && is_sav(&name) {
            files.push(RawFileEntry::new(name, fs::read(entry.path())?));
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn finds_nested_folders_and_sorts_by_display_name() {
        let root = tempdir().unwrap();
        let a = root.path().join("profile/SUBURBAN_BACKGARDEN_TIMELAPSE");
        let b = root.path().join("ALPINE_CABIN_TIMELAPSE-COMP");
        let empty = root.path().join("profile/EMPTY_ONE_TIMELAPSE");
        let other = root.path().join("profile/Other");
        for d in [&a, &b, &empty, &other] {
            fs::create_dir_all(d).unwrap();
        }
        touch(&a.join("SUBURBAN_BACKGARDEN_TIMELAPSE_1.sav"));
        touch(&b.join("ALPINE_CABIN_TIMELAPSE-COMP_0-100.SAV"));
        touch(&empty.join("readme.txt"));
        touch(&other.join("x.sav"));

        let found = scan_save_directory(root.path()).unwrap();
        let names: Vec<&str> = found.iter().map(|t| t.folder_name.as_str()).collect();
        assert_eq!(names, vec!["ALPINE_CABIN_TIMELAPSE-COMP", "SUBURBAN_BACKGARDEN_TIMELAPSE"]);
        assert!(found[0].is_complete);
        assert_eq!(found[0].display_name, "Alpine: Cabin");
        assert_eq!(found[1].display_name, "Suburban: [In Progress] Backgarden");
        assert_eq!(found[1].path, a);
    }

    #[test]
    fn folder_suffix_is_a_plain_case_insensitive_match() {
        let root = tempdir().unwrap();
        let plain = root.path().join("NotATimelapse");
        let comp = root.path().join("mixed_Case_TimeLapse-Comp");
        let lapse = root.path().join("timelapses");
        for d in [&plain, &comp, &lapse] {
            fs::create_dir_all(d).unwrap();
            touch(&d.join("f.sav"));
        }

        let mut found = scan_save_directory(root.path()).unwrap();
        found.sort_by(|a, b| a.folder_name.cmp(&b.folder_name));
        let got: Vec<(&str, bool)> = found.iter().map(|t| (t.folder_name.as_str(), t.is_complete)).collect();
        assert_eq!(got, vec![("NotATimelapse", false), ("mixed_Case_TimeLapse-Comp", true)]);
    }

    #[test]
    fn does_not_descend_into_timelapse_folders() {
        let root = tempdir().unwrap();
        let outer = root.path().join("A_B_TIMELAPSE");
        let inner = outer.join("C_D_TIMELAPSE");
        fs::create_dir_all(&inner).unwrap();
        touch(&outer.join("A_B_TIMELAPSE_0.sav"));
        touch(&inner.join("C_D_TIMELAPSE_0.sav"));

        let found = scan_save_directory(root.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].folder_name, "A_B_TIMELAPSE");
    }

    #[test]
    fn reads_only_sav_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("X_2.sav"), b"two").unwrap();
        fs::write(dir.path().join("X_1.SAV"), b"one").unwrap();
        fs::write(dir.path().join("notes.txt"), b"no").unwrap();
        fs::create_dir(dir.path().join("sub.sav")).unwrap();

        let files = read_timelapse_files(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["X_1.SAV", "X_2.sav"]);
        assert_eq!(files[1].data, b"two");
    }
}
