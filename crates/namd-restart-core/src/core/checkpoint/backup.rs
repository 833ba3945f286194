use super::{CheckpointSet, Generation};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const AGED_SUFFIX: &str = ".old";
const BACKUP_SUFFIX: &str = ".bak";

/// Name a backup copy of `file` is written to.
///
/// An aged `.old` file has that suffix swapped for `.bak`; anything else gets `.bak` appended.
pub fn backup_path(file: &Path) -> PathBuf {
    let name = file.as_os_str().to_string_lossy();
    match name.strip_suffix(AGED_SUFFIX) {
        Some(stem) => PathBuf::from(format!("{}{}", stem, BACKUP_SUFFIX)),
        None => {
            let mut appended = OsString::from(file.as_os_str());
            appended.push(BACKUP_SUFFIX);
            PathBuf::from(appended)
        }
    }
}

/// Copies `file` to its [`backup_path`], returning the destination.
pub fn write_backup(file: &Path) -> io::Result<PathBuf> {
    let destination = backup_path(file);
    fs::copy(file, &destination)?;
    Ok(destination)
}

/// Copies every file of `set` to its backup name.
///
/// A set that already is the backup generation is left alone and yields no copies.
pub fn backup_checkpoints(set: &CheckpointSet) -> io::Result<Vec<PathBuf>> {
    if set.generation() == Generation::Backup {
        return Ok(Vec::new());
    }
    set.files().map(|file| write_backup(&file.path)).collect()
}
