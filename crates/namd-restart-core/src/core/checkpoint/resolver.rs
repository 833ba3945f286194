use super::{CheckpointFile, CheckpointSet, Generation, Role};
use crate::engine::report::{Reporter, RestartEvent};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Substring every discoverable restart file name contains.
const RESTART_MARKER: &str = "restart";
/// A generation needs at least one file per role before it is considered.
const MIN_GENERATION_SIZE: usize = Role::ALL.len();

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No restart files found under {}", directory.display())]
    NotFound { directory: PathBuf },

    #[error("Restart files under {} are empty or incomplete", directory.display())]
    Unusable { directory: PathBuf },

    #[error("Restart file does not match any of the xsc/coor/vel roles: {}", path.display())]
    UnrecognizedName { path: PathBuf },

    #[error("More than one {role} restart file: {} and {}", first.display(), second.display())]
    DuplicateRole {
        role: Role,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("No {role} file among the {generation} restart files")]
    MissingRole { role: Role, generation: Generation },

    #[error("Failed to scan {}: {source}", directory.display())]
    Scan {
        directory: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A file whose name contains the restart marker, before any classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub size: u64,
}

impl ScannedFile {
    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Finds the restart triple to resume from under `directory`.
///
/// Generations are tried strictly in the order current, old, backup. A generation with
/// fewer than three files is skipped, and one containing any empty file is rejected in
/// favour of the next. The first acceptable generation must map cleanly onto the three
/// roles, otherwise resolution fails without looking any further.
///
/// Pass [`Reporter::silent`] to resolve without emitting any events.
///
/// # Errors
///
/// See [`ResolveError`]: nothing found, nothing usable, a name matching no role, a role
/// filled twice or never, or a failed directory walk.
pub fn resolve(directory: &Path, reporter: &Reporter) -> Result<CheckpointSet, ResolveError> {
    reporter.report(RestartEvent::SearchingCheckpoints {
        directory: directory.to_path_buf(),
    });

    let found = if directory.is_dir() {
        scan(directory)?
    } else {
        Vec::new()
    };
    if found.is_empty() {
        reporter.report(RestartEvent::CheckpointsNotFound {
            directory: directory.to_path_buf(),
        });
        return Err(ResolveError::NotFound {
            directory: directory.to_path_buf(),
        });
    }

    let mut generations: HashMap<Generation, Vec<ScannedFile>> = HashMap::new();
    for file in found {
        if let Some(generation) = Generation::from_file_name(&file.file_name()) {
            generations.entry(generation).or_default().push(file);
        }
    }

    for generation in Generation::PRIORITY {
        let Some(files) = generations.get(&generation) else {
            continue;
        };
        if files.len() < MIN_GENERATION_SIZE {
            continue;
        }
        if let Some(empty) = files.iter().find(|file| file.size == 0) {
            reporter.report(RestartEvent::GenerationRejected {
                generation,
                empty_file: empty.path.clone(),
            });
            continue;
        }

        if generation != Generation::Current {
            reporter.report(RestartEvent::GenerationFallback { generation });
        }
        let set = annotate(generation, files, reporter)?;
        reporter.report(RestartEvent::CheckpointsReady { generation });
        return Ok(set);
    }

    reporter.report(RestartEvent::CheckpointsUnusable {
        directory: directory.to_path_buf(),
    });
    Err(ResolveError::Unusable {
        directory: directory.to_path_buf(),
    })
}

/// Recursively lists every regular file under `directory` whose name contains `restart`.
pub fn scan(directory: &Path) -> Result<Vec<ScannedFile>, ResolveError> {
    let scan_error = |source| ResolveError::Scan {
        directory: directory.to_path_buf(),
        source,
    };

    let mut found = Vec::new();
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry.map_err(scan_error)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_string_lossy().contains(RESTART_MARKER) {
            continue;
        }
        let size = entry.metadata().map_err(scan_error)?.len();
        found.push(ScannedFile {
            path: entry.into_path(),
            size,
        });
    }
    Ok(found)
}

fn annotate(
    generation: Generation,
    files: &[ScannedFile],
    reporter: &Reporter,
) -> Result<CheckpointSet, ResolveError> {
    let mut slots: [Option<CheckpointFile>; 3] = Default::default();

    for file in files {
        let Some(role) = Role::from_file_name(&file.file_name()) else {
            reporter.report(RestartEvent::UnrecognizedCheckpoint {
                path: file.path.clone(),
            });
            return Err(ResolveError::UnrecognizedName {
                path: file.path.clone(),
            });
        };

        let slot = &mut slots[role as usize];
        if let Some(existing) = slot {
            reporter.report(RestartEvent::DuplicateCheckpoint {
                role,
                path: file.path.clone(),
            });
            return Err(ResolveError::DuplicateRole {
                role,
                first: existing.path.clone(),
                second: file.path.clone(),
            });
        }
        *slot = Some(CheckpointFile {
            path: file.path.clone(),
            size: file.size,
            role,
            generation,
        });
    }

    let [xsc, coor, vel] = slots;
    let take = |slot: Option<CheckpointFile>, role: Role| {
        slot.ok_or(ResolveError::MissingRole { role, generation })
    };

    Ok(CheckpointSet::new(
        take(xsc, Role::Xsc)?,
        take(coor, Role::Coor)?,
        take(vel, Role::Vel)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::report::Severity;
    use crate::engine::report::testing::recording_reporter;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn touch(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn write_triple(dir: &TempDir, suffix: &str, empty: &[Role]) {
        for role in Role::ALL {
            let content = if empty.contains(&role) { "" } else { "data" };
            touch(dir, &format!("md{}{}", role.fragment(), suffix), content);
        }
    }

    #[test]
    fn current_generation_wins_over_old_and_backup() {
        let dir = tempdir().unwrap();
        write_triple(&dir, "", &[]);
        write_triple(&dir, ".old", &[]);
        write_triple(&dir, ".bak", &[]);

        let set = resolve(dir.path(), &Reporter::silent()).unwrap();

        assert_eq!(set.generation(), Generation::Current);
        assert_eq!(set.xsc(), dir.path().join("md.restart.xsc"));
        assert_eq!(set.coor(), dir.path().join("md.restart.coor"));
        assert_eq!(set.vel(), dir.path().join("md.restart.vel"));
    }

    #[test]
    fn empty_current_files_fall_back_to_old_with_a_warning() {
        let dir = tempdir().unwrap();
        write_triple(&dir, "", &Role::ALL);
        write_triple(&dir, ".old", &[]);
        write_triple(&dir, ".bak", &[]);
        let (reporter, events) = recording_reporter();

        let set = resolve(dir.path(), &reporter).unwrap();

        assert_eq!(set.generation(), Generation::Aged);
        assert_eq!(set.vel(), dir.path().join("md.restart.vel.old"));
        let events = events.lock().unwrap();
        assert!(events.iter().any(|e| {
            *e == RestartEvent::GenerationFallback {
                generation: Generation::Aged,
            } && e.severity() == Severity::Warning
        }));
    }

    #[test]
    fn a_single_empty_file_rejects_its_whole_generation() {
        let dir = tempdir().unwrap();
        write_triple(&dir, "", &[Role::Vel]);
        write_triple(&dir, ".old", &[Role::Coor]);
        write_triple(&dir, ".bak", &[]);

        let set = resolve(dir.path(), &Reporter::silent()).unwrap();

        assert_eq!(set.generation(), Generation::Backup);
        assert_eq!(set.xsc(), dir.path().join("md.restart.xsc.bak"));
    }

    #[test]
    fn empty_coordinates_without_fallback_fails() {
        let dir = tempdir().unwrap();
        write_triple(&dir, "", &[Role::Coor]);
        let (reporter, events) = recording_reporter();

        let result = resolve(dir.path(), &reporter);

        assert!(matches!(result, Err(ResolveError::Unusable { .. })));
        let events = events.lock().unwrap();
        assert!(matches!(
            events.last(),
            Some(RestartEvent::CheckpointsUnusable { .. })
        ));
    }

    #[test]
    fn incomplete_generations_are_skipped() {
        let dir = tempdir().unwrap();
        touch(&dir, "md.restart.xsc", "data");
        touch(&dir, "md.restart.coor", "data");
        write_triple(&dir, ".old", &[]);

        let set = resolve(dir.path(), &Reporter::silent()).unwrap();

        assert_eq!(set.generation(), Generation::Aged);
    }

    #[test]
    fn missing_or_unmatched_directory_is_not_found() {
        let dir = tempdir().unwrap();
        touch(&dir, "md.conf", "run 10\n");

        assert!(matches!(
            resolve(dir.path(), &Reporter::silent()),
            Err(ResolveError::NotFound { .. })
        ));
        assert!(matches!(
            resolve(&dir.path().join("missing"), &Reporter::silent()),
            Err(ResolveError::NotFound { .. })
        ));
    }

    #[test]
    fn restart_like_name_without_role_is_fatal() {
        let dir = tempdir().unwrap();
        write_triple(&dir, "", &[]);
        touch(&dir, "restart_notes.xsc", "data");
        write_triple(&dir, ".old", &[]);

        let result = resolve(dir.path(), &Reporter::silent());

        assert!(matches!(
            result,
            Err(ResolveError::UnrecognizedName { path }) if path.ends_with("restart_notes.xsc")
        ));
    }

    #[test]
    fn duplicate_roles_are_rejected() {
        let dir = tempdir().unwrap();
        write_triple(&dir, "", &[]);
        touch(&dir, "other.restart.xsc", "data");

        let result = resolve(dir.path(), &Reporter::silent());

        assert!(matches!(
            result,
            Err(ResolveError::DuplicateRole {
                role: Role::Xsc,
                ..
            })
        ));
    }

    #[test]
    fn a_repeated_role_inside_a_triple_is_a_duplicate() {
        let dir = tempdir().unwrap();
        touch(&dir, "a.restart.vel", "data");
        touch(&dir, "b.restart.vel", "data");
        touch(&dir, "c.restart.coor", "data");

        let result = resolve(dir.path(), &Reporter::silent());

        assert!(matches!(
            result,
            Err(ResolveError::DuplicateRole { role: Role::Vel, .. })
        ));
    }

    #[test]
    fn scan_descends_into_subdirectories_and_ignores_other_files() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/md.restart.coor"), "abc").unwrap();
        touch(&dir, "md.dcd", "data");

        let found = scan(dir.path()).unwrap();

        assert_eq!(
            found,
            vec![ScannedFile {
                path: dir.path().join("nested/md.restart.coor"),
                size: 3,
            }]
        );
    }
}
