//! Checkpoint (restart) files written by NAMD and the logic that picks which ones to resume from.
//!
//! NAMD periodically writes a triple of restart files: the extended-system state
//! (`.restart.xsc`), binary coordinates (`.restart.coor`) and binary velocities
//! (`.restart.vel`). Before overwriting them it renames the previous triple with an
//! `.old` suffix, and this tool can additionally keep `.bak` copies while a simulation
//! runs. The [`resolver`] chooses one complete, non-empty generation out of those.

pub mod backup;
pub mod resolver;

use std::fmt;
use std::path::{Path, PathBuf};

/// Which file of the restart triple a path holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Xsc,
    Coor,
    Vel,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Xsc, Role::Coor, Role::Vel];

    /// Filename fragment identifying this role.
    pub fn fragment(self) -> &'static str {
        match self {
            Role::Xsc => ".restart.xsc",
            Role::Coor => ".restart.coor",
            Role::Vel => ".restart.vel",
        }
    }

    /// Infers the role from a file name. The first matching fragment wins.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| name.contains(role.fragment()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Xsc => "xsc",
            Role::Coor => "coor",
            Role::Vel => "vel",
        };
        f.write_str(name)
    }
}

/// The age of a restart file, in resolution priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Generation {
    Current,
    Aged,
    Backup,
}

impl Generation {
    pub const PRIORITY: [Generation; 3] =
        [Generation::Current, Generation::Aged, Generation::Backup];

    /// Classifies a file name by its trailing suffix, or `None` if it belongs to no generation.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".xsc") || name.ends_with(".coor") || name.ends_with(".vel") {
            Some(Generation::Current)
        } else if name.ends_with(".old") {
            Some(Generation::Aged)
        } else if name.ends_with(".bak") {
            Some(Generation::Backup)
        } else {
            None
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Generation::Current => "current",
            Generation::Aged => "old",
            Generation::Backup => "backup",
        };
        f.write_str(name)
    }
}

/// A restart file found on disk, annotated with its size in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointFile {
    pub path: PathBuf,
    pub size: u64,
    pub role: Role,
    pub generation: Generation,
}

impl CheckpointFile {
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// One complete restart triple, all from the same generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointSet {
    xsc: CheckpointFile,
    coor: CheckpointFile,
    vel: CheckpointFile,
}

impl CheckpointSet {
    pub(crate) fn new(xsc: CheckpointFile, coor: CheckpointFile, vel: CheckpointFile) -> Self {
        debug_assert!(xsc.generation == coor.generation && coor.generation == vel.generation);
        Self { xsc, coor, vel }
    }

    pub fn get(&self, role: Role) -> &CheckpointFile {
        match role {
            Role::Xsc => &self.xsc,
            Role::Coor => &self.coor,
            Role::Vel => &self.vel,
        }
    }

    pub fn xsc(&self) -> &Path {
        &self.xsc.path
    }

    pub fn coor(&self) -> &Path {
        &self.coor.path
    }

    pub fn vel(&self) -> &Path {
        &self.vel.path
    }

    pub fn generation(&self) -> Generation {
        self.xsc.generation
    }

    pub fn files(&self) -> impl Iterator<Item = &CheckpointFile> {
        Role::ALL.into_iter().map(move |role| self.get(role))
    }

    /// Base name for the restarted run: the `xsc` file name up to `.restart.xsc`.
    pub fn output_name(&self) -> String {
        let file_name = self
            .xsc
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        match file_name.find(Role::Xsc.fragment()) {
            Some(end) => file_name[..end].to_string(),
            None => file_name,
        }
    }
}
