use std::path::{Path, PathBuf};

/// Folder created under the user's pictures directory by default
pub const DEFAULT_SAVE_FOLDER: &str = "WebcamCaptures";

/// Where snapshots are written
///
/// Setting a new directory replaces the old one outright. Nothing is checked
/// at set time; the snapshot pipeline creates the directory when it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveLocation {
    dir: PathBuf,
}

impl SaveLocation {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn get(&self) -> &Path {
        &self.dir
    }

    pub fn set(&mut self, dir: impl Into<PathBuf>) {
        self.dir = dir.into();
        tracing::debug!("Save directory set to {}", self.dir.display());
    }
}

impl Default for SaveLocation {
    /// `<pictures>/WebcamCaptures`, or under the home directory when the
    /// platform has no pictures directory
    fn default() -> Self {
        let base = dirs::picture_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(DEFAULT_SAVE_FOLDER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_what_was_set() {
        let mut location = SaveLocation::default();

        location.set("/tmp/snaps");
        assert_eq!(location.get(), Path::new("/tmp/snaps"));

        location.set(PathBuf::from("relative/dir"));
        assert_eq!(location.get(), Path::new("relative/dir"));
    }

    #[test]
    fn set_does_not_touch_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b");

        let mut location = SaveLocation::new(dir.path());
        location.set(&target);

        assert_eq!(location.get(), target.as_path());
        assert!(!target.exists());
    }

    #[test]
    fn default_ends_with_capture_folder() {
        let location = SaveLocation::default();
        assert!(location.get().ends_with(DEFAULT_SAVE_FOLDER));
    }
}
