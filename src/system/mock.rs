//! Mock system implementation for testing

#![expect(clippy::module_name_repetitions)]

use super::{System, WalkEntry};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem and working directory,
/// perfect for fast, isolated unit tests without side effects.
///
/// # Example
/// ```
/// use sparsepick::system::{mock::MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_current_dir("/work").unwrap()
///     .with_file("/work/notes.txt", b"Hello, world!").unwrap()
///     .with_dir("/work/subdir").unwrap();
///
/// assert_eq!(system.current_dir().unwrap(), Path::new("/work"));
/// assert!(system.exists(Path::new("/work/notes.txt")));
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    current_dir: PathBuf,
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    renames_cross_devices: bool,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                current_dir: PathBuf::from("/"),
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
                renames_cross_devices: false,
            })),
        }
    }

    /// Set the current working directory (builder pattern)
    ///
    /// The directory is created if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The state lock is poisoned
    #[inline]
    pub fn with_current_dir<P: AsRef<Path>>(self, dir: P) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let dir = dir.as_ref().to_path_buf();
        Self::ensure_parent_dirs(&mut state.dirs, &dir);
        state.current_dir = dir;
        drop(state);
        Ok(self)
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if let Some(parent) = path_buf.parent() {
            Self::ensure_parent_dirs(&mut state.dirs, parent);
        }

        state.files.insert(path_buf, contents.to_vec());
        drop(state);
        Ok(self)
    }

    /// Add a directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The state lock is poisoned
    #[inline]
    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Self::ensure_parent_dirs(&mut state.dirs, &path_buf);
        drop(state);
        Ok(self)
    }

    /// Make every `rename` fail as if source and destination were on
    /// different filesystems (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The state lock is poisoned
    #[inline]
    pub fn with_cross_device_renames(self) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.renames_cross_devices = true;
        drop(state);
        Ok(self)
    }

    /// List every path (files and directories) under `root`, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The state lock is poisoned
    #[inline]
    pub fn paths_under(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let mut paths: Vec<PathBuf> = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter(|p| p.starts_with(root) && p.as_path() != root)
            .cloned()
            .collect();
        drop(state);
        paths.sort();
        Ok(paths)
    }

    #[inline]
    fn relocated(to: &Path, relative: &Path) -> PathBuf {
        if relative.as_os_str().is_empty() {
            to.to_path_buf()
        } else {
            to.join(relative)
        }
    }

    #[inline]
    fn ensure_parent_dirs(dirs: &mut HashSet<PathBuf>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor == Path::new("") {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    fn current_dir(&self) -> io::Result<PathBuf> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Ok(state.current_dir.clone())
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let bytes = state.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        let result = bytes.clone();
        drop(state);
        String::from_utf8(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if let Some(parent) = path.parent()
            && !state.dirs.contains(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        state.files.insert(path.to_path_buf(), contents.to_vec());
        drop(state);
        Ok(())
    }

    #[inline]
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Self::ensure_parent_dirs(&mut state.dirs, path);
        drop(state);
        Ok(())
    }

    #[inline]
    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Directory not found: {}", path.display()),
            ));
        }

        state.files.retain(|p, _| !p.starts_with(path));
        state.dirs.retain(|p| !p.starts_with(path));
        drop(state);
        Ok(())
    }

    #[inline]
    #[expect(clippy::as_conversions, reason = "This is for usize to u64 conversion")]
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        let contents = {
            let state = self
                .state
                .read()
                .map_err(|e| io::Error::other(e.to_string()))?;
            state
                .files
                .get(from)
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("Source file not found: {}", from.display()),
                    )
                })?
                .clone()
        };

        let size = contents.len() as u64;

        self.write(to, &contents)?;
        Ok(size)
    }

    #[inline]
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if state.renames_cross_devices {
            return Err(io::Error::new(
                io::ErrorKind::CrossesDevices,
                "Invalid cross-device link",
            ));
        }

        if !state.files.contains_key(from) && !state.dirs.contains(from) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Source not found: {}", from.display()),
            ));
        }

        if state.files.contains_key(to) || state.dirs.contains(to) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Destination exists: {}", to.display()),
            ));
        }

        if let Some(parent) = to.parent()
            && !state.dirs.contains(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        let moved_files: Vec<(PathBuf, Vec<u8>)> = state
            .files
            .iter()
            .filter(|(p, _)| p.starts_with(from))
            .map(|(p, c)| (p.clone(), c.clone()))
            .collect();
        let moved_dirs: Vec<PathBuf> = state
            .dirs
            .iter()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();

        for (path, contents) in moved_files {
            state.files.remove(&path);
            if let Ok(relative) = path.strip_prefix(from) {
                state.files.insert(Self::relocated(to, relative), contents);
            }
        }

        for path in moved_dirs {
            state.dirs.remove(&path);
            if let Ok(relative) = path.strip_prefix(from) {
                state.dirs.insert(Self::relocated(to, relative));
            }
        }

        drop(state);
        Ok(())
    }

    #[inline]
    fn exists(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.files.contains_key(path) || state.dirs.contains(path))
    }

    #[inline]
    fn is_file(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.files.contains_key(path))
    }

    #[inline]
    fn is_dir(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.dirs.contains(path))
    }

    #[inline]
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Directory not found: {}", path.display()),
            ));
        }

        let mut entries: Vec<PathBuf> = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter(|p| p.parent() == Some(path) && p.as_path() != path)
            .cloned()
            .collect();

        drop(state);
        entries.sort();

        Ok(entries)
    }

    #[inline]
    fn walk_dir(&self, path: &Path) -> io::Result<Vec<WalkEntry>> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Directory not found: {}", path.display()),
            ));
        }

        let mut entries: Vec<WalkEntry> = state
            .dirs
            .iter()
            .filter(|p| p.starts_with(path) && p.as_path() != path)
            .map(|p| WalkEntry {
                path: p.clone(),
                is_file: false,
                is_dir: true,
            })
            .chain(
                state
                    .files
                    .keys()
                    .filter(|p| p.starts_with(path))
                    .map(|p| WalkEntry {
                        path: p.clone(),
                        is_file: true,
                        is_dir: false,
                    }),
            )
            .collect();

        drop(state);

        // Sort entries by path so parents precede their children
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_moves_whole_tree() {
        let system = MockSystem::new()
            .with_file("/ws/services/api/main.rs", b"fn main() {}")
            .unwrap()
            .with_file("/ws/services/api/src/lib.rs", b"")
            .unwrap()
            .with_dir("/work")
            .unwrap();

        system
            .rename(Path::new("/ws/services/api"), Path::new("/work/api"))
            .unwrap();

        assert!(!system.exists(Path::new("/ws/services/api")));
        assert!(system.is_file(Path::new("/work/api/main.rs")));
        assert!(system.is_file(Path::new("/work/api/src/lib.rs")));
        assert!(system.is_dir(Path::new("/work/api/src")));
        assert!(system.is_dir(Path::new("/ws/services")));
    }

    #[test]
    fn test_rename_refuses_existing_destination() {
        let system = MockSystem::new()
            .with_dir("/a")
            .unwrap()
            .with_dir("/b")
            .unwrap();

        let err = system.rename(Path::new("/a"), Path::new("/b")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_cross_device_renames() {
        let system = MockSystem::new()
            .with_dir("/a")
            .unwrap()
            .with_cross_device_renames()
            .unwrap();

        let err = system.rename(Path::new("/a"), Path::new("/b")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::CrossesDevices);
        assert!(system.exists(Path::new("/a")));
    }

    #[test]
    fn test_remove_dir_all_removes_descendants() {
        let system = MockSystem::new()
            .with_file("/ws/.git/HEAD", b"ref: refs/heads/main")
            .unwrap()
            .with_file("/ws/README.md", b"")
            .unwrap();

        system.remove_dir_all(Path::new("/ws")).unwrap();

        assert!(!system.exists(Path::new("/ws")));
        assert!(system.paths_under(Path::new("/ws")).unwrap().is_empty());
        assert!(system.remove_dir_all(Path::new("/ws")).is_err());
    }

    #[test]
    fn test_walk_dir_lists_parents_first() {
        let system = MockSystem::new()
            .with_file("/root/a/b/c.txt", b"c")
            .unwrap();

        let entries = system.walk_dir(Path::new("/root")).unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.clone()).collect();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("/root/a"),
                PathBuf::from("/root/a/b"),
                PathBuf::from("/root/a/b/c.txt"),
            ]
        );
        assert!(entries[2].is_file);
    }

    #[test]
    fn test_read_dir_direct_children_only() {
        let system = MockSystem::new()
            .with_file("/ws/top.txt", b"")
            .unwrap()
            .with_file("/ws/dir/nested.txt", b"")
            .unwrap();

        let entries = system.read_dir(Path::new("/ws")).unwrap();
        assert_eq!(
            entries,
            vec![PathBuf::from("/ws/dir"), PathBuf::from("/ws/top.txt")]
        );
    }
}
