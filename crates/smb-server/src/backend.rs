//! The filesystem abstraction every handler goes through (component F). A deployment
//! supplies its own [`FilesystemBackend`]; [`StdFsBackend`] is the `std::fs`-backed default
//! used by tests and the demo binary, not hardened for production exposure.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{Result, ServerError};

#[derive(Debug, Clone)]
pub struct FileStat {
    pub size: u64,
    pub is_directory: bool,
    pub modified: SystemTime,
    pub created: SystemTime,
    pub readonly: bool,
}

#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub stat: FileStat,
}

#[derive(Debug, Clone, Copy)]
pub struct StatFs {
    pub total_bytes: u64,
    pub free_bytes: u64,
}

/// Everything a handler needs from a share's underlying storage. All paths are relative to
/// the share root; the backend is responsible for keeping them confined to it.
pub trait FilesystemBackend: Send + Sync {
    fn stat(&self, share_root: &Path, rel_path: &str) -> Result<FileStat>;
    fn read(&self, share_root: &Path, rel_path: &str, offset: u64, len: usize) -> Result<Vec<u8>>;
    fn write(&self, share_root: &Path, rel_path: &str, offset: u64, data: &[u8]) -> Result<u32>;
    fn truncate(&self, share_root: &Path, rel_path: &str, len: u64) -> Result<()>;
    fn create(&self, share_root: &Path, rel_path: &str, is_directory: bool) -> Result<()>;
    fn unlink(&self, share_root: &Path, rel_path: &str) -> Result<()>;
    fn rmdir(&self, share_root: &Path, rel_path: &str) -> Result<()>;
    fn rename(&self, share_root: &Path, from_rel: &str, to_rel: &str) -> Result<()>;
    fn readdir(&self, share_root: &Path, rel_path: &str) -> Result<Vec<DirEntry>>;
    fn statfs(&self, share_root: &Path) -> Result<StatFs>;
    fn fsync(&self, share_root: &Path, rel_path: &str) -> Result<()>;
}

fn resolve(share_root: &Path, rel_path: &str) -> PathBuf {
    share_root.join(rel_path.trim_start_matches(['\\', '/']).replace('\\', "/"))
}

/// `std::fs`-backed default implementation; adequate for tests and local demos, not a
/// hardened production filesystem layer (no quota, no ACL translation).
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFsBackend;

impl FilesystemBackend for StdFsBackend {
    fn stat(&self, share_root: &Path, rel_path: &str) -> Result<FileStat> {
        let meta = std::fs::metadata(resolve(share_root, rel_path))?;
        Ok(FileStat {
            size: meta.len(),
            is_directory: meta.is_dir(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            created: meta.created().unwrap_or(SystemTime::UNIX_EPOCH),
            readonly: meta.permissions().readonly(),
        })
    }

    fn read(&self, share_root: &Path, rel_path: &str, offset: u64, len: usize) -> Result<Vec<u8>> {
        use std::io::{Read, Seek, SeekFrom};
        let mut file = std::fs::File::open(resolve(share_root, rel_path))?;
        file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len];
        let n = file.read(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    fn write(&self, share_root: &Path, rel_path: &str, offset: u64, data: &[u8]) -> Result<u32> {
        use std::io::{Seek, SeekFrom, Write};
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .open(resolve(share_root, rel_path))?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(data)?;
        Ok(data.len() as u32)
    }

    fn truncate(&self, share_root: &Path, rel_path: &str, len: u64) -> Result<()> {
        let path = resolve(share_root, rel_path);
        if std::fs::metadata(&path)?.is_dir() {
            return Err(ServerError::InvalidDeviceRequest);
        }
        let file = std::fs::OpenOptions::new().write(true).open(path)?;
        file.set_len(len)?;
        Ok(())
    }

    fn create(&self, share_root: &Path, rel_path: &str, is_directory: bool) -> Result<()> {
        let path = resolve(share_root, rel_path);
        if is_directory {
            std::fs::create_dir(path)?;
        } else {
            std::fs::File::create(path)?;
        }
        Ok(())
    }

    fn unlink(&self, share_root: &Path, rel_path: &str) -> Result<()> {
        std::fs::remove_file(resolve(share_root, rel_path))?;
        Ok(())
    }

    fn rmdir(&self, share_root: &Path, rel_path: &str) -> Result<()> {
        let path = resolve(share_root, rel_path);
        if std::fs::read_dir(&path)?.next().is_some() {
            return Err(ServerError::DirectoryNotEmpty);
        }
        std::fs::remove_dir(path)?;
        Ok(())
    }

    fn rename(&self, share_root: &Path, from_rel: &str, to_rel: &str) -> Result<()> {
        std::fs::rename(resolve(share_root, from_rel), resolve(share_root, to_rel))?;
        Ok(())
    }

    fn readdir(&self, share_root: &Path, rel_path: &str) -> Result<Vec<DirEntry>> {
        let path = resolve(share_root, rel_path);
        let mut out = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            out.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                stat: FileStat {
                    size: meta.len(),
                    is_directory: meta.is_dir(),
                    modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                    created: meta.created().unwrap_or(SystemTime::UNIX_EPOCH),
                    readonly: meta.permissions().readonly(),
                },
            });
        }
        Ok(out)
    }

    fn statfs(&self, _share_root: &Path) -> Result<StatFs> {
        // `std::fs` has no portable free-space query; report a generous fixed figure.
        Ok(StatFs {
            total_bytes: 1 << 40,
            free_bytes: 1 << 39,
        })
    }

    fn fsync(&self, share_root: &Path, rel_path: &str) -> Result<()> {
        std::fs::OpenOptions::new()
            .write(true)
            .open(resolve(share_root, rel_path))?
            .sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_file_through_std_fs() {
        let dir = std::env::temp_dir().join(format!("smb-server-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let backend = StdFsBackend;
        backend.create(&dir, "a.txt", false).unwrap();
        let written = backend.write(&dir, "a.txt", 0, b"hello").unwrap();
        assert_eq!(written, 5);
        let read = backend.read(&dir, "a.txt", 0, 5).unwrap();
        assert_eq!(read, b"hello");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn rmdir_rejects_nonempty_directory() {
        let dir = std::env::temp_dir().join(format!("smb-server-test-nonempty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let backend = StdFsBackend;
        backend.create(&dir, "child", true).unwrap();
        assert!(matches!(
            backend.rmdir(&dir, ""),
            Err(ServerError::DirectoryNotEmpty)
        ));
        std::fs::remove_dir_all(&dir).ok();
    }
}
