//! File upload values and the inspector that reads file metadata

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpload {
    pub name: String,
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Content type guessed from the extension
    pub mime: String,
}

/// Optional upload, `null` in the values record when nothing is picked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadSlot(pub Option<FileUpload>);

impl UploadSlot {
    pub fn file(&self) -> Option<&FileUpload> {
        self.0.as_ref()
    }
}

/// Reads metadata for a path typed into a file field.
///
/// Abstracted so components can be tested without a filesystem.
#[cfg_attr(test, mockall::automock)]
pub trait FileInspector {
    fn inspect(&self, path: &Path) -> std::io::Result<FileUpload>;
}

/// Inspector backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsInspector;

impl FileInspector for FsInspector {
    fn inspect(&self, path: &Path) -> std::io::Result<FileUpload> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(FileUpload {
            name,
            path: path.to_path_buf(),
            size: metadata.len(),
            mime: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_fs_inspector_reads_size_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 128]).unwrap();

        let upload = FsInspector.inspect(&path).unwrap();
        assert_eq!(upload.name, "report.xlsx");
        assert_eq!(upload.size, 128);
        assert_eq!(
            upload.mime,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn test_fs_inspector_unknown_extension_is_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.zzzunknown");
        fs::write(&path, b"x").unwrap();
        assert_eq!(FsInspector.inspect(&path).unwrap().mime, "application/octet-stream");
    }

    #[test]
    fn test_fs_inspector_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsInspector.inspect(&dir.path().join("missing.xlsx")).is_err());
    }

    #[test]
    fn test_fs_inspector_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsInspector.inspect(dir.path()).is_err());
    }

    #[test]
    fn test_empty_slot_serializes_as_null() {
        assert_eq!(serde_json::to_value(UploadSlot::default()).unwrap(), json!(null));
        let slot: UploadSlot = serde_json::from_value(json!(null)).unwrap();
        assert!(slot.file().is_none());
    }
}
