use crate::error::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Snapshot name with one-second resolution. Two events in the same second
/// map to the same file and the later one overwrites the earlier.
pub fn snapshot_filename(at: DateTime<Local>) -> String {
    format!("motion_{}.jpg", at.format("%Y%m%d_%H%M%S"))
}

/// Write already-encoded JPEG bytes into `dir` under the timestamped name
pub async fn write_snapshot(dir: &Path, jpeg: &[u8], at: DateTime<Local>) -> Result<PathBuf> {
    let path = dir.join(snapshot_filename(at));
    tokio::fs::write(&path, jpeg).await?;
    debug!("Wrote {} byte snapshot to {}", jpeg.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, h, m, s).unwrap()
    }

    #[test]
    fn test_filename_format() {
        assert_eq!(snapshot_filename(at(7, 5, 3)), "motion_20240309_070503.jpg");
    }

    #[tokio::test]
    async fn test_same_second_overwrites() {
        let dir = tempfile::tempdir().unwrap();

        let first = write_snapshot(dir.path(), b"first", at(12, 0, 0)).await.unwrap();
        let second = write_snapshot(dir.path(), b"second", at(12, 0, 0)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&second).unwrap(), b"second");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");

        assert!(write_snapshot(&missing, b"jpeg", at(12, 0, 1)).await.is_err());
        assert!(!missing.exists());
    }
}
