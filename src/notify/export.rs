use crate::check::CheckSummary;
use crate::error::NotifyError;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Write the summary as pretty JSON to a timestamped file under `dir`,
/// creating the directory if needed. Returns the written path.
pub fn export_summary(dir: &Path, summary: &CheckSummary) -> Result<PathBuf, NotifyError> {
    std::fs::create_dir_all(dir)?;

    let name = format!("linkscout-{}.json", Utc::now().format("%Y%m%dT%H%M%SZ"));
    let path = dir.join(name);
    let body = serde_json::to_vec_pretty(summary).map_err(std::io::Error::other)?;
    std::fs::write(&path, body)?;

    tracing::info!(path = %path.display(), "summary exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let summary = CheckSummary {
            total_posts: 2,
            total_links: 9,
            ..CheckSummary::default()
        };

        let path = export_summary(dir.path(), &summary).unwrap();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("linkscout-"));

        let raw = std::fs::read_to_string(&path).unwrap();
        let decoded: CheckSummary = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded.total_posts, 2);
        assert_eq!(decoded.total_links, 9);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = export_summary(&nested, &CheckSummary::default()).unwrap();
        assert!(path.starts_with(&nested));
    }
}
