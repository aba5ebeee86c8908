use anyhow::{bail, Context, Result};
use courtmap_shared::{Point, ViewportRegion};
use std::collections::HashSet;
use std::path::Path;

/// Load a JSON array of courts.
///
/// Ids must be unique and coordinates finite, otherwise cluster membership
/// would be ambiguous.
pub fn load_courts(path: &Path) -> Result<Vec<Point>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let courts: Vec<Point> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse courts from {}", path.display()))?;

    let mut seen = HashSet::with_capacity(courts.len());
    for court in &courts {
        if !seen.insert(court.id.as_str()) {
            bail!("Duplicate court id {:?} in {}", court.id, path.display());
        }
        if !court.latitude.is_finite() || !court.longitude.is_finite() {
            bail!("Court {:?} has non-finite coordinates", court.id);
        }
    }

    tracing::info!(courts = courts.len(), path = %path.display(), "Loaded courts");
    Ok(courts)
}

/// Load a JSON array of viewport regions, oldest first.
pub fn load_regions(path: &Path) -> Result<Vec<ViewportRegion>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let regions: Vec<ViewportRegion> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse regions from {}", path.display()))?;
    tracing::info!(regions = regions.len(), path = %path.display(), "Loaded viewport regions");
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a temp dir with a single file and return the dir and file path.
    fn temp_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_courts() {
        let (_dir, path) = temp_file(
            r#"[
                {"id": "rucker", "latitude": 40.8296, "longitude": -73.9362, "playerCount": 24,
                 "avatars": ["u1.png", "u2.png"]},
                {"id": "west4", "latitude": 40.7311, "longitude": -74.0011, "playerCount": 9}
            ]"#,
        );
        let courts = load_courts(&path).unwrap();
        assert_eq!(courts.len(), 2);
        assert_eq!(courts[0].id, "rucker");
        assert_eq!(courts[0].avatars.len(), 2);
        assert!(courts[1].avatars.is_empty());
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = load_courts(&path).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_malformed_json() {
        let (_dir, path) = temp_file(r#"[{"id": "x", "latitude": "north"}]"#);
        let err = load_courts(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse courts"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let (_dir, path) = temp_file(
            r#"[
                {"id": "a", "latitude": 1.0, "longitude": 1.0, "playerCount": 1},
                {"id": "a", "latitude": 2.0, "longitude": 2.0, "playerCount": 1}
            ]"#,
        );
        let err = load_courts(&path).unwrap_err();
        assert!(err.to_string().contains("Duplicate court id"));
    }

    #[test]
    fn test_load_regions() {
        let (_dir, path) = temp_file(
            r#"[
                {"latitude": 40.7, "longitude": -74.0, "latitudeDelta": 0.05, "longitudeDelta": 0.05},
                {"latitudeDelta": 0.01, "longitudeDelta": 0.01}
            ]"#,
        );
        let regions = load_regions(&path).unwrap();
        assert_eq!(regions.len(), 2);
        assert!((regions[1].latitude_delta - 0.01).abs() < 1e-12);
    }
}
