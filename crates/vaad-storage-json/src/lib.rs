use std::{
    cmp::Reverse,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, warn};
use vaad_core::{
    storage::{SnapshotBackupInfo, SnapshotStorage},
    CoreError,
};
use vaad_domain::LedgerSnapshot;

const SNAPSHOT_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Directory pair a [`JsonSnapshotStorage`] writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub snapshot_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `<data_root>/snapshots` with backups under `backup_root`.
    pub fn under(data_root: &Path, backup_root: &Path) -> Self {
        Self {
            snapshot_root: data_root.join("snapshots"),
            backup_root: backup_root.to_path_buf(),
        }
    }
}

/// Filesystem-backed JSON persistence for building snapshots and their backups.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStorage {
    snapshots_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonSnapshotStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths.snapshot_root, paths.backup_root, DEFAULT_RETENTION)
    }

    /// Keeps at most `retention` backups per snapshot (minimum one).
    pub fn with_retention(
        snapshots_dir: PathBuf,
        backups_dir: PathBuf,
        retention: usize,
    ) -> Result<Self, CoreError> {
        fs::create_dir_all(&snapshots_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            snapshots_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn snapshots_dir(&self) -> &Path {
        &self.snapshots_dir
    }

    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.snapshots_dir
            .join(format!("{}.{}", canonical_name(name), SNAPSHOT_EXTENSION))
    }

    /// One row per stored snapshot, sorted by building name.
    pub fn list_snapshot_metadata(&self) -> Result<Vec<SnapshotMetadata>, CoreError> {
        let mut rows = Vec::new();
        for slug in self.list_snapshots()? {
            let snapshot = self.load_snapshot(&slug)?;
            rows.push(SnapshotMetadata {
                path: self.snapshot_path(&slug),
                building: snapshot.building.clone(),
                created_at: snapshot.created_at,
                updated_at: snapshot.updated_at,
                resident_count: snapshot.residents.len(),
                record_count: snapshot.record_count(),
                slug,
            });
        }
        rows.sort_by(|a, b| a.building.cmp(&b.building).then_with(|| a.slug.cmp(&b.slug)));
        Ok(rows)
    }

    pub fn delete_backup(&self, backup: &SnapshotBackupInfo) -> Result<(), CoreError> {
        match fs::remove_file(&backup.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn backup_file_name(&self, name: &str, note: Option<&str>) -> (String, String) {
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let stem = match sanitize_backup_note(note) {
            Some(label) => format!("{}_{}_{}", canonical_name(name), timestamp, label),
            None => format!("{}_{}", canonical_name(name), timestamp),
        };
        (format!("{stem}.{SNAPSHOT_EXTENSION}"), timestamp)
    }

    /// Copies the current file aside before it is overwritten.
    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let (file_name, _) = self.backup_file_name(name, None);
        fs::copy(path, dir.join(file_name))?;
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<(), CoreError> {
        for stale in self.list_backups(name)?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&stale.path) {
                warn!(backup = %stale.path.display(), error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl SnapshotStorage for JsonSnapshotStorage {
    fn save_snapshot(&self, name: &str, snapshot: &LedgerSnapshot) -> Result<(), CoreError> {
        let path = self.snapshot_path(name);
        self.backup_existing_file(name, &path)?;
        write_snapshot(snapshot, &path)?;
        debug!(snapshot = name, path = %path.display(), "snapshot saved");
        Ok(())
    }

    fn load_snapshot(&self, name: &str) -> Result<LedgerSnapshot, CoreError> {
        let path = self.snapshot_path(name);
        if !path.is_file() {
            return Err(CoreError::SnapshotNotFound(name.to_string()));
        }
        read_snapshot(&path)
    }

    fn list_snapshots(&self) -> Result<Vec<String>, CoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.snapshots_dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_snapshot(&self, name: &str) -> Result<(), CoreError> {
        let path = self.snapshot_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn load_snapshot_from_path(&self, path: &Path) -> Result<LedgerSnapshot, CoreError> {
        read_snapshot(path)
    }

    fn backup_snapshot(
        &self,
        name: &str,
        snapshot: &LedgerSnapshot,
        note: Option<&str>,
    ) -> Result<SnapshotBackupInfo, CoreError> {
        let dir = self.backup_dir(name);
        let (file_name, created_at) = self.backup_file_name(name, note);
        let path = dir.join(&file_name);
        write_snapshot(snapshot, &path)?;
        self.prune_backups(name)?;
        Ok(SnapshotBackupInfo {
            snapshot: canonical_name(name),
            id: file_name,
            created_at,
            path,
        })
    }

    /// Newest first.
    fn list_backups(&self, name: &str) -> Result<Vec<SnapshotBackupInfo>, CoreError> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(name);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let created_at = parse_backup_timestamp(file_name)
                .map(|stamp| stamp.format(BACKUP_TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default();
            entries.push(SnapshotBackupInfo {
                snapshot: slug.clone(),
                id: file_name.to_string(),
                created_at,
                path: path.clone(),
            });
        }
        entries.sort_by(|a, b| {
            Reverse(parse_backup_timestamp(&a.id))
                .cmp(&Reverse(parse_backup_timestamp(&b.id)))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    fn restore_backup(&self, backup: &SnapshotBackupInfo) -> Result<LedgerSnapshot, CoreError> {
        if !backup.path.is_file() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let snapshot = read_snapshot(&backup.path)?;
        write_snapshot(&snapshot, &self.snapshot_path(&backup.snapshot))?;
        Ok(snapshot)
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotMetadata {
    pub slug: String,
    pub building: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resident_count: usize,
    pub record_count: usize,
}

fn read_snapshot(path: &Path) -> Result<LedgerSnapshot, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

fn write_snapshot(snapshot: &LedgerSnapshot, path: &Path) -> Result<(), CoreError> {
    let json =
        serde_json::to_string_pretty(snapshot).map_err(|err| CoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Lowercase ASCII slug; anything else becomes `_`.
fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '-').is_empty() {
        "building".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let mut sanitized = String::new();
    for ch in note?.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
        } else if !sanitized.is_empty() && !sanitized.ends_with('-') {
            sanitized.push('-');
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Finds the `YYYYMMDD_HHMM` pair anywhere in a backup file name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{SNAPSHOT_EXTENSION}"))?;
    let segments: Vec<&str> = stem.split('_').collect();
    segments.windows(2).rev().find_map(|pair| {
        if !is_digits(pair[0], 8) || !is_digits(pair[1], 4) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{}{}", pair[0], pair[1]), "%Y%m%d%H%M")
            .ok()
            .map(|naive| naive.and_utc())
    })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_are_slugs() {
        assert_eq!(canonical_name(" Herzl 5 "), "herzl_5");
        assert_eq!(canonical_name("rothschild-12"), "rothschild-12");
        assert_eq!(canonical_name("בניין"), "building");
    }

    #[test]
    fn timestamps_parse_with_or_without_note() {
        let plain = parse_backup_timestamp("herzl_5_20240301_0815.json").unwrap();
        assert_eq!(plain.format("%Y%m%d%H%M").to_string(), "202403010815");
        let noted = parse_backup_timestamp("herzl_5_20240301_0815_year-end.json").unwrap();
        assert_eq!(noted, plain);
        assert!(parse_backup_timestamp("herzl_5.json").is_none());
    }
}
