use super::error::SaveError;
use super::format::{from_json, to_json};
use crate::models::Match;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where finished or in-progress matches are kept between scoring sessions.
///
/// The engine never calls a store; callers save after each engine call and a
/// failed save leaves the in-memory match as it is.
pub trait MatchStore {
    fn save(&mut self, m: &Match) -> Result<(), SaveError>;
    fn fetch(&self, id: &str) -> Result<Match, SaveError>;
    /// Every stored match, most recent first.
    fn fetch_all(&self) -> Result<Vec<Match>, SaveError>;
    fn delete(&mut self, id: &str) -> Result<(), SaveError>;
}

fn check_id(id: &str) -> Result<(), SaveError> {
    let valid = !id.trim().is_empty()
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(SaveError::InvalidId { id: id.to_string() });
    }
    Ok(())
}

fn newest_first(matches: &mut [Match]) {
    matches.sort_by(|a, b| b.date.cmp(&a.date));
}

/// One pretty-printed JSON document per match in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &str) -> Result<PathBuf, SaveError> {
        check_id(id)?;
        Ok(self.dir.join(format!("{}.json", id)))
    }

    fn write_atomic(path: &Path, data: &str) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SaveError::io(parent, e))?;
        }

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path).map_err(|e| SaveError::io(&temp_path, e))?;
            file.write_all(data.as_bytes()).map_err(|e| SaveError::io(&temp_path, e))?;
            file.sync_all().map_err(|e| SaveError::io(&temp_path, e))?;
        }
        fs::rename(&temp_path, path).map_err(|e| SaveError::io(path, e))?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    fn load(path: &Path) -> Result<Match, SaveError> {
        if !path.exists() {
            return Err(SaveError::FileNotFound { path: path.display().to_string() });
        }
        let data = fs::read_to_string(path).map_err(|e| SaveError::io(path, e))?;
        let m = from_json(&data)?;
        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(m)
    }
}

impl MatchStore for JsonFileStore {
    fn save(&mut self, m: &Match) -> Result<(), SaveError> {
        let path = self.path_for(&m.id)?;
        Self::write_atomic(&path, &to_json(m)?)?;
        log::info!("Match {} saved", m.id);
        Ok(())
    }

    fn fetch(&self, id: &str) -> Result<Match, SaveError> {
        let path = self.path_for(id)?;
        match Self::load(&path) {
            Err(SaveError::FileNotFound { .. }) => Err(SaveError::NotFound { id: id.to_string() }),
            other => other,
        }
    }

    /// Unreadable documents are skipped with a warning.
    fn fetch_all(&self) -> Result<Vec<Match>, SaveError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| SaveError::io(&self.dir, e))?;
        let mut matches = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SaveError::io(&self.dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::load(&path) {
                Ok(m) => matches.push(m),
                Err(e) => log::warn!("Skipping {:?}: {}", path, e),
            }
        }

        newest_first(&mut matches);
        Ok(matches)
    }

    fn delete(&mut self, id: &str) -> Result<(), SaveError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(SaveError::NotFound { id: id.to_string() });
        }
        fs::remove_file(&path).map_err(|e| SaveError::io(&path, e))?;
        log::info!("Deleted match {}", id);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    matches: BTreeMap<String, Match>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl MatchStore for MemoryStore {
    fn save(&mut self, m: &Match) -> Result<(), SaveError> {
        self.matches.insert(m.id.clone(), m.clone());
        Ok(())
    }

    fn fetch(&self, id: &str) -> Result<Match, SaveError> {
        self.matches.get(id).cloned().ok_or_else(|| SaveError::NotFound { id: id.to_string() })
    }

    fn fetch_all(&self) -> Result<Vec<Match>, SaveError> {
        let mut matches: Vec<Match> = self.matches.values().cloned().collect();
        newest_first(&mut matches);
        Ok(matches)
    }

    fn delete(&mut self, id: &str) -> Result<(), SaveError> {
        self.matches
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SaveError::NotFound { id: id.to_string() })
    }
}
