//! Persisted profile: configured roots, cooldown timestamps, settings
//!
//! The profile is a plain value handed to whoever needs it; there is no
//! ambient global. The one-shot CLI and the interactive panel each load it,
//! mutate it, and save it back; tests build one with `Profile::default()`
//! and never touch the filesystem.

use crate::config::Settings;
use crate::error::{MshufError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// One user-configured root folder
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RootRecord {
    /// User display name; `None` falls back to the last path segment
    pub alias: Option<String>,
    /// Child folder names never considered for random selection
    pub excluded: BTreeSet<String>,
    /// Deterministic first-file pick instead of a random one
    pub comic_mode: bool,
}

/// The whole persisted state, stored as one JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Configured roots keyed by canonical id (absolute path string)
    pub roots: BTreeMap<String, RootRecord>,
    /// Last-open epoch millis per folder path, independent of any root
    pub cooldowns: BTreeMap<String, i64>,
    /// Root id the next bare invocation acts on
    pub last_selected: Option<String>,
    pub settings: Settings,
}

/// Canonical root id for a user-supplied path: absolute, with `.` segments
/// and trailing separators dropped. `..` is kept as given: ids are string
/// keys, not resolved filesystem references.
pub fn canonical_root_id(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    let normalized: PathBuf = absolute.components().collect();
    normalized.to_string_lossy().into_owned()
}

/// Cooldown key for a folder reached during selection
pub fn folder_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl Profile {
    /// Get the profile file path (~/.config/mshuf/profile.json)
    pub fn profile_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mshuf").join("profile.json"))
    }

    /// Load the profile from disk, or default if it doesn't exist yet
    pub fn load() -> Result<Self> {
        let path = Self::profile_path().ok_or_else(|| {
            MshufError::Profile("could not determine config directory".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| MshufError::Profile(format!("failed to read profile: {e}")))?;

        serde_json::from_str(&contents)
            .map_err(|e| MshufError::Profile(format!("failed to parse profile: {e}")))
    }

    /// Save the profile to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::profile_path().ok_or_else(|| {
            MshufError::Profile("could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| MshufError::Profile(format!("failed to create config dir: {e}")))?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| MshufError::Profile(format!("failed to serialize profile: {e}")))?;

        fs::write(&path, contents)
            .map_err(|e| MshufError::Profile(format!("failed to write profile: {e}")))?;

        Ok(())
    }

    /// Display name for a root: alias if set, else the last path segment
    pub fn display_name(&self, id: &str) -> String {
        if let Some(record) = self.roots.get(id) {
            if let Some(alias) = &record.alias {
                if !alias.is_empty() {
                    return alias.clone();
                }
            }
        }
        last_segment(id)
    }

    /// Registers a new root and selects it. Fails on duplicates.
    pub fn add_root(&mut self, path: &Path, alias: Option<String>) -> Result<String> {
        let id = canonical_root_id(path);
        if self.roots.contains_key(&id) {
            return Err(MshufError::DuplicateRoot(id));
        }
        self.roots.insert(
            id.clone(),
            RootRecord {
                alias: alias.filter(|a| !a.is_empty()),
                ..RootRecord::default()
            },
        );
        self.last_selected = Some(id.clone());
        Ok(id)
    }

    /// Removes a root, cascading its alias, exclusions, comic flag, and
    /// every cooldown timestamp keyed under its subpaths.
    pub fn remove_root(&mut self, id: &str) -> Result<()> {
        if self.roots.remove(id).is_none() {
            return Err(MshufError::UnknownRoot(id.to_string()));
        }
        let root = Path::new(id);
        self.cooldowns
            .retain(|key, _| !(Path::new(key).starts_with(root) && key.as_str() != id));
        if self.last_selected.as_deref() == Some(id) {
            self.last_selected = None;
        }
        Ok(())
    }

    /// Points an existing record at a new path, carrying the alias, the
    /// exclusion list, and the comic flag over to the new id. Cooldown
    /// timestamps stay where they are, since they are keyed by folder, not root.
    pub fn replace_root(&mut self, old_id: &str, new_path: &Path) -> Result<String> {
        let new_id = canonical_root_id(new_path);
        if new_id != old_id && self.roots.contains_key(&new_id) {
            return Err(MshufError::DuplicateRoot(new_id));
        }
        let record = self
            .roots
            .remove(old_id)
            .ok_or_else(|| MshufError::UnknownRoot(old_id.to_string()))?;
        self.roots.insert(new_id.clone(), record);
        if self.last_selected.as_deref() == Some(old_id) {
            self.last_selected = Some(new_id.clone());
        }
        Ok(new_id)
    }

    pub fn rename(&mut self, id: &str, alias: &str) -> Result<()> {
        let record = self.record_mut(id)?;
        record.alias = if alias.is_empty() {
            None
        } else {
            Some(alias.to_string())
        };
        Ok(())
    }

    pub fn set_excluded(&mut self, id: &str, excluded: BTreeSet<String>) -> Result<()> {
        self.record_mut(id)?.excluded = excluded;
        Ok(())
    }

    pub fn set_comic_mode(&mut self, id: &str, enabled: bool) -> Result<()> {
        self.record_mut(id)?.comic_mode = enabled;
        Ok(())
    }

    /// Remembers `id` as the root the next bare invocation acts on
    pub fn select(&mut self, id: &str) -> Result<()> {
        if !self.roots.contains_key(id) {
            return Err(MshufError::UnknownRoot(id.to_string()));
        }
        self.last_selected = Some(id.to_string());
        Ok(())
    }

    pub fn record(&self, id: &str) -> Result<&RootRecord> {
        self.roots
            .get(id)
            .ok_or_else(|| MshufError::UnknownRoot(id.to_string()))
    }

    fn record_mut(&mut self, id: &str) -> Result<&mut RootRecord> {
        self.roots
            .get_mut(id)
            .ok_or_else(|| MshufError::UnknownRoot(id.to_string()))
    }

    /// Resolves a user-supplied root reference: exact id, then unique
    /// alias, then the canonical form of the reference as a path.
    pub fn resolve(&self, reference: &str) -> Result<String> {
        if self.roots.contains_key(reference) {
            return Ok(reference.to_string());
        }

        let mut alias_matches: Vec<String> = self
            .roots
            .iter()
            .filter(|(_, r)| r.alias.as_deref() == Some(reference))
            .map(|(id, _)| id.clone())
            .collect();
        match alias_matches.len() {
            0 => {}
            1 => return Ok(alias_matches.remove(0)),
            _ => {
                return Err(MshufError::AmbiguousRoot {
                    reference: reference.to_string(),
                    matches: alias_matches,
                })
            }
        }

        let as_path = canonical_root_id(Path::new(reference));
        if self.roots.contains_key(&as_path) {
            return Ok(as_path);
        }

        Err(MshufError::UnknownRoot(reference.to_string()))
    }
}

fn last_segment(id: &str) -> String {
    Path::new(id)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(id)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_root(path: &str) -> (Profile, String) {
        let mut profile = Profile::default();
        let id = profile.add_root(Path::new(path), None).unwrap();
        (profile, id)
    }

    mod id_tests {
        use super::*;

        #[test]
        fn test_canonical_id_strips_trailing_separator() {
            assert_eq!(
                canonical_root_id(Path::new("/data/comics/")),
                canonical_root_id(Path::new("/data/comics"))
            );
        }

        #[test]
        fn test_canonical_id_absolutizes_relative_paths() {
            let id = canonical_root_id(Path::new("relative"));
            assert!(Path::new(&id).is_absolute());
            assert!(id.ends_with("relative"));
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn test_add_root_selects_it() {
            let (profile, id) = profile_with_root("/data/comics");
            assert_eq!(profile.last_selected.as_deref(), Some(id.as_str()));
            assert!(profile.roots.contains_key(&id));
        }

        #[test]
        fn test_add_duplicate_root_rejected() {
            let (mut profile, _) = profile_with_root("/data/comics");
            let err = profile
                .add_root(Path::new("/data/comics/"), None)
                .unwrap_err();
            assert!(matches!(err, MshufError::DuplicateRoot(_)));
        }

        #[test]
        fn test_remove_root_cascades_descendant_cooldowns() {
            let (mut profile, id) = profile_with_root("/data/comics");
            profile.add_root(Path::new("/data/videos"), None).unwrap();
            profile.cooldowns.insert("/data/comics/x".to_string(), 10);
            profile.cooldowns.insert("/data/comics/y".to_string(), 20);
            profile.cooldowns.insert("/data/videos/z".to_string(), 30);
            // Prefix sibling that is not a subpath
            profile.cooldowns.insert("/data/comics2/w".to_string(), 40);

            profile.remove_root(&id).unwrap();

            assert!(!profile.cooldowns.contains_key("/data/comics/x"));
            assert!(!profile.cooldowns.contains_key("/data/comics/y"));
            assert_eq!(profile.cooldowns.get("/data/videos/z"), Some(&30));
            assert_eq!(profile.cooldowns.get("/data/comics2/w"), Some(&40));
        }

        #[test]
        fn test_remove_root_clears_selection() {
            let (mut profile, id) = profile_with_root("/data/comics");
            profile.remove_root(&id).unwrap();
            assert!(profile.last_selected.is_none());
            assert!(matches!(
                profile.remove_root(&id),
                Err(MshufError::UnknownRoot(_))
            ));
        }

        #[test]
        fn test_replace_root_carries_record_over() {
            let (mut profile, id) = profile_with_root("/old/spot");
            profile.rename(&id, "weekly").unwrap();
            profile
                .set_excluded(&id, ["skip".to_string()].into_iter().collect())
                .unwrap();
            profile.set_comic_mode(&id, true).unwrap();

            let new_id = profile.replace_root(&id, Path::new("/new/spot")).unwrap();

            assert!(!profile.roots.contains_key(&id));
            let record = profile.record(&new_id).unwrap();
            assert_eq!(record.alias.as_deref(), Some("weekly"));
            assert!(record.excluded.contains("skip"));
            assert!(record.comic_mode);
            assert_eq!(profile.last_selected.as_deref(), Some(new_id.as_str()));
        }

        #[test]
        fn test_replace_root_rejects_existing_target() {
            let (mut profile, id) = profile_with_root("/a");
            profile.add_root(Path::new("/b"), None).unwrap();
            let err = profile.replace_root(&id, Path::new("/b")).unwrap_err();
            assert!(matches!(err, MshufError::DuplicateRoot(_)));
        }
    }

    mod naming_tests {
        use super::*;

        #[test]
        fn test_display_name_falls_back_to_last_segment() {
            let (profile, id) = profile_with_root("/data/comics");
            assert_eq!(profile.display_name(&id), "comics");
        }

        #[test]
        fn test_display_name_prefers_alias() {
            let (mut profile, id) = profile_with_root("/data/comics");
            profile.rename(&id, "My Stash").unwrap();
            assert_eq!(profile.display_name(&id), "My Stash");
        }

        #[test]
        fn test_rename_empty_clears_alias() {
            let (mut profile, id) = profile_with_root("/data/comics");
            profile.rename(&id, "x").unwrap();
            profile.rename(&id, "").unwrap();
            assert_eq!(profile.display_name(&id), "comics");
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_resolve_exact_id() {
            let (profile, id) = profile_with_root("/data/comics");
            assert_eq!(profile.resolve(&id).unwrap(), id);
        }

        #[test]
        fn test_resolve_unique_alias() {
            let (mut profile, id) = profile_with_root("/data/comics");
            profile.rename(&id, "weekly").unwrap();
            assert_eq!(profile.resolve("weekly").unwrap(), id);
        }

        #[test]
        fn test_resolve_ambiguous_alias() {
            let (mut profile, a) = profile_with_root("/a");
            let b = profile.add_root(Path::new("/b"), None).unwrap();
            profile.rename(&a, "same").unwrap();
            profile.rename(&b, "same").unwrap();
            let err = profile.resolve("same").unwrap_err();
            assert!(matches!(err, MshufError::AmbiguousRoot { .. }));
        }

        #[test]
        fn test_resolve_path_form() {
            let (profile, id) = profile_with_root("/data/comics");
            assert_eq!(profile.resolve("/data/comics/").unwrap(), id);
        }

        #[test]
        fn test_resolve_unknown() {
            let profile = Profile::default();
            assert!(matches!(
                profile.resolve("nope"),
                Err(MshufError::UnknownRoot(_))
            ));
        }
    }

    mod serialization_tests {
        use super::*;

        #[test]
        fn test_profile_round_trip() {
            let (mut profile, id) = profile_with_root("/data/comics");
            profile.rename(&id, "weekly").unwrap();
            profile.set_comic_mode(&id, true).unwrap();
            profile.cooldowns.insert("/data/comics/x".to_string(), 99);
            profile.settings.set("cooldown-enabled", "true").unwrap();

            let json = serde_json::to_string(&profile).unwrap();
            let back: Profile = serde_json::from_str(&json).unwrap();

            assert_eq!(back.roots, profile.roots);
            assert_eq!(back.cooldowns, profile.cooldowns);
            assert_eq!(back.last_selected, profile.last_selected);
            assert!(back.settings.cooldown_enabled);
        }

        #[test]
        fn test_profile_defaults_for_missing_fields() {
            let back: Profile = serde_json::from_str("{}").unwrap();
            assert!(back.roots.is_empty());
            assert!(back.cooldowns.is_empty());
            assert!(back.last_selected.is_none());
        }
    }
}
