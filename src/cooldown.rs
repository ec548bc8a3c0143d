//! Per-folder cooldown policy
//!
//! A folder that was opened within the configured window is skipped during
//! folder selection. The clock is injected as epoch millis so the policy
//! stays pure; call sites use [`now_millis`].

use crate::store::Profile;
use chrono::Utc;
use std::path::Path;

/// Current wall-clock time as epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Whether `folder_id` may be picked at `now_ms`.
///
/// Always true while cooldown is disabled. A folder with no recorded
/// timestamp is eligible.
pub fn is_eligible(profile: &Profile, folder_id: &str, now_ms: i64) -> bool {
    if !profile.settings.cooldown_enabled {
        return true;
    }
    match profile.cooldowns.get(folder_id) {
        None => true,
        Some(last) => now_ms - last >= profile.settings.cooldown_window_ms(),
    }
}

/// Records that `folder_id` was just opened.
///
/// No-op while cooldown is disabled; otherwise overwrites any previous
/// timestamp; no history of opens is kept.
pub fn record_open(profile: &mut Profile, folder_id: &str, now_ms: i64) {
    if !profile.settings.cooldown_enabled {
        return;
    }
    profile.cooldowns.insert(folder_id.to_string(), now_ms);
}

/// Folders under `root_id` still inside the cooldown window
pub fn cooling_count(profile: &Profile, root_id: &str, now_ms: i64) -> usize {
    if !profile.settings.cooldown_enabled {
        return 0;
    }
    let root = Path::new(root_id);
    profile
        .cooldowns
        .iter()
        .filter(|(key, _)| Path::new(key).starts_with(root) && key.as_str() != root_id)
        .filter(|(key, _)| !is_eligible(profile, key, now_ms))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE_MS: i64 = 60_000;

    fn profile_with_cooldown(minutes: u32) -> Profile {
        let mut profile = Profile::default();
        profile.settings.cooldown_enabled = true;
        profile.settings.cooldown_minutes = minutes;
        profile
    }

    #[test]
    fn test_disabled_cooldown_is_always_eligible() {
        let mut profile = Profile::default();
        profile.cooldowns.insert("/r/x".to_string(), 0);
        assert!(is_eligible(&profile, "/r/x", 1));
    }

    #[test]
    fn test_unrecorded_folder_is_eligible() {
        let profile = profile_with_cooldown(30);
        assert!(is_eligible(&profile, "/r/x", 1_000_000));
    }

    #[test]
    fn test_window_boundaries() {
        // 30 min window, opened at t=0
        let mut profile = profile_with_cooldown(30);
        record_open(&mut profile, "/r/y", 0);

        // 10 minutes later: still cooling down
        assert!(!is_eligible(&profile, "/r/y", 10 * MINUTE_MS));
        // exactly at the window: eligible again
        assert!(is_eligible(&profile, "/r/y", 30 * MINUTE_MS));
        // 31 minutes later: eligible
        assert!(is_eligible(&profile, "/r/y", 31 * MINUTE_MS));
    }

    #[test]
    fn test_record_then_immediate_check_is_ineligible() {
        let mut profile = profile_with_cooldown(1);
        let t = 5_000_000;
        record_open(&mut profile, "/r/z", t);
        assert!(!is_eligible(&profile, "/r/z", t));
    }

    #[test]
    fn test_record_overwrites_previous_timestamp() {
        let mut profile = profile_with_cooldown(30);
        record_open(&mut profile, "/r/x", 1_000);
        record_open(&mut profile, "/r/x", 2_000);
        assert_eq!(profile.cooldowns.get("/r/x"), Some(&2_000));
        assert_eq!(profile.cooldowns.len(), 1);
    }

    #[test]
    fn test_record_is_noop_while_disabled() {
        let mut profile = Profile::default();
        record_open(&mut profile, "/r/x", 1_000);
        assert!(profile.cooldowns.is_empty());
    }

    #[test]
    fn test_cooling_count_scopes_to_root() {
        let mut profile = profile_with_cooldown(30);
        let now = 10_000_000;
        // One cooling, one expired, one under a different tree
        profile.cooldowns.insert("/data/comics/x".to_string(), now);
        profile.cooldowns.insert("/data/comics/y".to_string(), 0);
        profile.cooldowns.insert("/data/videos/z".to_string(), now);

        assert_eq!(cooling_count(&profile, "/data/comics", now), 1);
    }

    #[test]
    fn test_cooling_count_ignores_prefix_siblings() {
        let mut profile = profile_with_cooldown(30);
        let now = 10_000_000;
        profile.cooldowns.insert("/data/comics2/w".to_string(), now);
        assert_eq!(cooling_count(&profile, "/data/comics", now), 0);
    }

    #[test]
    fn test_cooling_count_zero_when_disabled() {
        let mut profile = Profile::default();
        profile.cooldowns.insert("/data/comics/x".to_string(), 0);
        assert_eq!(cooling_count(&profile, "/data/comics", 1), 0);
    }
}
