//! Random selection with constraints
//!
//! Given a configured root, pick a target subfolder (honoring exclusions
//! and cooldown, with a fallback when everything is cooling down), then
//! pick a media file inside it (uniformly, or deterministically in comic
//! mode), and hand the result to the launcher.

use crate::cooldown;
use crate::error::Result;
use crate::launcher::{self, Launched};
use crate::listing::{Entry, FolderSource};
use crate::media::{classify, MediaKind};
use crate::store::{folder_key, Profile};
use rand::Rng;
use std::path::Path;
use tracing::debug;

/// A completed pick
#[derive(Debug, Clone)]
pub struct Pick {
    /// Cooldown key of the folder the file came from
    pub folder_id: String,
    /// Folder name shown to the user
    pub folder_name: String,
    pub file: Entry,
    pub kind: MediaKind,
    /// True when every candidate was on cooldown and the pick fell back to
    /// the full candidate set
    pub cooldown_notice: bool,
    /// True when the root itself served as the target folder (no
    /// subfolders, or all of them excluded)
    pub used_root: bool,
}

/// Outcome of a selection run. `NoMedia` is a normal terminal state, not a
/// fault: the chosen folder simply holds nothing openable.
#[derive(Debug, Clone)]
pub enum Selection {
    Picked(Pick),
    NoMedia { folder_name: String },
}

/// Picks a target folder and file under `root_id`.
///
/// Cooldown bookkeeping happens here: the chosen subfolder's timestamp is
/// recorded before the file step runs, and never for the degenerate case
/// where the root itself is the target.
pub fn pick<S: FolderSource, R: Rng>(
    profile: &mut Profile,
    source: &S,
    root_id: &str,
    rng: &mut R,
    now_ms: i64,
) -> Result<Selection> {
    let record = profile.record(root_id)?.clone();
    let root_path = Path::new(root_id).to_path_buf();

    // Step 1: choose the target folder
    let children = source.list_children(&root_path)?;
    let candidates: Vec<Entry> = children
        .into_iter()
        .filter(|e| e.is_dir && !record.excluded.contains(&e.name))
        .collect();

    let (target, cooldown_notice, used_root) = if candidates.is_empty() {
        debug!(root = root_id, "no usable subfolders, picking from the root itself");
        (Entry::dir(root_path), false, true)
    } else {
        let eligible: Vec<Entry> = candidates
            .iter()
            .filter(|e| cooldown::is_eligible(profile, &folder_key(&e.path), now_ms))
            .cloned()
            .collect();

        let (chosen, notice) = if eligible.is_empty() {
            debug!(
                root = root_id,
                candidates = candidates.len(),
                "all candidates on cooldown, falling back to the full set"
            );
            (candidates[rng.gen_range(0..candidates.len())].clone(), true)
        } else {
            (eligible[rng.gen_range(0..eligible.len())].clone(), false)
        };

        cooldown::record_open(profile, &folder_key(&chosen.path), now_ms);
        (chosen, notice, false)
    };

    // Step 2: choose the file
    let files = source.list_children(&target.path)?;
    let mut media: Vec<(Entry, MediaKind)> = files
        .into_iter()
        .filter(|e| e.is_file)
        .filter_map(|e| classify(&e.name).map(|kind| (e, kind)))
        .collect();

    if media.is_empty() {
        return Ok(Selection::NoMedia {
            folder_name: target.name,
        });
    }

    // Comic mode is the ROOT's flag, not the target folder's
    let index = if record.comic_mode {
        media
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.0.name.cmp(&b.0.name))
            .map(|(i, _)| i)
            .unwrap_or(0)
    } else {
        rng.gen_range(0..media.len())
    };
    let (file, kind) = media.swap_remove(index);

    debug!(
        folder = %target.name,
        file = %file.name,
        mime = kind.mime(),
        "selected"
    );

    Ok(Selection::Picked(Pick {
        folder_id: folder_key(&target.path),
        folder_name: target.name,
        file,
        kind,
        cooldown_notice,
        used_root,
    }))
}

/// A pick plus what happened when the launcher ran.
///
/// Selection and cooldown state are committed before the launch is
/// attempted, so a launch failure leaves them in place.
#[derive(Debug)]
pub struct OpenReport {
    pub selection: Selection,
    pub launch: Option<std::result::Result<Launched, crate::error::LaunchError>>,
}

/// Runs [`pick`] and opens the chosen file with the external viewer.
pub fn pick_and_open<S: FolderSource, R: Rng>(
    profile: &mut Profile,
    source: &S,
    root_id: &str,
    rng: &mut R,
    now_ms: i64,
) -> Result<OpenReport> {
    let selection = pick(profile, source, root_id, rng, now_ms)?;
    let launch = match &selection {
        Selection::Picked(p) => Some(launcher::open_media(&p.file.path, p.kind, &profile.settings)),
        Selection::NoMedia { .. } => None,
    };
    Ok(OpenReport { selection, launch })
}
