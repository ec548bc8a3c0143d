// CLI surface: argument parsing and the one-shot command handlers

use crate::cooldown;
use crate::error::{MshufError, Result};
use crate::listing::{FolderSource, FsSource};
use crate::selector::{self, Selection};
use crate::store::Profile;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Mshuf - open a random media file from your folders
///
/// Register root folders once, then let mshuf pick a random subfolder and
/// fire a random image or video from it at your configured viewer.
#[derive(Parser, Debug)]
#[command(name = "mshuf")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Randomly open a media file under a root
    ///
    /// ROOT may be a configured path, an alias, or a path that normalizes
    /// to one. Without it, the last-selected root is used.
    Open {
        root: Option<String>,
    },

    /// Register a folder as a new root and select it
    Add {
        /// Folder to register
        path: PathBuf,
        /// Display name for the new root
        #[arg(short = 'n', long = "name")]
        name: Option<String>,
    },

    /// Point an existing root at a new path, keeping its name, exclusions
    /// and comic mode
    Replace {
        root: String,
        path: PathBuf,
    },

    /// Remove a root and everything recorded under it
    Remove {
        root: String,
    },

    /// Set a root's display name
    Rename {
        root: String,
        name: String,
    },

    /// Show or set the subfolders excluded from random selection
    ///
    /// With no names, prints the current exclusion list. Passing names
    /// replaces the list; --clear empties it.
    Exclude {
        root: String,
        names: Vec<String>,
        #[arg(long = "clear", action = ArgAction::SetTrue)]
        clear: bool,
    },

    /// Toggle comic mode for a root
    ///
    /// With comic mode on, file picks inside a chosen folder are not
    /// random: the first file by name is opened every time.
    Comic {
        root: String,
        #[arg(value_enum)]
        mode: Toggle,
    },

    /// List configured roots
    Roots,

    /// Show or change global settings
    Config {
        key: Option<String>,
        value: Option<String>,
    },

    /// Open the interactive panel
    Tui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        matches!(toggle, Toggle::On)
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

/// Runs a one-shot command against the persisted profile.
pub fn execute(command: Command) -> Result<()> {
    match command {
        Command::Open { root } => run_open(root),
        Command::Add { path, name } => run_add(path, name),
        Command::Replace { root, path } => run_replace(root, path),
        Command::Remove { root } => run_remove(root),
        Command::Rename { root, name } => run_rename(root, name),
        Command::Exclude { root, names, clear } => run_exclude(root, names, clear),
        Command::Comic { root, mode } => run_comic(root, mode),
        Command::Roots => run_roots(),
        Command::Config { key, value } => run_config(key, value),
        Command::Tui => crate::tui::run(),
    }
}

/// The bare default action: the interactive panel when autostart is on,
/// otherwise a one-shot open of the last-selected root.
pub fn execute_default() -> Result<()> {
    let profile = Profile::load()?;
    if profile.settings.tui_autostart {
        crate::tui::run()
    } else {
        run_open(None)
    }
}

pub fn run_open(reference: Option<String>) -> Result<()> {
    let mut profile = Profile::load()?;
    let root_id = match reference {
        Some(r) => profile.resolve(&r)?,
        None => profile
            .last_selected
            .clone()
            .ok_or(MshufError::NoRootSelected)?,
    };
    profile.select(&root_id)?;

    let mut rng = rand::thread_rng();
    let report = selector::pick_and_open(
        &mut profile,
        &FsSource,
        &root_id,
        &mut rng,
        cooldown::now_millis(),
    )?;
    profile.save()?;

    match report.selection {
        Selection::Picked(pick) => {
            if pick.cooldown_notice {
                println!("All folders are on cooldown; picked one anyway.");
            }
            println!("Opening {}/{}", pick.folder_name, pick.file.name);
            match report.launch {
                Some(Ok(launched)) => {
                    if launched.app.is_none() {
                        println!("(configured app unavailable, used the default handler)");
                    }
                    Ok(())
                }
                Some(Err(e)) => Err(e.into()),
                None => Ok(()),
            }
        }
        Selection::NoMedia { folder_name } => {
            println!("No media files in {folder_name}.");
            Ok(())
        }
    }
}

fn run_add(path: PathBuf, name: Option<String>) -> Result<()> {
    // Reject unreadable targets before any state is touched
    FsSource.list_children(&path)?;

    let mut profile = Profile::load()?;
    let id = profile.add_root(&path, name)?;
    profile.save()?;
    println!("Added {} ({id})", profile.display_name(&id));
    Ok(())
}

fn run_replace(reference: String, path: PathBuf) -> Result<()> {
    FsSource.list_children(&path)?;

    let mut profile = Profile::load()?;
    let old_id = profile.resolve(&reference)?;
    let new_id = profile.replace_root(&old_id, &path)?;
    profile.save()?;
    println!("Moved {} to {new_id}", profile.display_name(&new_id));
    Ok(())
}

fn run_remove(reference: String) -> Result<()> {
    let mut profile = Profile::load()?;
    let id = profile.resolve(&reference)?;
    let name = profile.display_name(&id);
    profile.remove_root(&id)?;
    profile.save()?;
    println!("Removed {name}");
    Ok(())
}

fn run_rename(reference: String, name: String) -> Result<()> {
    let mut profile = Profile::load()?;
    let id = profile.resolve(&reference)?;
    profile.rename(&id, &name)?;
    profile.save()?;
    println!("Renamed {id} to {name}");
    Ok(())
}

fn run_exclude(reference: String, names: Vec<String>, clear: bool) -> Result<()> {
    let mut profile = Profile::load()?;
    let id = profile.resolve(&reference)?;

    if clear {
        profile.set_excluded(&id, BTreeSet::new())?;
        profile.save()?;
        println!("Cleared exclusions for {}", profile.display_name(&id));
        return Ok(());
    }

    if names.is_empty() {
        let record = profile.record(&id)?;
        if record.excluded.is_empty() {
            println!("No excluded subfolders for {}", profile.display_name(&id));
        } else {
            for name in &record.excluded {
                println!("{name}");
            }
        }
        return Ok(());
    }

    // Point out names that are not currently subfolders, but save them
    // anyway; the folder may simply be offline.
    if let Ok(children) = FsSource.list_children(std::path::Path::new(&id)) {
        let existing: BTreeSet<&str> = children
            .iter()
            .filter(|e| e.is_dir)
            .map(|e| e.name.as_str())
            .collect();
        for name in &names {
            if !existing.contains(name.as_str()) {
                eprintln!("note: '{name}' is not currently a subfolder of {id}");
            }
        }
    }

    let excluded: BTreeSet<String> = names.into_iter().collect();
    let count = excluded.len();
    profile.set_excluded(&id, excluded)?;
    profile.save()?;
    println!(
        "Excluding {count} subfolder(s) of {}",
        profile.display_name(&id)
    );
    Ok(())
}

fn run_comic(reference: String, mode: Toggle) -> Result<()> {
    let mut profile = Profile::load()?;
    let id = profile.resolve(&reference)?;
    profile.set_comic_mode(&id, mode.into())?;
    profile.save()?;
    println!(
        "Comic mode {} for {}",
        if bool::from(mode) { "on" } else { "off" },
        profile.display_name(&id)
    );
    Ok(())
}

fn run_roots() -> Result<()> {
    let profile = Profile::load()?;
    if profile.roots.is_empty() {
        println!("No roots configured. Add one with 'mshuf add <path>'.");
        return Ok(());
    }

    let now_ms = cooldown::now_millis();
    for (id, record) in &profile.roots {
        let selected = if profile.last_selected.as_deref() == Some(id.as_str()) {
            "*"
        } else {
            " "
        };
        let mut notes = Vec::new();
        if record.comic_mode {
            notes.push("comic".to_string());
        }
        if !record.excluded.is_empty() {
            notes.push(format!("{} excluded", record.excluded.len()));
        }
        let cooling = cooldown::cooling_count(&profile, id, now_ms);
        if cooling > 0 {
            notes.push(format!("{cooling} cooling down"));
        }
        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!(" [{}]", notes.join(", "))
        };
        println!("{selected} {}  {id}{notes}", profile.display_name(id));
    }
    Ok(())
}

fn run_config(key: Option<String>, value: Option<String>) -> Result<()> {
    let mut profile = Profile::load()?;
    match (key, value) {
        (None, _) => {
            for (key, value) in profile.settings.entries() {
                println!("{key} = {value}");
            }
            Ok(())
        }
        (Some(key), None) => {
            let entries = profile.settings.entries();
            match entries.iter().find(|(k, _)| *k == key) {
                Some((_, value)) => {
                    println!("{value}");
                    Ok(())
                }
                None => Err(MshufError::InvalidSetting(format!(
                    "unknown key '{}' (known keys: {})",
                    key,
                    crate::config::Settings::keys().join(", ")
                ))),
            }
        }
        (Some(key), Some(value)) => {
            profile.settings.set(&key, &value)?;
            profile.save()?;
            println!("{key} = {value}");
            Ok(())
        }
    }
}
