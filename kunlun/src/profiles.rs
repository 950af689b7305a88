//! Named backends the client can poll, kept as JSON in
//! `$XDG_CONFIG_HOME/kunlun/profiles.json` (or the platform config dir).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

const APP_DIR: &str = "kunlun";
const FILE_NAME: &str = "profiles.json";

/// Where a profile points and, optionally, how often to poll it.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileEntry {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub version: u32,
}

impl ProfilesFile {
    pub fn get(&self, name: &str) -> Option<&ProfileEntry> {
        self.profiles.get(name)
    }

    /// Insert or replace; false when `name` already held exactly `entry`.
    pub fn upsert(&mut self, name: &str, entry: ProfileEntry) -> bool {
        if self.profiles.get(name) == Some(&entry) {
            return false;
        }
        self.profiles.insert(name.to_string(), entry);
        true
    }
}

/// The profiles file on disk.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(dirs_next::config_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::at(base.join(APP_DIR).join(FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty set. An unreadable one is too, with a
    /// warning, so a bad edit never blocks polling.
    pub fn load(&self) -> ProfilesFile {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return ProfilesFile::default(),
            Err(e) => {
                warn!(path = %self.path.display(), "cannot read profiles: {e}");
                return ProfilesFile::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "ignoring malformed profiles: {e}");
            ProfilesFile::default()
        })
    }

    /// Write through a sibling temp file so a crash never leaves half a file.
    pub fn save(&self, pf: &ProfilesFile) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(pf).map_err(io::Error::other)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)
    }
}

#[derive(Debug, PartialEq)]
pub enum ResolveProfile {
    /// Use the provided runtime inputs (not persisted).
    Direct(ProfileEntry),
    /// Loaded from an existing profile entry
    Loaded(ProfileEntry),
    /// Should prompt user to select among profile names
    PromptSelect(Vec<String>),
    /// Should prompt user to create a new profile (name)
    PromptCreate(String),
    /// No profile could be resolved (e.g., missing arguments)
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub interval_ms: Option<u64>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        match (self.profile_name, self.url) {
            // only profile name given -> try load; flags override the stored interval
            (Some(name), None) => match pf.get(&name) {
                Some(entry) => ResolveProfile::Loaded(ProfileEntry {
                    url: entry.url.clone(),
                    interval_ms: self.interval_ms.or(entry.interval_ms),
                }),
                None => ResolveProfile::PromptCreate(name),
            },
            // url provided -> direct (maybe later saved by caller)
            (_, Some(url)) => ResolveProfile::Direct(ProfileEntry {
                url,
                interval_ms: self.interval_ms,
            }),
            (None, None) if pf.profiles.is_empty() => ResolveProfile::None,
            (None, None) => ResolveProfile::PromptSelect(pf.profiles.keys().cloned().collect()),
        }
    }
}
