//! Domain types for the DevDash collection.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths. Wire names are camelCase — the persisted JSON document is shared
//! with exports and must stay stable across versions.

use std::fmt;
use std::path::PathBuf;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Current schema version written to fresh state documents.
pub const STATE_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a project tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed identifier for a project group (a dashboard folder).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for GroupId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// OrderKey
// ---------------------------------------------------------------------------

/// Position of an entity in its collection.
///
/// `Append` is an explicit "place after everything else" marker used for
/// newly created entities; it is resolved to a concrete dense index by the
/// next reindex and never survives into persisted state. The derived `Ord`
/// sorts every `Assigned` value before `Append`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderKey {
    Assigned(u64),
    Append,
}

/// Orders at or above JavaScript's `Number.MAX_SAFE_INTEGER` are append
/// sentinels written by older clients; anything below is a real index.
const APPEND_THRESHOLD: u64 = 9_007_199_254_740_991;

impl OrderKey {
    /// Concrete index, if assigned.
    pub fn index(self) -> Option<u64> {
        match self {
            OrderKey::Assigned(i) => Some(i),
            OrderKey::Append => None,
        }
    }
}

impl Serialize for OrderKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OrderKey::Assigned(i) => serializer.serialize_u64(*i),
            // Reindexing runs before every persist, so this only appears on
            // the wire if a caller serializes un-normalized state.
            OrderKey::Append => serializer.serialize_u64(APPEND_THRESHOLD),
        }
    }
}

impl<'de> Deserialize<'de> for OrderKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderKeyVisitor;

        impl Visitor<'_> for OrderKeyVisitor {
            type Value = OrderKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer order")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<OrderKey, E> {
                if v >= APPEND_THRESHOLD {
                    Ok(OrderKey::Append)
                } else {
                    Ok(OrderKey::Assigned(v))
                }
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<OrderKey, E> {
                self.visit_u64(v.max(0) as u64)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<OrderKey, E> {
                if !v.is_finite() || v >= APPEND_THRESHOLD as f64 {
                    Ok(OrderKey::Append)
                } else {
                    self.visit_u64(v.max(0.0) as u64)
                }
            }
        }

        deserializer.deserialize_any(OrderKeyVisitor)
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A single project tile on the dashboard.
///
/// `group_ids` is membership, not ownership: a project may belong to zero or
/// more groups, and removing a group must strip its id from every member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Absolute path to the project folder on disk.
    pub folder_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub group_ids: Vec<GroupId>,
    pub order: OrderKey,
    /// Opaque location of the thumbnail artifact, if one was captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_uri: Option<String>,
}

impl Project {
    /// Whether this project is visible in the given view — a group filter,
    /// or the unfiltered "all projects" view when `context` is `None`.
    pub fn in_view(&self, context: Option<&GroupId>) -> bool {
        match context {
            Some(group) => self.group_ids.contains(group),
            None => true,
        }
    }
}

/// A user-defined folder grouping projects on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub order: OrderKey,
}

/// Root of the persisted collection — the unit of persistence, import and
/// export. Transient view state (tile size, active filter) never lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    /// Defaults to [`STATE_VERSION`] when the source document omits it.
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl Default for StoredState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            projects: Vec::new(),
            groups: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
