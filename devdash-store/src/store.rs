//! The dual-backed project store.
//!
//! # Storage layout
//!
//! ```text
//! <data_dir>/
//!   projects.json     (durable file backend — pretty-printed, atomic writes)
//!   sync/
//!     slot.json       (key-value mirror — replicated by the host's sync machinery)
//! ```
//!
//! # Load preference
//!
//! The sync slot may be replicated across machines and is preferred as the
//! most current copy; the file is the durable local fallback and audit copy.
//! Whichever backend wins is mirrored to the other, so both agree after
//! every load.
//!
//! # Caller obligations
//!
//! The store has no internal locking and assumes it is the sole writer of
//! both backends. Callers must serialize mutations; concurrent external
//! writers produce a last-writer-wins outcome on the next load.

use std::path::{Path, PathBuf};

use serde_json::Value;

use devdash_core::{migrate, ordering, Group, GroupId, Project, ProjectId, StoredState};

use crate::error::{io_err, StoreError};
use crate::sync_slot::SyncSlot;

/// Fixed key under which the state lives in the sync slot.
const SYNC_KEY: &str = "devdash.state";

/// Single source of truth for the persisted collection.
///
/// Owns the canonical in-memory [`StoredState`] and both backends. Every
/// mutating operation applies to the in-memory copy, restores the dense
/// ordering invariant, then persists to the file backend and (best-effort)
/// the sync slot. Mirror-write failures are logged, never raised — a
/// transient disk error must not corrupt in-memory state or crash the
/// caller.
#[derive(Debug)]
pub struct ProjectStore {
    state: StoredState,
    file_path: PathBuf,
    slot: SyncSlot,
}

impl ProjectStore {
    /// Open (or initialize) the store rooted at `data_dir`.
    ///
    /// Runs the load protocol once: sync slot first, then the file backend,
    /// then an empty initial state. Parse and I/O failures degrade to the
    /// empty state — opening never fails.
    pub fn open_at(data_dir: &Path) -> Self {
        if let Err(err) = std::fs::create_dir_all(data_dir) {
            tracing::warn!(
                "failed to create data dir {}: {err}",
                data_dir.display()
            );
        }
        let file_path = data_dir.join("projects.json");
        let slot = SyncSlot::new(data_dir.join("sync").join("slot.json"));
        let state = Self::load(&file_path, &slot);
        Self {
            state,
            file_path,
            slot,
        }
    }

    /// Immutable snapshot of the canonical state.
    pub fn state(&self) -> &StoredState {
        &self.state
    }

    // -----------------------------------------------------------------------
    // Load protocol
    // -----------------------------------------------------------------------

    fn load(file_path: &Path, slot: &SyncSlot) -> StoredState {
        // 1. Sync slot, if it holds a structurally valid state document.
        if let Some(mut value) = slot.get(SYNC_KEY) {
            if migrate::looks_like_state(&value) {
                migrate::migrate_state_value(&mut value);
                match serde_json::from_value::<StoredState>(value) {
                    Ok(state) => {
                        Self::mirror_to_file(file_path, &state);
                        return state;
                    }
                    Err(err) => {
                        tracing::warn!("sync slot state unreadable, starting fresh: {err}");
                        return Self::initialize(file_path, slot);
                    }
                }
            }
        }

        // 2. Durable file backend.
        if file_path.exists() {
            match Self::read_file_state(file_path) {
                Ok(state) => {
                    Self::mirror_to_slot(slot, &state);
                    return state;
                }
                Err(err) => {
                    tracing::warn!(
                        "state file {} unreadable, starting fresh: {err}",
                        file_path.display()
                    );
                }
            }
        }

        // 3. Empty initial state, persisted to both backends.
        Self::initialize(file_path, slot)
    }

    fn read_file_state(file_path: &Path) -> Result<StoredState, StoreError> {
        let contents = std::fs::read_to_string(file_path).map_err(|e| io_err(file_path, e))?;
        let mut value: Value = serde_json::from_str(&contents)?;
        migrate::migrate_state_value(&mut value);
        Ok(serde_json::from_value(value)?)
    }

    fn initialize(file_path: &Path, slot: &SyncSlot) -> StoredState {
        let initial = StoredState::default();
        Self::mirror_to_file(file_path, &initial);
        Self::mirror_to_slot(slot, &initial);
        initial
    }

    // -----------------------------------------------------------------------
    // Save protocol
    // -----------------------------------------------------------------------

    /// Persist the canonical state to both backends, best-effort.
    fn save(&self) {
        Self::mirror_to_file(&self.file_path, &self.state);
        Self::mirror_to_slot(&self.slot, &self.state);
    }

    fn mirror_to_file(file_path: &Path, state: &StoredState) {
        if let Err(err) = write_state_file(file_path, state) {
            tracing::warn!(
                "failed to write state file {}: {err}",
                file_path.display()
            );
        }
    }

    fn mirror_to_slot(slot: &SyncSlot, state: &StoredState) {
        let value = match serde_json::to_value(state) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("failed to encode state for sync slot: {err}");
                return;
            }
        };
        if let Err(err) = slot.put(SYNC_KEY, &value) {
            tracing::warn!("failed to mirror state to sync slot: {err}");
        }
    }

    // -----------------------------------------------------------------------
    // Project operations
    // -----------------------------------------------------------------------

    /// Replace the project with a matching id, or append it. New entries
    /// created with [`devdash_core::OrderKey::Append`] land after all
    /// existing projects once reindexed.
    pub fn upsert_project(&mut self, project: Project) {
        match self
            .state
            .projects
            .iter_mut()
            .find(|p| p.id == project.id)
        {
            Some(existing) => *existing = project,
            None => self.state.projects.push(project),
        }
        ordering::reindex_projects(&mut self.state.projects);
        self.save();
    }

    /// Remove a project by id and close the ordering gap. Unknown ids fall
    /// through to a reindex of the unchanged collection.
    pub fn delete_project(&mut self, id: &ProjectId) {
        self.state.projects.retain(|p| p.id != *id);
        ordering::reindex_projects(&mut self.state.projects);
        self.save();
    }

    /// Move a project within the view selected by `context` (see
    /// [`ordering::reorder_project`]). A project missing from the view is a
    /// no-op: nothing is persisted.
    pub fn reorder_project(
        &mut self,
        id: &ProjectId,
        to_index: usize,
        context: Option<&GroupId>,
    ) {
        if ordering::reorder_project(&mut self.state.projects, id, to_index, context) {
            self.save();
        }
    }

    // -----------------------------------------------------------------------
    // Group operations
    // -----------------------------------------------------------------------

    pub fn upsert_group(&mut self, group: Group) {
        match self.state.groups.iter_mut().find(|g| g.id == group.id) {
            Some(existing) => *existing = group,
            None => self.state.groups.push(group),
        }
        ordering::reindex_groups(&mut self.state.groups);
        self.save();
    }

    /// Remove a group, strip its id from every project's membership list,
    /// and reindex both collections.
    pub fn delete_group(&mut self, id: &GroupId) {
        for project in &mut self.state.projects {
            project.group_ids.retain(|g| g != id);
        }
        self.state.groups.retain(|g| g.id != *id);
        ordering::reindex_groups(&mut self.state.groups);
        ordering::reindex_projects(&mut self.state.projects);
        self.save();
    }

    // -----------------------------------------------------------------------
    // Import / export
    // -----------------------------------------------------------------------

    /// Serialize the canonical state verbatim to `destination`. Does not
    /// touch canonical state; I/O errors are hard.
    pub fn export_to(&self, destination: &Path) -> Result<(), StoreError> {
        let json = render_state(&self.state)?;
        std::fs::write(destination, json).map_err(|e| io_err(destination, e))?;
        Ok(())
    }

    /// Replace the canonical state wholesale from `source` — a destructive
    /// replace, not a merge. Malformed JSON aborts the import with the
    /// canonical state untouched. Missing `version`/`projects`/`groups`
    /// fields default; both collections are reindexed and persisted.
    pub fn import_from(&mut self, source: &Path) -> Result<(), StoreError> {
        let contents = std::fs::read_to_string(source).map_err(|e| io_err(source, e))?;
        let mut value: Value =
            serde_json::from_str(&contents).map_err(|e| StoreError::ImportParse {
                path: source.to_path_buf(),
                source: e,
            })?;
        migrate::migrate_state_value(&mut value);
        let mut imported: StoredState =
            serde_json::from_value(value).map_err(|e| StoreError::ImportParse {
                path: source.to_path_buf(),
                source: e,
            })?;

        ordering::reindex_projects(&mut imported.projects);
        ordering::reindex_groups(&mut imported.groups);
        self.state = imported;
        self.save();
        Ok(())
    }
}

/// Pretty-printed rendition of the state — shared by the file backend and
/// export so the two are byte-identical.
fn render_state(state: &StoredState) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Atomic write: serialize → `.tmp` sibling → rename.
fn write_state_file(path: &Path, state: &StoredState) -> Result<(), StoreError> {
    let json = render_state(state)?;
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid state path")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use devdash_core::OrderKey;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn project(id: &str, groups: &[&str], order: OrderKey) -> Project {
        Project {
            id: ProjectId::from(id),
            name: id.to_string(),
            folder_path: PathBuf::from("/code").join(id),
            url: None,
            group_ids: groups.iter().map(|g| GroupId::from(*g)).collect(),
            order,
            thumbnail_uri: None,
        }
    }

    fn group(id: &str, name: &str) -> Group {
        Group {
            id: GroupId::from(id),
            name: name.to_string(),
            order: OrderKey::Append,
        }
    }

    fn ids_in_order(state: &StoredState) -> Vec<&str> {
        let mut sorted: Vec<&Project> = state.projects.iter().collect();
        sorted.sort_by_key(|p| p.order);
        sorted.iter().map(|p| p.id.0.as_str()).collect()
    }

    #[test]
    fn fresh_open_initializes_both_backends() {
        let tmp = TempDir::new().unwrap();
        let store = ProjectStore::open_at(tmp.path());
        assert_eq!(store.state().version, 1);
        assert!(store.state().projects.is_empty());

        assert!(tmp.path().join("projects.json").exists());
        let slot = SyncSlot::new(tmp.path().join("sync").join("slot.json"));
        let mirrored = slot.get(SYNC_KEY).expect("slot initialized");
        assert_eq!(mirrored["version"], json!(1));
    }

    #[test]
    fn slot_is_preferred_over_file_and_mirrored_back() {
        let tmp = TempDir::new().unwrap();
        let slot = SyncSlot::new(tmp.path().join("sync").join("slot.json"));
        slot.put(
            SYNC_KEY,
            &json!({
                "version": 1,
                "projects": [{"id": "from-slot", "name": "s",
                              "folderPath": "/s", "order": 0}],
                "groups": [],
            }),
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("projects.json"),
            r#"{"version":1,"projects":[{"id":"from-file","name":"f","folderPath":"/f","order":0}],"groups":[]}"#,
        )
        .unwrap();

        let store = ProjectStore::open_at(tmp.path());
        assert_eq!(store.state().projects[0].id.0, "from-slot");

        // The winning copy is mirrored over the file backend.
        let on_disk = std::fs::read_to_string(tmp.path().join("projects.json")).unwrap();
        assert!(on_disk.contains("from-slot"));
        assert!(!on_disk.contains("from-file"));
    }

    #[test]
    fn file_is_adopted_and_mirrored_when_slot_is_empty() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("projects.json"),
            r#"{"version":1,"projects":[{"id":"p1","name":"n","folderPath":"/p","order":0}],"groups":[]}"#,
        )
        .unwrap();

        let store = ProjectStore::open_at(tmp.path());
        assert_eq!(store.state().projects[0].id.0, "p1");

        let slot = SyncSlot::new(tmp.path().join("sync").join("slot.json"));
        let mirrored = slot.get(SYNC_KEY).expect("mirrored into slot");
        assert_eq!(mirrored["projects"][0]["id"], json!("p1"));
    }

    #[test]
    fn legacy_group_id_field_is_migrated_on_load() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("projects.json"),
            r#"{"version":1,"projects":[{"id":"p1","name":"n","folderPath":"/p","groupId":"g1","order":0}],"groups":[]}"#,
        )
        .unwrap();

        let store = ProjectStore::open_at(tmp.path());
        assert_eq!(
            store.state().projects[0].group_ids,
            vec![GroupId::from("g1")]
        );
    }

    #[test]
    fn corrupt_file_degrades_to_empty_state() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("projects.json"), "{definitely not json").unwrap();

        let store = ProjectStore::open_at(tmp.path());
        assert_eq!(store.state().version, 1);
        assert!(store.state().projects.is_empty());
    }

    #[test]
    fn upsert_appends_with_dense_order_and_replaces_by_id() {
        let tmp = TempDir::new().unwrap();
        let mut store = ProjectStore::open_at(tmp.path());
        store.upsert_project(project("a", &[], OrderKey::Append));
        store.upsert_project(project("b", &[], OrderKey::Append));
        assert_eq!(ids_in_order(store.state()), vec!["a", "b"]);
        assert_eq!(store.state().projects[1].order, OrderKey::Assigned(1));

        let mut edited = project("a", &["g1"], OrderKey::Assigned(0));
        edited.name = "renamed".to_string();
        store.upsert_project(edited);
        assert_eq!(store.state().projects.len(), 2);
        assert_eq!(store.state().projects[0].name, "renamed");
    }

    #[test]
    fn delete_closes_ordering_gap() {
        let tmp = TempDir::new().unwrap();
        let mut store = ProjectStore::open_at(tmp.path());
        for id in ["a", "b", "c"] {
            store.upsert_project(project(id, &[], OrderKey::Append));
        }
        store.delete_project(&ProjectId::from("b"));
        assert_eq!(ids_in_order(store.state()), vec!["a", "c"]);
        assert_eq!(store.state().projects[1].order, OrderKey::Assigned(1));
    }

    #[test]
    fn mutations_survive_reload() {
        let tmp = TempDir::new().unwrap();
        {
            let mut store = ProjectStore::open_at(tmp.path());
            store.upsert_project(project("a", &[], OrderKey::Append));
            store.upsert_project(project("b", &[], OrderKey::Append));
            store.reorder_project(&ProjectId::from("b"), 0, None);
        }
        let reopened = ProjectStore::open_at(tmp.path());
        assert_eq!(ids_in_order(reopened.state()), vec!["b", "a"]);
    }

    #[test]
    fn group_deletion_repairs_membership() {
        let tmp = TempDir::new().unwrap();
        let mut store = ProjectStore::open_at(tmp.path());
        store.upsert_group(group("g1", "Work"));
        store.upsert_group(group("g2", "Play"));
        store.upsert_project(project("a", &["g1", "g2"], OrderKey::Append));
        store.upsert_project(project("b", &["g1"], OrderKey::Append));

        store.delete_group(&GroupId::from("g1"));

        assert_eq!(store.state().groups.len(), 1);
        assert_eq!(store.state().groups[0].order, OrderKey::Assigned(0));
        for p in &store.state().projects {
            assert!(
                !p.group_ids.contains(&GroupId::from("g1")),
                "dangling membership for {}",
                p.id
            );
        }
        assert_eq!(
            store.state().projects[0].group_ids,
            vec![GroupId::from("g2")]
        );
    }

    #[test]
    fn import_replaces_wholesale() {
        let tmp = TempDir::new().unwrap();
        let mut store = ProjectStore::open_at(tmp.path());
        store.upsert_project(project("old-1", &[], OrderKey::Append));
        store.upsert_project(project("old-2", &[], OrderKey::Append));

        let source = tmp.path().join("incoming.json");
        std::fs::write(
            &source,
            r#"{"version":2,"projects":[{"id":"x","name":"x","folderPath":"/x","order":5}],"groups":[]}"#,
        )
        .unwrap();
        store.import_from(&source).unwrap();

        assert_eq!(store.state().version, 2);
        assert_eq!(store.state().projects.len(), 1, "replace, not union");
        assert_eq!(store.state().projects[0].id.0, "x");
        assert_eq!(
            store.state().projects[0].order,
            OrderKey::Assigned(0),
            "imported orders are reindexed dense"
        );
    }

    #[test]
    fn import_defaults_missing_collections() {
        let tmp = TempDir::new().unwrap();
        let mut store = ProjectStore::open_at(tmp.path());
        let source = tmp.path().join("incoming.json");
        std::fs::write(&source, r#"{"projects":[]}"#).unwrap();
        store.import_from(&source).unwrap();
        assert_eq!(store.state().version, 1);
        assert!(store.state().groups.is_empty());
    }

    #[test]
    fn malformed_import_leaves_canonical_state_untouched() {
        let tmp = TempDir::new().unwrap();
        let mut store = ProjectStore::open_at(tmp.path());
        store.upsert_project(project("keep", &[], OrderKey::Append));

        let source = tmp.path().join("broken.json");
        std::fs::write(&source, "{broken").unwrap();
        let err = store.import_from(&source).unwrap_err();
        assert!(matches!(err, StoreError::ImportParse { .. }));
        assert_eq!(store.state().projects[0].id.0, "keep");
    }

    #[test]
    fn export_then_import_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let mut store = ProjectStore::open_at(tmp.path());
        store.upsert_group(group("g1", "Work"));
        store.upsert_project(project("a", &["g1"], OrderKey::Append));
        store.upsert_project(project("b", &[], OrderKey::Append));

        let first = tmp.path().join("export-1.json");
        store.export_to(&first).unwrap();
        store.import_from(&first).unwrap();
        let second = tmp.path().join("export-2.json");
        store.export_to(&second).unwrap();

        assert_eq!(
            std::fs::read_to_string(&first).unwrap(),
            std::fs::read_to_string(&second).unwrap()
        );
    }

    #[test]
    #[cfg(unix)]
    fn backend_write_failure_does_not_poison_in_memory_state() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let mut store = ProjectStore::open_at(tmp.path());
        store.upsert_project(project("a", &[], OrderKey::Append));

        // Make the whole data dir read-only so both backend writes fail.
        let mut perms = std::fs::metadata(tmp.path()).unwrap().permissions();
        perms.set_mode(0o555);
        std::fs::set_permissions(tmp.path(), perms).unwrap();

        store.upsert_project(project("b", &[], OrderKey::Append));
        assert_eq!(
            ids_in_order(store.state()),
            vec!["a", "b"],
            "mutation must succeed in memory despite write failure"
        );

        let mut perms = std::fs::metadata(tmp.path()).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(tmp.path(), perms).unwrap();
    }
}
