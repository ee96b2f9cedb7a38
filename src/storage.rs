// SPDX-License-Identifier: MPL-2.0

//! Session state persistence
//!
//! Each sub-state of [`SessionState`] is stored as a JSON string under its
//! own named slot so a session can be restored after a process restart. An
//! empty or missing slot restores that sub-state's default, and unknown
//! fields inside a slot are ignored.

use crate::errors::{SessionError, SessionResult};
use crate::session::state::SessionState;
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Named persistence slot, one per sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateSlot {
    Media,
    Permission,
    CameraInfo,
    Controls,
    Panels,
    Capture,
    Config,
    Orientation,
    Focus,
}

impl StateSlot {
    pub const ALL: [StateSlot; 9] = [
        StateSlot::Media,
        StateSlot::Permission,
        StateSlot::CameraInfo,
        StateSlot::Controls,
        StateSlot::Panels,
        StateSlot::Capture,
        StateSlot::Config,
        StateSlot::Orientation,
        StateSlot::Focus,
    ];

    /// Storage key of the slot
    pub fn key(&self) -> &'static str {
        match self {
            StateSlot::Media => "camera_media_state",
            StateSlot::Permission => "camera_permission_state",
            StateSlot::CameraInfo => "camera_info_state",
            StateSlot::Controls => "camera_controls_state",
            StateSlot::Panels => "camera_panels_state",
            StateSlot::Capture => "camera_capture_state",
            StateSlot::Config => "camera_config_state",
            StateSlot::Orientation => "camera_orientation_state",
            StateSlot::Focus => "camera_focus_state",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }
}

impl std::fmt::Display for StateSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// String store keyed by slot
pub trait StateStore: Send + Sync {
    /// Stored value of `slot`, `None` when never saved
    fn load(&self, slot: StateSlot) -> SessionResult<Option<String>>;

    fn save(&self, slot: StateSlot, value: &str) -> SessionResult<()>;
}

/// In-memory store, lost with the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<StateSlot, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, slot: StateSlot) -> SessionResult<Option<String>> {
        Ok(self.slots.lock().get(&slot).cloned())
    }

    fn save(&self, slot: StateSlot, value: &str) -> SessionResult<()> {
        self.slots.lock().insert(slot, value.to_string());
        Ok(())
    }
}

/// Directory holding one `<slot>.json` file per slot
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the user's data directory
    pub fn default_location() -> SessionResult<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| SessionError::Storage("no user data directory".into()))?;
        Ok(Self::new(base.join(crate::constants::APP_DIR_NAME)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, slot: StateSlot) -> PathBuf {
        self.dir.join(format!("{}.json", slot.key()))
    }
}

impl StateStore for FileStore {
    fn load(&self, slot: StateSlot) -> SessionResult<Option<String>> {
        match std::fs::read_to_string(self.path(slot)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::Storage(format!("{slot}: {e}"))),
        }
    }

    fn save(&self, slot: StateSlot, value: &str) -> SessionResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(slot), value)
            .map_err(|e| SessionError::Storage(format!("{slot}: {e}")))
    }
}

/// Serialize one sub-state
pub fn encode<T: Serialize>(value: &T) -> SessionResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Deserialize one sub-state; blank input gives the default
pub fn decode<T: DeserializeOwned + Default>(text: &str) -> SessionResult<T> {
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(text)?)
}

fn restore_slot<T: DeserializeOwned + Default>(
    store: &dyn StateStore,
    slot: StateSlot,
) -> SessionResult<T> {
    let text = store.load(slot)?.unwrap_or_default();
    decode(&text).map_err(|e| SessionError::Storage(format!("{slot}: {e}")))
}

/// Save every persisted sub-state of `state`
///
/// Connectivity is runtime-only and not saved.
pub fn save_state(store: &dyn StateStore, state: &SessionState) -> SessionResult<()> {
    store.save(StateSlot::Media, &encode(&state.media)?)?;
    store.save(StateSlot::Permission, &encode(&state.permission)?)?;
    store.save(StateSlot::CameraInfo, &encode(&state.camera_info)?)?;
    store.save(StateSlot::Controls, &encode(&state.controls)?)?;
    store.save(StateSlot::Panels, &encode(&state.panels)?)?;
    store.save(StateSlot::Capture, &encode(&state.capture)?)?;
    store.save(StateSlot::Config, &encode(&state.config)?)?;
    store.save(StateSlot::Orientation, &encode(&state.orientation)?)?;
    store.save(StateSlot::Focus, &encode(&state.focus_indicator)?)?;
    info!(
        session = %state.media.session_tag,
        media = state.media.media.len(),
        "Session state saved"
    );
    Ok(())
}

/// Rebuild a session state from its slots
pub fn restore_state(store: &dyn StateStore) -> SessionResult<SessionState> {
    let state = SessionState {
        media: restore_slot(store, StateSlot::Media)?,
        permission: restore_slot(store, StateSlot::Permission)?,
        camera_info: restore_slot(store, StateSlot::CameraInfo)?,
        controls: restore_slot(store, StateSlot::Controls)?,
        panels: restore_slot(store, StateSlot::Panels)?,
        capture: restore_slot(store, StateSlot::Capture)?,
        config: restore_slot(store, StateSlot::Config)?,
        orientation: restore_slot(store, StateSlot::Orientation)?,
        focus_indicator: restore_slot(store, StateSlot::Focus)?,
        connection: Default::default(),
    };
    debug!(session = %state.media.session_tag, "Session state restored");
    Ok(state)
}

/// Raw contents of every slot that has been saved
pub fn dump(store: &dyn StateStore) -> SessionResult<Vec<(StateSlot, String)>> {
    let mut slots = Vec::new();
    for slot in StateSlot::ALL {
        if let Some(value) = store.load(slot)? {
            slots.push((slot, value));
        }
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::{FocusIndicatorState, OrientationState, PermissionState};

    #[test]
    fn test_slot_keys_round_trip() {
        for slot in StateSlot::ALL {
            assert_eq!(StateSlot::from_key(slot.key()), Some(slot));
        }
        assert_eq!(StateSlot::from_key("camera_unknown_state"), None);
    }

    #[test]
    fn test_blank_input_decodes_to_default() {
        let permission: PermissionState = decode("").expect("blank decodes");
        assert_eq!(permission, PermissionState::default());
        let focus: FocusIndicatorState = decode("  \n").expect("blank decodes");
        assert_eq!(focus, FocusIndicatorState::default());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let permission: PermissionState =
            decode(r#"{"granted": true, "legacy_flag": 3}"#).expect("decodes");
        assert!(permission.granted);
        assert!(!permission.authenticated);
    }

    #[test]
    fn test_malformed_slot_is_a_storage_error() {
        let store = MemoryStore::new();
        store
            .save(StateSlot::Orientation, "{not json")
            .expect("memory save");
        let err = restore_state(&store).expect_err("malformed slot");
        assert!(matches!(err, SessionError::Storage(msg) if msg.starts_with("camera_orientation_state")));
    }

    #[test]
    fn test_empty_store_restores_default_state() {
        let store = MemoryStore::new();
        let state = restore_state(&store).expect("restores");
        assert_eq!(state, SessionState::default());
        assert!(dump(&store).expect("dump").is_empty());
    }

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryStore::new();
        let mut state = SessionState::new("abc");
        state.orientation = OrientationState {
            orientation: crate::orientation::Orientation::LandscapeLeft,
            fixed_orientation: None,
        };
        state.permission.granted = true;

        save_state(&store, &state).expect("saves");
        assert_eq!(dump(&store).expect("dump").len(), StateSlot::ALL.len());
        assert_eq!(restore_state(&store).expect("restores"), state);
    }
}
