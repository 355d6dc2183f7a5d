use crate::models::dashboard::SharedState;
use crate::models::facets::{FacetSelection, PriorityFilter, StatusFilter};
use crate::models::issue::Channel;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_SCHEMA_VERSION: i64 = 2;

const PRIORITY_FACETS: [&str; 7] = [
    "all", "critical", "high", "medium", "low", "solved", "unsolved",
];
const STATUS_FACETS: [&str; 5] = ["all", "new", "analyzed", "catalyzed", "resolved"];
const CHANNEL_FACETS: [&str; 4] = ["all", "email", "call", "ticket"];

#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveSettings {
    pub selected_account_id: Option<String>,
    pub reviewer_name: String,
    pub contact_signature: String,
    pub default_facets: FacetSelection,
}

#[cfg(feature = "desktop")]
fn settings_dir_for(app: &tauri::AppHandle) -> Result<String, String> {
    use tauri::Manager;
    app.path()
        .app_config_dir()
        .map(|dir| dir.to_string_lossy().to_string())
        .map_err(|e| format!("Could not resolve config directory: {e}"))
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_settings(app: tauri::AppHandle) -> Result<Value, String> {
    load_settings_from_disk(&settings_dir_for(&app)?)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn save_settings(
    settings: Value,
    state: tauri::State<'_, SharedState>,
    app: tauri::AppHandle,
) -> Result<Value, String> {
    let dir = settings_dir_for(&app)?;
    let saved = save_settings_to_disk(&dir, settings)?;
    apply_settings(state.inner(), &effective_from(&saved))?;
    Ok(saved)
}

pub fn load_effective_settings(settings_dir: &str) -> Result<EffectiveSettings, String> {
    let settings = load_settings_from_disk(settings_dir)?;
    Ok(effective_from(&settings))
}

fn effective_from(settings: &Value) -> EffectiveSettings {
    let text = |key: &str| {
        settings
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let facet = |key: &str| {
        settings
            .get("defaultFacets")
            .and_then(|f| f.get(key))
            .cloned()
            .unwrap_or(Value::Null)
    };

    let mut default_facets = FacetSelection {
        priority: serde_json::from_value(facet("priority")).unwrap_or_default(),
        status: serde_json::from_value(facet("status")).unwrap_or_default(),
        channel: serde_json::from_value::<Channel>(facet("channel")).ok(),
        ..FacetSelection::default()
    };

    let show_solved = settings
        .get("showSolvedIssues")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    if !show_solved && default_facets.priority == PriorityFilter::All {
        default_facets.priority = PriorityFilter::Unsolved;
    }
    if !show_solved && default_facets.status == StatusFilter::Resolved {
        default_facets.status = StatusFilter::All;
    }

    EffectiveSettings {
        selected_account_id: Some(text("selectedAccountId")).filter(|id| !id.is_empty()),
        reviewer_name: text("reviewerName"),
        contact_signature: text("contactSignature"),
        default_facets,
    }
}

/// Pushes settings into the live dashboard state.
pub fn apply_settings(state: &SharedState, settings: &EffectiveSettings) -> Result<(), String> {
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    lock.reviewer = settings.reviewer_name.clone();
    lock.contact_signature = settings.contact_signature.clone();
    lock.facets = settings.default_facets.clone();

    if let Some(account_id) = &settings.selected_account_id {
        if let Err(e) = lock.select_account(account_id) {
            log::warn!("ignoring saved account selection: {e}");
        }
    }
    Ok(())
}

/// Reads, migrates and returns the settings document. The file is rewritten
/// whenever migration changed it, so it always holds the current schema.
pub fn load_settings_from_disk(settings_dir: &str) -> Result<Value, String> {
    let path = settings_path(settings_dir)?;
    let stored = read_settings_file(&path)?;

    let migrated = migrate_settings(stored.clone().unwrap_or_else(|| json!({})));
    if stored.as_ref() != Some(&migrated) {
        log::debug!("rewriting {} at schema {SETTINGS_SCHEMA_VERSION}", path.display());
        write_settings_file(&path, &migrated)?;
    }
    Ok(migrated)
}

/// Overlays a partial document on the stored one and persists the result.
pub fn save_settings_to_disk(settings_dir: &str, incoming: Value) -> Result<Value, String> {
    let mut merged = load_settings_from_disk(settings_dir)?;
    overlay(&mut merged, &incoming, Overlay::Replace);

    let migrated = migrate_settings(merged);
    let path = settings_path(settings_dir)?;
    write_settings_file(&path, &migrated)?;
    log::info!("settings saved to {}", path.display());
    Ok(migrated)
}

fn settings_path(settings_dir: &str) -> Result<PathBuf, String> {
    fs::create_dir_all(settings_dir)
        .map_err(|e| format!("Failed to create settings directory: {e}"))?;
    Ok(Path::new(settings_dir).join("settings.json"))
}

/// `None` when the file is missing or unreadable as JSON.
fn read_settings_file(path: &Path) -> Result<Option<Value>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read(path).map_err(|e| format!("Failed to read settings.json: {e}"))?;
    match serde_json::from_slice::<Value>(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("discarding unreadable {}: {e}", path.display());
            Ok(None)
        }
    }
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<(), String> {
    let raw = serde_json::to_vec_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write settings.json: {e}"))
}

/// Keys renamed in a given schema version: (version, old key, new key).
const RENAMED_KEYS: [(i64, &str, &str); 1] = [(1, "analystName", "reviewerName")];

fn migrate_settings(input: Value) -> Value {
    let mut obj = match input {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let version = obj
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    for (since, old, new) in RENAMED_KEYS {
        if version < since {
            if let Some(value) = obj.remove(old) {
                obj.entry(new.to_string()).or_insert(value);
            }
        }
    }

    // V2 folded the single "defaultStatus" key into "defaultFacets".
    if version < 2 {
        if let Some(status) = obj.remove("defaultStatus") {
            let facets = obj
                .entry("defaultFacets".to_string())
                .or_insert_with(|| json!({}));
            if !facets.is_object() {
                *facets = json!({});
            }
            if let Some(facet_obj) = facets.as_object_mut() {
                facet_obj.entry("status".to_string()).or_insert(status);
            }
        }
    }

    let mut out = Value::Object(obj);
    overlay(&mut out, &default_settings(), Overlay::FillMissing);
    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }
    out
}

fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "selectedAccountId": "",
        "reviewerName": "Customer Success",
        "contactSignature": "Customer Success Team",
        "showSolvedIssues": true,
        "defaultFacets": {
            "priority": "all",
            "status": "all",
            "channel": "all"
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    /// Defaults: only add keys the target lacks.
    FillMissing,
    /// User edits: leaf values win over the target.
    Replace,
}

/// Recursive object merge of `layer` into `target`.
fn overlay(target: &mut Value, layer: &Value, mode: Overlay) {
    match (target, layer) {
        (Value::Object(target_obj), Value::Object(layer_obj)) => {
            for (key, value) in layer_obj {
                match target_obj.get_mut(key) {
                    Some(existing) => overlay(existing, value, mode),
                    None => {
                        target_obj.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => {
            if mode == Overlay::Replace {
                *slot = value.clone();
            }
        }
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    ensure_text(obj, "selectedAccountId", "", true);
    ensure_text(obj, "reviewerName", "Customer Success", false);
    ensure_text(obj, "contactSignature", "Customer Success Team", true);
    keep_or_reset(obj, "showSolvedIssues", json!(true), Value::is_boolean);

    let facets = obj
        .entry("defaultFacets".to_string())
        .or_insert_with(|| json!({}));
    if !facets.is_object() {
        *facets = json!({});
    }
    if let Some(facet_obj) = facets.as_object_mut() {
        for (key, allowed) in [
            ("priority", &PRIORITY_FACETS[..]),
            ("status", &STATUS_FACETS[..]),
            ("channel", &CHANNEL_FACETS[..]),
        ] {
            keep_or_reset(facet_obj, key, json!("all"), |v| {
                v.as_str().is_some_and(|s| allowed.contains(&s))
            });
        }
    }
}

fn ensure_text(map: &mut Map<String, Value>, key: &str, default: &str, allow_empty: bool) {
    let value = map
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| allow_empty || !v.is_empty())
        .unwrap_or(default)
        .to_string();
    map.insert(key.to_string(), json!(value));
}

fn keep_or_reset(
    map: &mut Map<String, Value>,
    key: &str,
    default: Value,
    valid: impl Fn(&Value) -> bool,
) {
    if !map.get(key).is_some_and(valid) {
        map.insert(key.to_string(), default);
    }
}
