//! Agent configuration document load/save/merge/validate (§4.4).
//!
//! `AgentConfig` is schema-validated business data, distinct from the
//! kernel's own `infrastructure::config::KernelConfig` process settings.

use std::path::Path;

use rand::Rng;
use serde_json::Value;
use tracing::info;

use crate::domain::errors::{KernelError, KernelResult};
use crate::domain::models::{validate_business_rules, AgentConfig, Behavior, Communication, Identity, Permissions};
use crate::infrastructure::fs::atomic_io;

/// Parse `bytes` as an `AgentConfig` document; used as the `safeLoad`
/// validator so a corrupted live file falls back to the newest backup that
/// still parses.
fn parses_as_agent_config(bytes: &[u8]) -> bool {
    serde_json::from_slice::<AgentConfig>(bytes).is_ok()
}

/// `loadAgentConfig`: resolve → `safeLoad` → parse → strict schema check.
///
/// # Errors
/// `NotFound` if the file is missing, `Corrupted` if no usable backup
/// exists, `InvalidJson`/`SchemaInvalid` if the recovered content still
/// doesn't parse as a well-formed document.
pub async fn load_agent_config(config_path: &Path) -> KernelResult<AgentConfig> {
    let bytes = atomic_io::safe_load(config_path, parses_as_agent_config).await?;
    let cfg: AgentConfig = serde_json::from_slice(&bytes)
        .map_err(|e| KernelError::InvalidJson(e.to_string()))?;
    Ok(cfg)
}

/// `saveAgentConfig`: strict-validate, best-effort backup, then atomic write
/// of a pretty-printed document at mode 0644.
///
/// # Errors
/// `SchemaInvalid` if business validation reports any error; `WriteFailed`
/// if the atomic write itself fails.
pub async fn save_agent_config(config_path: &Path, cfg: &AgentConfig) -> KernelResult<()> {
    let report = validate_business_rules(cfg);
    if !report.is_valid() {
        return Err(KernelError::SchemaInvalid(report.errors.join("; ")));
    }

    atomic_io::create_backup(config_path).await;

    let pretty = serde_json::to_vec_pretty(cfg).map_err(|e| KernelError::InvalidJson(e.to_string()))?;
    atomic_io::atomic_write(config_path, &pretty, true, 0o644).await?;
    info!(path = %config_path.display(), "agent config saved");
    Ok(())
}

/// Lower-case, collapse runs of non-`[a-z0-9]` to a single `-`, trim
/// leading/trailing `-`, cap at 50 chars, re-trim trailing `-`.
pub fn slug(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut last_was_dash = false;
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            last_was_dash = false;
        } else if !last_was_dash {
            out.push('-');
            last_was_dash = true;
        }
    }
    let trimmed = out.trim_matches('-');
    let truncated: String = trimmed.chars().take(50).collect();
    truncated.trim_end_matches('-').to_string()
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    (0..6).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char).collect()
}

/// `generateDefaultConfig`: a complete, valid document with permissive
/// defaults, optionally overridden with a deep-merged `Value`.
pub fn generate_default_config(
    role: &str,
    main_goal: &str,
    _created_by: Option<String>,
    reporting_to: Option<String>,
    overrides: Option<Value>,
) -> KernelResult<AgentConfig> {
    let role_slug = slug(role);
    let ts = chrono::Utc::now().timestamp_millis();
    let id = if role_slug.is_empty() {
        format!("agent-{ts}-{}", random_suffix())
    } else {
        format!("{role_slug}-{ts}-{}", random_suffix())
    };

    let default = AgentConfig {
        identity: Identity {
            id,
            role: role.to_string(),
            display_name: role.to_string(),
            reporting_to,
        },
        permissions: Permissions::default(),
        behavior: Behavior::default(),
        communication: Communication::default(),
        main_goal: main_goal.to_string(),
    };

    let Some(overrides) = overrides else {
        return Ok(default);
    };

    let merged = merge_configs(&default.to_value(), &overrides);
    serde_json::from_value(merged).map_err(|e| KernelError::InvalidJson(e.to_string()))
}

/// Deep merge per §4.4/§9: undefined keys in `over` preserve `base`;
/// explicit `null` replaces; arrays replace wholesale; plain objects merge
/// recursively. Never mutates either input.
pub fn merge_configs(base: &Value, over: &Value) -> Value {
    match (base, over) {
        (Value::Object(base_map), Value::Object(over_map)) => {
            let mut merged = base_map.clone();
            for (key, over_val) in over_map {
                let next = match base_map.get(key) {
                    Some(base_val) => merge_configs(base_val, over_val),
                    None => over_val.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (_, over_val) => over_val.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slug_collapses_and_trims() {
        assert_eq!(slug("Senior Engineer!!"), "senior-engineer");
        assert_eq!(slug("---"), "");
        assert_eq!(slug(""), "");
        let long = "a".repeat(60);
        assert_eq!(slug(&long).len(), 50);
    }

    #[test]
    fn generate_default_config_falls_back_to_agent_prefix_on_empty_slug() {
        let cfg = generate_default_config("!!!", "ship it", None, None, None).unwrap();
        assert!(cfg.identity.id.starts_with("agent-"));
    }

    #[test]
    fn generate_default_config_uses_role_slug_prefix() {
        let cfg = generate_default_config("CTO", "lead eng", None, None, None).unwrap();
        assert!(cfg.identity.id.starts_with("cto-"));
    }

    #[test]
    fn merge_preserves_undefined_replaces_explicit_null_and_replaces_arrays() {
        let base = json!({
            "a": 1,
            "b": { "x": 1, "y": 2 },
            "c": [1, 2, 3],
        });
        let over = json!({
            "b": { "x": 99 },
            "c": [9],
            "d": null,
        });
        let merged = merge_configs(&base, &over);
        assert_eq!(merged["a"], json!(1), "undefined key in override preserves base");
        assert_eq!(merged["b"]["x"], json!(99));
        assert_eq!(merged["b"]["y"], json!(2), "unset nested key preserves base");
        assert_eq!(merged["c"], json!([9]), "arrays replace wholesale, not merge");
        assert_eq!(merged["d"], Value::Null, "explicit null replaces");
    }

    #[test]
    fn merge_is_associative_when_key_sets_are_disjoint() {
        let a = json!({ "a": 1 });
        let b = json!({ "b": 2 });
        let c = json!({ "c": 3 });
        let left = merge_configs(&merge_configs(&a, &b), &c);
        let right = merge_configs(&a, &merge_configs(&b, &c));
        assert_eq!(left, right);
    }

    #[test]
    fn merge_with_empty_override_is_identity() {
        let base = json!({ "a": 1, "b": { "c": 2 } });
        let merged = merge_configs(&base, &json!({}));
        assert_eq!(merged, base);
    }
}
