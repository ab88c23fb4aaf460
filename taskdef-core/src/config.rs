use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ─── Config Types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskdefConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<CreatorDefaults>,
}

/// Task-level defaults applied by the creator when the incoming config omits
/// the corresponding field. Values still pass through the task's own setters,
/// so an out-of-range default fails the same way an explicit one would.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreatorDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<i64>,
}

// ─── Config Format ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Environment Variable Interpolation ──────────────────────────────────────

/// Replace `${VAR_NAME}` patterns in a string with environment variable
/// values. If the environment variable is not set, the original `${VAR_NAME}`
/// is kept.
pub fn interpolate_env_vars(value: &str) -> String {
    let re = Regex::new(r"\$\{([^}]+)\}").expect("invalid regex");
    re.replace_all(value, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}

/// Recursively interpolate environment variables in a serde_json::Value tree.
/// Strings get `${VAR}` replacement; arrays and objects are traversed
/// recursively; other types pass through unchanged.
fn interpolate_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::String(s) => serde_json::Value::String(interpolate_env_vars(&s)),
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(interpolate_value).collect())
        }
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter().map(|(k, v)| (k, interpolate_value(v))).collect(),
        ),
        other => other,
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse a config string in the given format, with environment variable
/// interpolation.
///
/// - **YAML**: env vars are interpolated in the raw string *before* parsing.
/// - **JSON**: the string is parsed first, then env vars are interpolated in
///   values.
///
/// After interpolation, numeric defaults that ended up as strings (from env
/// var substitution) are coerced back to numbers; if coercion fails, the
/// field is cleared.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<TaskdefConfig, ConfigError> {
    let raw: serde_json::Value = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Yaml => {
            let interpolated = interpolate_env_vars(content);
            let parsed: serde_json::Value = serde_yaml::from_str(&interpolated)?;
            // Empty YAML content parses to null; treat as empty config
            if parsed.is_null() {
                return Ok(TaskdefConfig::default());
            }
            parsed
        }
    };

    let interpolated = interpolate_value(raw);
    let final_value = coerce_numeric_defaults(interpolated);

    let config: TaskdefConfig =
        serde_json::from_value(final_value).map_err(ConfigError::JsonParse)?;
    Ok(config)
}

/// If `defaults.priority` or `defaults.maxAttempts` is a JSON string, attempt
/// to parse it as an integer. On success the numeric value replaces it; on
/// failure the field is removed entirely.
fn coerce_numeric_defaults(mut value: serde_json::Value) -> serde_json::Value {
    let defaults = match value.get_mut("defaults") {
        Some(serde_json::Value::Object(map)) => map,
        _ => return value,
    };
    for field in ["priority", "maxAttempts"] {
        if let Some(serde_json::Value::String(s)) = defaults.get(field) {
            match s.parse::<i64>() {
                Ok(n) => {
                    defaults.insert(field.to_string(), serde_json::Value::Number(n.into()));
                }
                Err(_) => {
                    defaults.remove(field);
                }
            }
        }
    }
    value
}

// ─── File Loading ────────────────────────────────────────────────────────────

/// Default config file candidate names, checked in order.
const DEFAULT_CANDIDATES: &[&str] = &[
    "taskdef.config.yaml",
    "taskdef.config.yml",
    "taskdef.config.json",
];

/// Load a config file from disk. If `config_path` is provided, only that path
/// is tried. Otherwise, a list of default candidates is checked in order
/// relative to the current working directory. If no matching file is found,
/// returns a default (empty) config.
pub fn load_config_file(config_path: Option<&str>) -> Result<TaskdefConfig, ConfigError> {
    let base_dir = std::env::current_dir()?;
    load_config_file_from_dir(config_path, &base_dir)
}

fn load_config_file_from_dir(
    config_path: Option<&str>,
    base_dir: &Path,
) -> Result<TaskdefConfig, ConfigError> {
    let candidates: Vec<&str> = match config_path {
        Some(path) => vec![path],
        None => DEFAULT_CANDIDATES.to_vec(),
    };

    for candidate in candidates {
        let full_path = if Path::new(candidate).is_absolute() {
            std::path::PathBuf::from(candidate)
        } else {
            base_dir.join(candidate)
        };

        if !full_path.exists() {
            continue;
        }

        let ext = full_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let content = std::fs::read_to_string(&full_path)?;
        let format = if ext == "json" {
            ConfigFormat::Json
        } else {
            ConfigFormat::Yaml
        };

        return parse_config(&content, format);
    }

    Ok(TaskdefConfig::default())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
