//! Settings loading and discovery
//!
//! Provides functions to find, load, and override run settings.

use super::schema::Settings;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File names searched for, in order of preference.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["settings.json", "pxs.toml"];

/// Settings loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No settings file found and none given
    #[error("No settings file found (looked for {})", CONFIG_FILE_NAMES.join(", "))]
    NotFound,
    /// File I/O error
    #[error("Failed to read settings '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON parsing error
    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// TOML parsing error
    #[error("Failed to parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// Validation error
    #[error("Settings validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Command-line values that take precedence over the settings file
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the source image
    pub image: Option<PathBuf>,
    /// Override pixels per block
    pub pixel_size: Option<f64>,
    /// Override the maximum command length (`-1` for unbounded)
    pub max_length: Option<i64>,
    /// Override rotation angles `[x, y, z]`
    pub rotation: Option<[f64; 3]>,
    /// Rotate about the origin instead of the centroid
    pub no_center: bool,
    /// Force writing commands to disk
    pub write: bool,
    /// Override the output directory
    pub out: Option<PathBuf>,
}

/// A loaded settings file and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub path: PathBuf,
}

impl LoadedSettings {
    /// Directory relative paths in the settings are resolved against.
    pub fn root(&self) -> &Path {
        project_root(&self.path).unwrap_or_else(|| Path::new(""))
    }
}

/// Find a settings file by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find a settings file by walking up from a specific directory.
///
/// In each directory `settings.json` is preferred over `pxs.toml`.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        for name in CONFIG_FILE_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load settings from `path`, or from a discovered settings file.
///
/// Relative `file_path` and `output_dir` values are resolved against the
/// directory holding the settings file.
pub fn load_settings(path: Option<&Path>) -> Result<LoadedSettings, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => find_config().ok_or(ConfigError::NotFound)?,
    };

    let settings = load_settings_file(&path)?;
    let mut loaded = LoadedSettings { settings, path };

    let root = loaded.root().to_path_buf();
    loaded.settings.file_path = resolve_path(&root, &loaded.settings.file_path);
    loaded.settings.output_dir = resolve_path(&root, &loaded.settings.output_dir);
    Ok(loaded)
}

/// Parse a settings file without validating it.
///
/// `.toml` files are read as TOML, everything else as JSON.
pub fn parse_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

    let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
    if is_toml {
        toml::from_str(&contents).map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })
    } else {
        serde_json::from_str(&contents)
            .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
    }
}

/// Parse and validate a settings file.
fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    let settings = parse_settings_file(path)?;
    check(&settings)?;
    Ok(settings)
}

/// Turn validation problems into a `ConfigError`.
pub fn check(settings: &Settings) -> Result<(), ConfigError> {
    let errors = settings.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Merge CLI overrides into the settings.
///
/// CLI arguments take precedence over file values. Overridden settings are
/// validated again.
pub fn merge_cli_overrides(settings: &mut Settings, overrides: &CliOverrides) -> Result<(), ConfigError> {
    if let Some(ref image) = overrides.image {
        settings.file_path = image.clone();
    }
    if let Some(pixel_size) = overrides.pixel_size {
        settings.pixel_size = pixel_size;
    }
    if let Some(max_length) = overrides.max_length {
        settings.max_length_command = max_length;
    }
    if let Some([x, y, z]) = overrides.rotation {
        settings.rotation = Some(super::schema::RotationConfig { x, y, z });
    }
    if overrides.no_center {
        settings.rotate_around_center = false;
    }
    if overrides.write {
        settings.write_to_file = true;
    }
    if let Some(ref out) = overrides.out {
        settings.output_dir = out.clone();
    }

    check(settings)
}

/// Get the directory holding a settings file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the settings directory.
///
/// If the path is absolute, returns it unchanged.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MaxLength;
    use crate::transform::EulerAngles;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    const SETTINGS_JSON: &[u8] = br##"{
        "file_path": "art/picture.png",
        "pixel_size": 16,
        "max_length_command": 32500,
        "colors": {"minecraft:white_concrete": "#FFFFFF", "minecraft:black_concrete": "#000000"}
    }"##;

    fn write_file(path: &Path, contents: &[u8]) {
        File::create(path)
            .expect("should create settings file")
            .write_all(contents)
            .expect("should write settings content");
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("settings.json");
        write_file(&config_path, SETTINGS_JSON);

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("pxs.toml");
        write_file(&config_path, b"");

        let subdir = temp.path().join("art").join("sprites");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_prefers_json() {
        let temp = TempDir::new().expect("should create temp dir");
        write_file(&temp.path().join("pxs.toml"), b"");
        write_file(&temp.path().join("settings.json"), SETTINGS_JSON);

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(temp.path().join("settings.json")));
    }

    #[test]
    fn test_load_settings_resolves_paths() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("settings.json");
        write_file(&config_path, SETTINGS_JSON);

        let loaded = load_settings(Some(&config_path)).expect("should load valid settings");
        assert_eq!(loaded.settings.file_path, temp.path().join("art/picture.png"));
        assert_eq!(loaded.settings.output_dir, temp.path().join("output"));
        assert_eq!(loaded.settings.max_length(), MaxLength::Limit(32500));
        assert_eq!(loaded.root(), temp.path());
    }

    #[test]
    fn test_load_settings_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("pxs.toml");
        write_file(
            &config_path,
            br##"
file_path = "/abs/picture.png"
pixel_size = 2.0
max_length_command = -1
X = 45.0

[colors]
"minecraft:stone" = "#7D7D7D"
"##,
        );

        let loaded = load_settings(Some(&config_path)).expect("should load valid settings");
        assert_eq!(loaded.settings.file_path, PathBuf::from("/abs/picture.png"));
        assert_eq!(loaded.settings.angles(), EulerAngles::new(45.0, 0.0, 0.0));
    }

    #[test]
    fn test_load_settings_parse_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("settings.json");
        write_file(&config_path, b"{ not json");

        let err = load_settings(Some(&config_path)).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn test_load_settings_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("settings.json");
        write_file(
            &config_path,
            br##"{"file_path": "a.png", "pixel_size": -2, "max_length_command": -1, "colors": {"a": "#000"}}"##,
        );

        match load_settings(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors, vec!["'pixel_size' must be a positive number".to_string()]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_settings_missing_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let err = load_settings(Some(&temp.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut settings: Settings = serde_json::from_slice(SETTINGS_JSON).unwrap();
        let overrides = CliOverrides {
            image: Some(PathBuf::from("other.png")),
            pixel_size: Some(8.0),
            max_length: Some(-1),
            rotation: Some([0.0, 90.0, 0.0]),
            no_center: true,
            write: true,
            out: Some(PathBuf::from("dist")),
        };
        merge_cli_overrides(&mut settings, &overrides).expect("overrides should be valid");

        assert_eq!(settings.file_path, PathBuf::from("other.png"));
        assert_eq!(settings.pixel_size, 8.0);
        assert_eq!(settings.max_length(), MaxLength::Unbounded);
        assert_eq!(settings.angles(), EulerAngles::new(0.0, 90.0, 0.0));
        assert!(!settings.rotate_around_center);
        assert!(settings.write_to_file);
        assert_eq!(settings.output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_merge_cli_overrides_revalidates() {
        let mut settings: Settings = serde_json::from_slice(SETTINGS_JSON).unwrap();
        let overrides = CliOverrides { pixel_size: Some(0.0), ..Default::default() };
        assert!(matches!(
            merge_cli_overrides(&mut settings, &overrides),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/project");
        assert_eq!(resolve_path(root, Path::new("a.png")), PathBuf::from("/project/a.png"));
        assert_eq!(resolve_path(root, Path::new("/abs/a.png")), PathBuf::from("/abs/a.png"));
    }
}
