//! Init command implementation

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::config::Settings;

/// Render the starter settings in the format implied by the file extension.
pub(crate) fn render_example(path: &Path) -> Result<String, String> {
    let settings = Settings::example();
    let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");

    if is_toml {
        toml::to_string_pretty(&settings).map_err(|e| e.to_string())
    } else {
        serde_json::to_string_pretty(&settings).map(|s| s + "\n").map_err(|e| e.to_string())
    }
}

/// Run the init command
pub fn run_init(path: Option<&Path>) -> ExitCode {
    let path = path.unwrap_or_else(|| Path::new("settings.json"));

    if path.exists() {
        eprintln!("Error: '{}' already exists", path.display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let contents = match render_example(path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Error: Failed to serialize settings: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = fs::write(path, contents) {
        eprintln!("Error: Cannot write '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Created {}", path.display());
    println!("Set file_path to your image, then run: pxs build");
    ExitCode::from(EXIT_SUCCESS)
}
