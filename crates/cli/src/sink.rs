//! Persist the planet → workforce mapping as JSON.

use std::collections::BTreeMap;
use std::path::Path;

use orbitmap_workforce::DerivedRecord;

use crate::exit_codes;
use crate::CliError;

/// Render the mapping. Keys are sorted, so identical input gives
/// byte-identical output.
pub fn render_planets(planets: &BTreeMap<String, DerivedRecord>, pretty: bool) -> Result<String, CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(planets)
    } else {
        serde_json::to_string(planets)
    };
    rendered.map_err(|e| CliError {
        code: exit_codes::EXIT_ERROR,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })
}

/// Write `json` to `path` atomically (temp file, then rename), creating
/// the parent directory if needed.
pub fn write_json(path: &Path, json: &str) -> Result<(), CliError> {
    let write_err = |what: &str, e: std::io::Error| CliError {
        code: exit_codes::EXIT_OUTPUT_WRITE,
        message: format!("{what} {}: {e}", path.display()),
        hint: None,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_err("cannot create directory for", e))?;
    }

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json).map_err(|e| write_err("cannot write", e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        write_err("cannot replace", e)
    })?;

    log::info!("wrote {} bytes to {}", json.len(), path.display());
    Ok(())
}
