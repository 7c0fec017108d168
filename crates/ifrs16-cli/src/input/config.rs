use ifrs16_core::lease_accounting::CalculationOptions;

use super::file::{read_contents, resolve_path};

/// Load calculation options from a `.yaml`/`.yml` or JSON file. Absent
/// fields keep their defaults.
pub fn read_options(path: &str) -> Result<CalculationOptions, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = read_contents(&canonical)?;
    let is_yaml = canonical
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let options: CalculationOptions = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    log::debug!("options from {}: {:?}", canonical.display(), options);
    Ok(options)
}
