//! Load a [`ThresholdConfig`] from a YAML file on disk (§6).

use std::path::Path;

use venom_core::{ConfigError, ThresholdConfig};

pub fn load(path: &Path) -> Result<ThresholdConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_reports_read_error() {
        let err = load(Path::new("/no/such/thresholds.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_yaml_reports_parse_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"options: [this, is, not, a, map]").unwrap();
        let err = load(f.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn well_formed_config_loads() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"defaults:\n  p95: \"500ms\"\n").unwrap();
        let cfg = load(f.path()).unwrap();
        assert_eq!(cfg.defaults.p95.unwrap().value_ms, 500.0);
    }
}
