//! Method Configuration
//!
//! The closed set of methods this pipeline configures, and the validated
//! mapping from each method to its configuration text.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use super::extractor::{count_blocks, extract_block, scan_blocks};
use crate::error::ConfigError;
use crate::monitoring::Diagnostics;

/// Methods that take a configuration block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// aljamia run producing the uncalibrated scan table
    Aljamia1,
    /// aljamia run producing the scan-to-peptide relationship table
    Aljamia2,
}

impl Method {
    /// Every method the pipeline requires, in execution order.
    pub const REQUIRED: [Method; 2] = [Method::Aljamia1, Method::Aljamia2];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Aljamia1 => "aljamia1",
            Self::Aljamia2 => "aljamia2",
        }
    }

    /// Looks up a method by name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::REQUIRED
            .into_iter()
            .find(|method| method.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration text for every required method.
///
/// Construction validates eagerly: all missing methods are reported in a
/// single error, and no value exists unless every method is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodConfig {
    configs: BTreeMap<Method, String>,
}

impl MethodConfig {
    /// Extracts every required block from a combined parameter string.
    ///
    /// Blocks for other tools (e.g. `klibrate1`) may share the string; they
    /// are reported and ignored.
    pub fn from_parameter_string(
        params: &str,
        diagnostics: &Diagnostics,
    ) -> Result<Self, ConfigError> {
        let mut configs = BTreeMap::new();
        let mut missing = Vec::new();

        for method in Method::REQUIRED {
            match extract_block(params, method.name()) {
                Ok(config) => {
                    let count = count_blocks(params, method.name())
                        .map_err(|err| logged(err, diagnostics))?;
                    if count > 1 {
                        diagnostics.warn(format!(
                            "several blocks for the {} method, using the first one",
                            method
                        ));
                    }
                    diagnostics.debug(format!("{} parameters: {}", method, config));
                    configs.insert(method, config);
                }
                Err(ConfigError::MissingMethods(_)) => missing.push(method.name().to_string()),
                Err(other) => return Err(logged(other, diagnostics)),
            }
        }

        for block in scan_blocks(params) {
            if Method::from_name(&block.name).is_none() {
                diagnostics.warn(format!("ignoring parameters for the {} method", block.name));
            }
        }

        Self::validated(configs, missing, diagnostics)
    }

    /// Builds the configuration from a YAML mapping of method name to text.
    ///
    /// ```yaml
    /// aljamia1: "-i [Raw_FirstScan]-[Charge] -j [Xs_127_N_126]"
    /// aljamia2: "-i [Sequence] -j [Raw_FirstScan]-[Charge]"
    /// ```
    pub fn from_yaml_str(
        content: &str,
        path: &Path,
        diagnostics: &Diagnostics,
    ) -> Result<Self, ConfigError> {
        let raw: BTreeMap<String, String> =
            serde_yaml::from_str(content).map_err(|source| {
                let err = ConfigError::ParamsFileParse {
                    path: path.to_path_buf(),
                    source,
                };
                logged(err, diagnostics)
            })?;

        let mut configs = BTreeMap::new();
        for (name, config) in raw {
            match Method::from_name(&name) {
                Some(method) => {
                    if configs.insert(method, config).is_some() {
                        diagnostics.warn(format!("duplicate entry for the {} method", method));
                    }
                }
                None => diagnostics.warn(format!("ignoring parameters for the {} method", name)),
            }
        }

        let missing = Method::REQUIRED
            .into_iter()
            .filter(|method| !configs.contains_key(method))
            .map(|method| method.name().to_string())
            .collect();

        Self::validated(configs, missing, diagnostics)
    }

    /// Reads and validates a YAML parameter file.
    pub fn load_yaml(path: &Path, diagnostics: &Diagnostics) -> Result<Self, ConfigError> {
        diagnostics.info(format!("loading parameters from {}", path.display()));

        let content = fs::read_to_string(path).map_err(|source| {
            let err = ConfigError::ParamsFileRead {
                path: path.to_path_buf(),
                source,
            };
            logged(err, diagnostics)
        })?;

        Self::from_yaml_str(&content, path, diagnostics)
    }

    fn validated(
        configs: BTreeMap<Method, String>,
        missing: Vec<String>,
        diagnostics: &Diagnostics,
    ) -> Result<Self, ConfigError> {
        if !missing.is_empty() {
            return Err(logged(ConfigError::MissingMethods(missing), diagnostics));
        }
        Ok(Self { configs })
    }

    /// Returns the configuration text for a method.
    pub fn get(&self, method: Method) -> Option<&str> {
        self.configs.get(&method).map(String::as_str)
    }

    /// Returns the configuration text, failing if the method is absent.
    pub fn require(&self, method: Method) -> Result<&str, ConfigError> {
        self.get(method)
            .ok_or_else(|| ConfigError::MissingMethods(vec![method.name().to_string()]))
    }
}

fn logged(err: ConfigError, diagnostics: &Diagnostics) -> ConfigError {
    diagnostics.error(err.to_string());
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use std::path::PathBuf;

    fn diagnostics() -> Diagnostics {
        Diagnostics::capturing("test")
    }

    #[test]
    fn test_method_names() {
        assert_eq!(Method::Aljamia1.to_string(), "aljamia1");
        assert_eq!(Method::from_name(" ALJAMIA2 "), Some(Method::Aljamia2));
        assert_eq!(Method::from_name("aljamia11"), None);
        assert_eq!(Method::from_name("klibrate1"), None);
    }

    #[test]
    fn test_from_parameter_string() {
        let diag = diagnostics();
        let config = MethodConfig::from_parameter_string(
            "{aljamia1: -i [Seq] } {aljamia2: -i [Raw]-[Charge] }",
            &diag,
        )
        .unwrap();

        assert_eq!(config.get(Method::Aljamia1), Some("-i [Seq] "));
        assert_eq!(config.require(Method::Aljamia2).unwrap(), "-i [Raw]-[Charge] ");
    }

    #[test]
    fn test_all_missing_methods_reported_together() {
        let diag = diagnostics();
        let err = MethodConfig::from_parameter_string("{klibrate1: -g }", &diag).unwrap_err();

        match err {
            ConfigError::MissingMethods(missing) => {
                assert_eq!(missing, vec!["aljamia1", "aljamia2"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(diag.has_record(Level::Error, "aljamia1, aljamia2"));
    }

    #[test]
    fn test_missing_second_block() {
        let diag = diagnostics();
        let err =
            MethodConfig::from_parameter_string("{aljamia1: -i [Seq] }", &diag).unwrap_err();
        assert_eq!(err.to_string(), "checking the parameters for the aljamia2 method");
    }

    #[test]
    fn test_unknown_blocks_are_warned_and_ignored() {
        let diag = diagnostics();
        let config = MethodConfig::from_parameter_string(
            "{aljamia1: a} {aljamia2: b} {klibrate1: -g  -f }",
            &diag,
        )
        .unwrap();

        assert_eq!(config.get(Method::Aljamia2), Some("b"));
        assert!(diag.has_record(Level::Warn, "klibrate1"));
    }

    #[test]
    fn test_duplicate_block_warns() {
        let diag = diagnostics();
        let config =
            MethodConfig::from_parameter_string("{aljamia1: a} {aljamia1: z} {aljamia2: b}", &diag)
                .unwrap();

        assert_eq!(config.get(Method::Aljamia1), Some("a"));
        assert!(diag.has_record(Level::Warn, "several blocks for the aljamia1 method"));
    }

    #[test]
    fn test_from_yaml_str() {
        let diag = diagnostics();
        let yaml = "aljamia1: \"-i [Seq]\"\nALJAMIA2: \"-i [Raw]-[Charge]\"\nklibrate1: \"-g\"\n";
        let config = MethodConfig::from_yaml_str(yaml, Path::new("params.yaml"), &diag).unwrap();

        assert_eq!(config.get(Method::Aljamia1), Some("-i [Seq]"));
        assert_eq!(config.get(Method::Aljamia2), Some("-i [Raw]-[Charge]"));
        assert!(diag.has_record(Level::Warn, "klibrate1"));
    }

    #[test]
    fn test_from_yaml_str_missing_method() {
        let diag = diagnostics();
        let err = MethodConfig::from_yaml_str("aljamia2: x\n", Path::new("p.yaml"), &diag)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingMethods(ref m) if m == &["aljamia1"]));
    }

    #[test]
    fn test_from_yaml_str_malformed() {
        let diag = diagnostics();
        let err = MethodConfig::from_yaml_str("[[[", Path::new("bad.yaml"), &diag).unwrap_err();
        assert!(matches!(err, ConfigError::ParamsFileParse { .. }));
        assert!(diag.has_record(Level::Error, "bad.yaml"));
    }

    #[test]
    fn test_load_yaml() {
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("params.yaml");
        std::fs::write(&path, "aljamia1: one\naljamia2: two\n").unwrap();

        let config = MethodConfig::load_yaml(&path, &diagnostics()).unwrap();
        assert_eq!(config.get(Method::Aljamia1), Some("one"));
    }

    #[test]
    fn test_load_yaml_not_found() {
        let path = PathBuf::from("/nonexistent/params.yaml");
        let diag = diagnostics();
        let err = MethodConfig::load_yaml(&path, &diag).unwrap_err();
        assert!(matches!(err, ConfigError::ParamsFileRead { .. }));
        assert!(diag.has_record(Level::Error, "/nonexistent/params.yaml"));
    }
}
