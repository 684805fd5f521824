//! Scenario files
//!
//! A scenario is one test case written as YAML:
//!
//! ```yaml
//! name: test_press_individual_buttons
//! application: calculator
//! steps:
//!   - action: press_number
//!     value: 9
//!   - action: press_operator
//!     value: "+"
//!   - action: press_number
//!     value: 3
//!   - action: press_equal
//!   - action: expect_result
//!     value: "12"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{HarnessError, Result};

/// One step of a calculator scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Step {
    PressNumber(i64),
    PressOperator(String),
    PressEqual,
    Clear,
    /// Result field must equal the given text
    ExpectResult(String),
    /// Formula field must equal the given text (usually empty)
    ExpectEmptyResult(String),
}

/// A discovered test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Test name; defaults to the file stem
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Application to resolve; the run default when absent
    #[serde(default)]
    pub application: Option<String>,
    pub steps: Vec<Step>,
    /// File the scenario was loaded from
    #[serde(skip)]
    pub path: PathBuf,
}

impl Scenario {
    /// Parse a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut scenario: Scenario = serde_yaml::from_str(&content)?;

        if scenario.name.trim().is_empty() {
            scenario.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    HarnessError::config(format!("Cannot name scenario {}", path.display()))
                })?;
        }
        scenario.path = path.to_path_buf();
        Ok(scenario)
    }

    /// Node id shown in reports: `<path>::<name>`
    pub fn id(&self) -> String {
        format!("{}::{}", self.path.display(), self.name)
    }
}

/// Scenario file that failed to parse
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: HarnessError,
}

/// Outcome of scanning a scenario directory
#[derive(Debug, Default)]
pub struct Discovery {
    pub scenarios: Vec<Scenario>,
    /// Files that were found but could not be loaded
    pub failures: Vec<LoadFailure>,
}

impl Discovery {
    /// Number of collected files, loadable or not
    pub fn len(&self) -> usize {
        self.scenarios.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Find every `*.yaml` / `*.yml` scenario under `dir`, sorted by path
///
/// A missing directory yields no scenarios. A file that fails to load is
/// kept in [`Discovery::failures`] instead of stopping the scan.
pub fn discover(dir: &Path) -> Result<Discovery> {
    let mut paths = Vec::new();
    for ext in ["yaml", "yml"] {
        let pattern = dir.join("**").join(format!("*.{}", ext));
        let pattern = pattern.to_string_lossy();
        let entries = glob::glob(&pattern)
            .map_err(|e| HarnessError::config(format!("Bad scenario pattern {}: {}", pattern, e)))?;
        for entry in entries {
            let path = entry.map_err(|e| HarnessError::Io(e.into()))?;
            if path.is_file() {
                paths.push(path);
            }
        }
    }
    paths.sort();

    let mut discovery = Discovery::default();
    for path in paths {
        match Scenario::load(&path) {
            Ok(scenario) => discovery.scenarios.push(scenario),
            Err(error) => discovery.failures.push(LoadFailure { path, error }),
        }
    }
    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDITION: &str = r#"
name: test_press_individual_buttons
steps:
  - action: press_number
    value: 9
  - action: press_operator
    value: "+"
  - action: press_number
    value: 3
  - action: press_equal
  - action: expect_result
    value: "12"
"#;

    #[test]
    fn test_parse_steps() {
        let scenario: Scenario = serde_yaml::from_str(ADDITION).unwrap();
        assert_eq!(scenario.name, "test_press_individual_buttons");
        assert_eq!(
            scenario.steps,
            vec![
                Step::PressNumber(9),
                Step::PressOperator("+".into()),
                Step::PressNumber(3),
                Step::PressEqual,
                Step::ExpectResult("12".into()),
            ]
        );
    }

    #[test]
    fn test_discover_sorts_and_names() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("calculator");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("b_addition.yaml"), ADDITION).unwrap();
        fs::write(
            nested.join("a_clear.yml"),
            "steps:\n  - action: clear\n  - action: expect_empty_result\n    value: \"\"\n",
        )
        .unwrap();
        fs::write(nested.join("notes.txt"), "ignored").unwrap();

        let scenarios = discover(temp.path()).unwrap().scenarios;
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].name, "a_clear");
        assert_eq!(scenarios[1].name, "test_press_individual_buttons");
        assert!(scenarios[1].id().ends_with("b_addition.yaml::test_press_individual_buttons"));
    }

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let discovery = discover(&temp.path().join("nope")).unwrap();
        assert!(discovery.is_empty());
    }

    #[test]
    fn test_discover_keeps_broken_files() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("good.yaml"), ADDITION).unwrap();
        fs::write(temp.path().join("zbad.yaml"), "steps:\n  - action: swipe\n").unwrap();

        let discovery = discover(temp.path()).unwrap();
        assert_eq!(discovery.len(), 2);
        assert_eq!(discovery.scenarios.len(), 1);
        assert_eq!(discovery.failures.len(), 1);
        assert!(discovery.failures[0].path.ends_with("zbad.yaml"));
        assert!(matches!(discovery.failures[0].error, HarnessError::Yaml(_)));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bad.yaml");
        fs::write(&path, "steps:\n  - action: swipe\n").unwrap();

        let err = Scenario::load(&path).unwrap_err();
        assert!(matches!(err, HarnessError::Yaml(_)));
    }
}
