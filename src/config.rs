//! Configuration handling for recipegen.
//! Loads the generator configuration document (JSON, with a YAML fallback),
//! enforces its invariants through setters and saves it back to disk.

use crate::constants::{DEFAULT_NAMESPACE, DEFAULT_OUTPUT_DIR, DEFAULT_TEMPLATE_DIR};
use crate::error::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Substring substitutions keyed by match key (`*`, bare name or full value).
/// Both levels keep document order.
pub type ExtraRules = IndexMap<String, IndexMap<String, String>>;

/// A set of values substituted for one placeholder type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacementRule {
    /// Placeholder name without braces, e.g. `tree` for `{tree}`.
    pub r#type: String,
    /// Candidate values in enumeration order.
    pub values: Vec<String>,
    #[serde(default)]
    pub extra: ExtraRules,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
}

fn default_enabled() -> bool {
    true
}

impl ReplacementRule {
    pub fn new<T, V>(r#type: T, values: V) -> Self
    where
        T: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            r#type: r#type.into(),
            values: values.into_iter().map(Into::into).collect(),
            extra: ExtraRules::new(),
            enabled: true,
            description: String::new(),
        }
    }

    /// Adds an `old -> new` substitution under `key`.
    pub fn with_extra(mut self, key: &str, old: &str, new: &str) -> Self {
        self.extra
            .entry(key.to_string())
            .or_default()
            .insert(old.to_string(), new.to_string());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Key used to detect duplicate rules: the type plus its values in sorted order.
    fn dedup_key(&self) -> (String, Vec<String>) {
        let mut values = self.values.clone();
        values.sort();
        (self.r#type.clone(), values)
    }
}

/// On-disk shape of the configuration. Missing fields take their defaults
/// and unknown fields are ignored.
#[derive(Debug, Serialize, Deserialize)]
struct ConfigDocument {
    #[serde(default = "default_output_dir")]
    output_dir: String,
    #[serde(default = "default_template_dir")]
    template_dir: String,
    #[serde(default = "default_namespace")]
    default_namespace: String,
    #[serde(default)]
    template_files: Vec<String>,
    #[serde(default)]
    replacements: Vec<ReplacementRule>,
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_template_dir() -> String {
    DEFAULT_TEMPLATE_DIR.to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// Generator configuration.
///
/// `template_files` and `rules` are only reachable through setters so the
/// dedup invariants always hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub output_dir: String,
    pub template_dir: String,
    pub default_namespace: String,
    template_files: Vec<String>,
    rules: Vec<ReplacementRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            template_dir: default_template_dir(),
            default_namespace: default_namespace(),
            template_files: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl From<ConfigDocument> for Config {
    fn from(doc: ConfigDocument) -> Self {
        let mut config = Config {
            output_dir: doc.output_dir,
            template_dir: doc.template_dir,
            default_namespace: doc.default_namespace,
            ..Config::default()
        };
        config.set_template_files(doc.template_files);
        config.set_rules(doc.replacements);
        config
    }
}

impl Config {
    /// Loads the configuration from `path`.
    ///
    /// # Errors
    /// * `Error::ConfigNotFound` if the file does not exist
    /// * `Error::ConfigParseError` if the content is neither valid JSON nor YAML
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::ConfigNotFound { path: path.display().to_string() });
        }
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration content, trying JSON first and YAML second.
    pub fn parse(content: &str) -> Result<Self> {
        let doc: ConfigDocument = match serde_json::from_str(content) {
            Ok(doc) => doc,
            Err(json_err) => serde_yaml::from_str(content).map_err(|yaml_err| {
                debug!("YAML fallback failed: {}", yaml_err);
                Error::ConfigParseError(json_err.to_string())
            })?,
        };
        Ok(doc.into())
    }

    /// Saves the configuration as pretty-printed JSON, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = self.to_json()?;
        std::fs::write(path, content)?;
        debug!("Configuration saved to {}", path.display());
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        let doc = ConfigDocument {
            output_dir: self.output_dir.clone(),
            template_dir: self.template_dir.clone(),
            default_namespace: self.default_namespace.clone(),
            template_files: self.template_files.clone(),
            replacements: self.rules.clone(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn template_files(&self) -> &[String] {
        &self.template_files
    }

    /// Replaces the template list. Entries are trimmed, empty entries dropped
    /// and duplicates removed keeping the first occurrence.
    pub fn set_template_files<I, S>(&mut self, files: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: IndexSet<String> = files
            .into_iter()
            .map(|f| f.as_ref().trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        self.template_files = unique.into_iter().collect();
    }

    /// Appends a template unless it is already listed.
    pub fn add_template(&mut self, filename: &str) {
        let filename = filename.trim();
        if !filename.is_empty() && !self.template_files.iter().any(|f| f == filename) {
            self.template_files.push(filename.to_string());
        }
    }

    pub fn remove_template(&mut self, filename: &str) {
        self.template_files.retain(|f| f != filename);
    }

    pub fn rules(&self) -> &[ReplacementRule] {
        &self.rules
    }

    /// Replaces the rule list, dropping rules whose type and value set
    /// duplicate an earlier rule.
    pub fn set_rules<I>(&mut self, rules: I)
    where
        I: IntoIterator<Item = ReplacementRule>,
    {
        let mut seen = HashSet::new();
        self.rules = rules.into_iter().filter(|rule| seen.insert(rule.dedup_key())).collect();
    }

    /// Enabled rules in configuration order.
    pub fn active_rules(&self) -> impl Iterator<Item = &ReplacementRule> {
        self.rules.iter().filter(|rule| rule.enabled)
    }

    /// First enabled rule for the given placeholder type.
    pub fn active_rule(&self, r#type: &str) -> Option<&ReplacementRule> {
        self.active_rules().find(|rule| rule.r#type == r#type)
    }

    pub fn output_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }

    pub fn template_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.template_dir)
    }

    /// Returns the problems that make the configuration unusable; empty when
    /// valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.default_namespace.ends_with(':') {
            problems.push(format!(
                "default namespace '{}' must end with ':'",
                self.default_namespace
            ));
        }
        problems
    }

    /// Returns suspicious settings that still allow a run: the affected
    /// templates are skipped or yield no files.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let template_dir = self.template_dir_path();
        if !template_dir.is_dir() {
            warnings.push(format!(
                "template directory '{}' does not exist",
                template_dir.display()
            ));
        }
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.r#type.trim().is_empty() {
                warnings.push(format!("rule #{} has an empty type", index + 1));
            } else if rule.enabled && rule.values.is_empty() {
                warnings.push(format!("rule '{}' has no values", rule.r#type));
            }
        }
        warnings
    }

    /// Like [`Config::validate`], but folds the problems into a single error.
    pub fn ensure_valid(&self) -> Result<()> {
        let problems = self.validate();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::ValidationError(problems.join("; ")))
        }
    }
}
