//! Language table for the editor and Judge0 submission
//!
//! Built once at startup and shared read-only; nothing mutates it afterwards.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// A language selectable in the editor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageConfig {
    /// Judge0 `language_id` (e.g., "54")
    pub id: String,
    /// Display name (e.g., "C++ (GCC 9.2.0)")
    pub name: String,
    /// Editor syntax mode (e.g., "cpp")
    pub mode: String,
    /// Starter code shown for a fresh editor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip)]
    order: i64,
}

/// Raw TOML configuration for a language
#[derive(Debug, Deserialize)]
struct RawLanguageConfig {
    name: String,
    mode: String,
    #[serde(default)]
    order: i64,
    template: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawLanguageTable {
    default: String,
    languages: BTreeMap<String, RawLanguageConfig>,
}

/// Immutable set of supported languages
#[derive(Debug, Clone)]
pub struct LanguageTable {
    default_id: String,
    /// Sorted by display order
    languages: Vec<LanguageConfig>,
    /// Lowercased id/alias -> index into `languages`
    lookup: HashMap<String, usize>,
}

impl LanguageTable {
    /// Table shipped with the binary
    pub fn embedded() -> anyhow::Result<Self> {
        let content = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/files/languages.toml"));
        Self::from_toml_str(content).context("Invalid embedded language table")
    }

    /// Load a table from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read language table {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid language table {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let raw: RawLanguageTable = toml::from_str(content)?;

        let mut languages: Vec<(LanguageConfig, Vec<String>)> = raw
            .languages
            .into_iter()
            .map(|(id, raw)| {
                let config = LanguageConfig {
                    id,
                    name: raw.name,
                    mode: raw.mode,
                    template: raw.template,
                    order: raw.order,
                };
                (config, raw.aliases)
            })
            .collect();
        languages.sort_by(|(a, _), (b, _)| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

        let mut lookup = HashMap::new();
        for (idx, (config, aliases)) in languages.iter().enumerate() {
            for key in std::iter::once(&config.id).chain(aliases.iter()) {
                if lookup.insert(key.to_lowercase(), idx).is_some() {
                    anyhow::bail!("Duplicate language id or alias: {}", key);
                }
            }
        }

        let default_id = raw.default;
        match lookup.get(&default_id.to_lowercase()) {
            Some(&idx) if languages[idx].0.id == default_id => {}
            _ => anyhow::bail!("Default language {} is not a language id", default_id),
        }

        Ok(Self {
            default_id,
            languages: languages.into_iter().map(|(config, _)| config).collect(),
            lookup,
        })
    }

    /// Resolve by Judge0 id or alias (case-insensitive)
    pub fn get(&self, key: &str) -> Option<&LanguageConfig> {
        self.lookup
            .get(&key.trim().to_lowercase())
            .map(|&idx| &self.languages[idx])
    }

    pub fn default_language(&self) -> &LanguageConfig {
        // Checked at construction
        self.get(&self.default_id)
            .unwrap_or_else(|| &self.languages[0])
    }

    /// All languages in display order
    pub fn list(&self) -> &[LanguageConfig] {
        &self.languages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
default = "50"

[languages.71]
name = "Python (3.8.1)"
mode = "python"
order = 2
aliases = ["py", "python3"]

[languages.50]
name = "C (GCC 9.2.0)"
mode = "c"
order = 1
template = "int main() {{ return 0; }}"
"#
        )
        .unwrap();
        file
    }

    #[test]
    fn test_load_languages() {
        let config_file = create_test_config();
        let table = LanguageTable::load(config_file.path()).unwrap();

        let ids: Vec<&str> = table.list().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["50", "71"]);
        assert_eq!(table.default_language().id, "50");
        assert_eq!(
            table.get("50").unwrap().template.as_deref(),
            Some("int main() { return 0; }")
        );
    }

    #[test]
    fn test_lookup_by_alias() {
        let config_file = create_test_config();
        let table = LanguageTable::load(config_file.path()).unwrap();

        assert_eq!(table.get("PY").unwrap().id, "71");
        assert_eq!(table.get("python3").unwrap().id, "71");
        assert!(table.get("ruby").is_none());
    }

    #[test]
    fn test_embedded_table() {
        let table = LanguageTable::embedded().unwrap();

        let ids: Vec<&str> = table.list().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["54", "50", "62", "71", "63"]);
        assert_eq!(table.default_language().name, "C++ (GCC 9.2.0)");
        assert_eq!(table.get("cpp").unwrap().id, "54");
    }

    #[test]
    fn test_embedded_editor_modes() {
        let table = LanguageTable::embedded().unwrap();
        let modes: Vec<&str> = table.list().iter().map(|l| l.mode.as_str()).collect();
        assert_eq!(modes, vec!["cpp", "c", "java", "python", "javascript"]);
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let content = r#"
default = "1"
[languages.1]
name = "A"
mode = "a"
aliases = ["x"]
[languages.2]
name = "B"
mode = "b"
aliases = ["X"]
"#;
        let err = LanguageTable::from_toml_str(content).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_unknown_default_rejected() {
        let content = r#"
default = "9"
[languages.1]
name = "A"
mode = "a"
"#;
        assert!(LanguageTable::from_toml_str(content).is_err());
    }

    #[test]
    fn test_default_must_be_an_id_not_alias() {
        let content = r#"
default = "a"
[languages.1]
name = "A"
mode = "a"
aliases = ["a"]
"#;
        assert!(LanguageTable::from_toml_str(content).is_err());
    }
}
