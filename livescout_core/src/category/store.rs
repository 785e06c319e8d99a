//! Category rule storage.
//!
//! User rules live in YAML at `~/.config/livescout/categories.yaml`, keyed by
//! rule id. A user rule with the same id as a built-in replaces it.

use super::{builtin_rules, CategoryRule};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    /// Create a rule store at the default location.
    pub fn new_default() -> Self {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        let path = base.join("livescout").join("categories.yaml");
        Self { path }
    }

    /// Create a rule store at a custom path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load all user-defined rules. A missing file is an empty set; an
    /// unreadable one is logged and treated as empty.
    pub fn load_all(&self) -> HashMap<String, CategoryRule> {
        match self.try_load_all() {
            Ok(rules) => rules,
            Err(e) => {
                warn!(
                    target: "livescout.config",
                    path = %self.path.display(),
                    error = %e,
                    "ignoring unreadable category rules file"
                );
                HashMap::new()
            }
        }
    }

    /// Load all user-defined rules, reporting parse errors.
    pub fn try_load_all(&self) -> Result<HashMap<String, CategoryRule>, RuleStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(RuleStoreError::Io(e.to_string())),
        };
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        let mut rules: HashMap<String, CategoryRule> = serde_yaml::from_str(&content)
            .map_err(|e| RuleStoreError::Serialize(e.to_string()))?;
        // The map key is authoritative for the id.
        for (id, rule) in rules.iter_mut() {
            if rule.id != *id {
                rule.id = id.clone();
            }
        }
        Ok(rules)
    }

    /// Look up one rule. User rules shadow built-ins.
    pub fn load(&self, id: &str) -> Option<CategoryRule> {
        if let Some(rule) = self.load_all().remove(id) {
            return Some(rule);
        }
        builtin_rules().iter().find(|r| r.id == id).cloned()
    }

    pub fn save(&self, rule: &CategoryRule) -> Result<(), RuleStoreError> {
        let mut rules = self.try_load_all()?;
        rules.insert(rule.id.clone(), rule.clone());
        self.write_all(&rules)
    }

    /// Delete a user rule. Returns `Ok(false)` if it did not exist.
    /// Built-in rules cannot be deleted, only overridden (e.g. disabled).
    pub fn delete(&self, id: &str) -> Result<bool, RuleStoreError> {
        let mut rules = self.try_load_all()?;
        let existed = rules.remove(id).is_some();
        if existed {
            self.write_all(&rules)?;
        }
        Ok(existed)
    }

    /// Effective rules: built-ins (possibly overridden) in their shipped order,
    /// then user-only rules sorted by descending priority, then id.
    pub fn list_all(&self) -> Vec<CategoryRule> {
        Self::merge(self.load_all())
    }

    /// Like [`list_all`](Self::list_all), failing on a malformed file.
    pub fn try_list_all(&self) -> Result<Vec<CategoryRule>, RuleStoreError> {
        Ok(Self::merge(self.try_load_all()?))
    }

    fn merge(mut user: HashMap<String, CategoryRule>) -> Vec<CategoryRule> {
        let mut rules: Vec<CategoryRule> = builtin_rules()
            .iter()
            .map(|builtin| user.remove(&builtin.id).unwrap_or_else(|| builtin.clone()))
            .collect();

        let mut extra: Vec<CategoryRule> = user.into_values().collect();
        extra.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));
        rules.extend(extra);
        rules
    }

    fn write_all(&self, rules: &HashMap<String, CategoryRule>) -> Result<(), RuleStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RuleStoreError::Io(e.to_string()))?;
        }

        let content = serde_yaml::to_string(rules)
            .map_err(|e| RuleStoreError::Serialize(e.to_string()))?;

        std::fs::write(&self.path, content).map_err(|e| RuleStoreError::Io(e.to_string()))?;

        Ok(())
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new_default()
    }
}

/// Errors from rule storage operations.
#[derive(Debug, thiserror::Error)]
pub enum RuleStoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::DEFAULT_CATEGORY_ID;

    fn temp_store() -> (tempfile::TempDir, RuleStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("livescout").join("categories.yaml"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_yields_builtins() {
        let (_dir, store) = temp_store();
        assert!(store.try_load_all().unwrap().is_empty());
        assert_eq!(store.list_all().len(), builtin_rules().len());
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, store) = temp_store();
        let rule = CategoryRule::new("asmr", "ASMR", vec!["asmr".into()], 7);
        store.save(&rule).unwrap();

        assert_eq!(store.load("asmr"), Some(rule));
        let all = store.list_all();
        assert_eq!(all.len(), builtin_rules().len() + 1);
        assert_eq!(all.last().unwrap().id, "asmr");
    }

    #[test]
    fn test_user_rule_overrides_builtin() {
        let (_dir, store) = temp_store();
        let mut rule = store.load(DEFAULT_CATEGORY_ID).unwrap();
        rule.enabled = false;
        store.save(&rule).unwrap();

        let all = store.list_all();
        assert_eq!(all.len(), builtin_rules().len());
        let overridden = all.iter().find(|r| r.id == DEFAULT_CATEGORY_ID).unwrap();
        assert!(!overridden.enabled);
        // Still in its shipped position.
        assert_eq!(all[0].id, DEFAULT_CATEGORY_ID);
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = temp_store();
        store
            .save(&CategoryRule::new("tmp", "Tmp", vec!["x".into()], 1))
            .unwrap();
        assert!(store.delete("tmp").unwrap());
        assert!(!store.delete("tmp").unwrap());
        assert!(store.load("tmp").is_none());
    }

    #[test]
    fn test_yaml_defaults_and_key_as_id() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            "sports:\n  id: ignored\n  name: 스포츠\n  include: [\"축구\", \"야구\"]\n",
        )
        .unwrap();

        let rule = store.load("sports").unwrap();
        assert_eq!(rule.id, "sports");
        assert_eq!(rule.priority, 10);
        assert!(rule.enabled);
        assert!(rule.exclude.is_empty());
    }

    #[test]
    fn test_malformed_file() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "this: [is: not: valid").unwrap();

        assert!(matches!(
            store.try_load_all(),
            Err(RuleStoreError::Serialize(_))
        ));
        // Lenient path falls back to built-ins.
        assert_eq!(store.list_all().len(), builtin_rules().len());
    }
}
