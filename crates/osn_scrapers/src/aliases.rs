use std::collections::HashMap;

/// Hard-coded names that do not resolve on their own.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("deepseek r1", "deepseek-ai/deepseek-coder"),
    ("ollama", "ollama/ollama"),
];

/// Case-insensitive map from free-text project names to `owner/repo`.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    pub fn builtin() -> Self {
        Self::with_overrides(std::iter::empty::<(String, String)>())
    }

    /// Built-in aliases plus `overrides`, which win on conflict.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut entries: HashMap<String, String> = BUILTIN_ALIASES
            .iter()
            .map(|(name, repo)| (name.to_string(), repo.to_string()))
            .collect();
        for (name, repo) in overrides {
            entries.insert(name.as_ref().trim().to_lowercase(), repo.into());
        }
        Self { entries }
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.trim().to_lowercase()).map(String::as_str)
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}
