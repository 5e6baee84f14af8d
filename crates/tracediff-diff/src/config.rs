use serde::{Deserialize, Serialize};

/// Configuration for the property tree builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Name given to the root node of every built tree.
    pub root_name: String,
    /// Maximum nesting depth accepted before the build fails.
    pub max_depth: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            root_name: "root".into(),
            max_depth: 512,
        }
    }
}

impl BuilderConfig {
    /// The default configuration with a different root name.
    pub fn named(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            ..Default::default()
        }
    }
}
