use serde::{Deserialize, Serialize};

/// User options controlling how a hierarchy is presented.
///
/// Loaded from the `[view]` table of a configuration file or assembled from
/// command-line flags; every field defaults to "show everything as is".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Case-insensitive text matched against node name, kind, and id.
    pub filter: Option<String>,
    /// Hide nodes that are neither visible nor have a visible descendant.
    pub only_visible: bool,
    /// Replace the hierarchy with a single list under the root.
    pub flat: bool,
    /// Show short names where the decoder provided them.
    pub simplify_names: bool,
    /// Ids collected into the pinned list.
    pub pinned_ids: Vec<String>,
}

impl ViewOptions {
    /// Returns `true` if `text` passes the filter (always, when unset).
    pub fn filter_matches(&self, text: &[&str]) -> bool {
        match self.filter.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                text.iter().any(|t| t.to_lowercase().contains(&needle))
            }
        }
    }

    /// Returns `true` if the id is pinned.
    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned_ids.iter().any(|p| p == id)
    }
}
