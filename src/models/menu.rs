use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuItem {
    pub id: String,
    pub parent_id: Option<String>,
    pub label: Option<String>,
    pub url: Option<String>,
    pub path: Option<String>,
    pub target: Option<String>,
    #[serde(skip_deserializing)]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    /// Prefer the site-relative path so links stay on this frontend.
    pub fn href(&self) -> &str {
        self.path
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or("#")
    }

    pub fn label_or_default(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }

    pub fn opens_new_tab(&self) -> bool {
        self.target.as_deref() == Some("_blank")
    }

    /// Nests a flat `menuItems` list under each item's parent.
    ///
    /// Order within every level follows the CMS order. Items whose parent is
    /// missing from the list are kept at the root.
    pub fn build_tree(flat: Vec<MenuItem>) -> Vec<MenuItem> {
        let ids: std::collections::HashSet<String> =
            flat.iter().map(|item| item.id.clone()).collect();

        let (roots, nested): (Vec<_>, Vec<_>) =
            flat.into_iter().partition(|item| {
                item.parent_id
                    .as_ref()
                    .map_or(true, |parent| !ids.contains(parent))
            });

        fn attach(mut item: MenuItem, pool: &[MenuItem]) -> MenuItem {
            item.children = pool
                .iter()
                .filter(|child| {
                    child.parent_id.as_deref() == Some(item.id.as_str())
                })
                .cloned()
                .map(|child| attach(child, pool))
                .collect();
            item
        }

        roots.into_iter().map(|root| attach(root, &nested)).collect()
    }
}
