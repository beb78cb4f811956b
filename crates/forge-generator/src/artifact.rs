//! Generation output: one node tree per structural root.

use std::fmt;

use forge_scene::NodeTree;
use serde::{Deserialize, Serialize};

use crate::spec::Category;

/// Structural role of a top-level tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Collider-only navigation proxy.
    Nav,
    /// The main object.
    Object,
    /// Unshadowed distant variant.
    Skybox,
    /// Companion stump left behind after harvesting.
    Stump,
}

impl Role {
    /// Role name used in artifact names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Nav => "Nav",
            Self::Object => "Object",
            Self::Skybox => "Skybox",
            Self::Stump => "Stump",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One persisted template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Structural role.
    pub role: Role,
    /// The tree to persist.
    pub tree: NodeTree,
}

/// Every tree produced for one spec, in save order.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedTree {
    /// Category the trees were assembled for.
    pub category: Category,
    /// Top-level trees.
    pub artifacts: Vec<Artifact>,
}

impl GeneratedTree {
    /// Empty output for `category`.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            artifacts: Vec::new(),
        }
    }

    /// Append a top-level tree.
    pub fn push(&mut self, role: Role, tree: NodeTree) {
        self.artifacts.push(Artifact { role, tree });
    }

    /// The tree with the given role.
    pub fn get(&self, role: Role) -> Option<&NodeTree> {
        self.artifacts.iter().find(|a| a.role == role).map(|a| &a.tree)
    }

    /// Roles in save order.
    pub fn roles(&self) -> Vec<Role> {
        self.artifacts.iter().map(|a| a.role).collect()
    }

    /// `<Category>_<Role>`.
    pub fn artifact_name(&self, role: Role) -> String {
        format!("{}_{}", self.category.label(), role.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_scene::NodeBuilder;

    #[test]
    fn test_artifact_names_follow_category_role_convention() {
        let generated = GeneratedTree::new(Category::Resource);
        assert_eq!(generated.artifact_name(Role::Object), "Resource_Object");
        assert_eq!(generated.artifact_name(Role::Nav), "Resource_Nav");
    }

    #[test]
    fn test_push_keeps_order() {
        let mut generated = GeneratedTree::new(Category::Standard);
        generated.push(Role::Nav, NodeTree::new(NodeBuilder::new("Nav")));
        generated.push(Role::Object, NodeTree::new(NodeBuilder::new("Object")));
        assert_eq!(generated.roles(), vec![Role::Nav, Role::Object]);
        assert_eq!(generated.get(Role::Object).unwrap().root().name, "Object");
        assert!(generated.get(Role::Skybox).is_none());
    }
}
