use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::Category;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: i32,
    pub name: String,
    pub parent_category_id: Option<i32>,
    pub order_index: i32,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            parent_category_id: c.parent_category_id,
            order_index: c.order_index,
        }
    }
}

/// Request DTO for creating a category
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 100, message = "Category name must be 1-100 characters"))]
    pub name: String,

    pub parent_category_id: Option<i32>,
}

/// Request DTO for the rearrange operation (reparent + reposition)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RearrangeCategoryDto {
    pub category_id: i32,
    pub new_parent_id: Option<i32>,
    pub new_position: i32,
}

/// Response DTO for category tree (hierarchical structure)
///
/// `is_expanded` carries the caller's display preference; categories without
/// a stored preference render collapsed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: i32,
    pub name: String,
    pub parent_category_id: Option<i32>,
    pub order_index: i32,
    pub is_expanded: bool,
    pub subcategories: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build the tree from a flat snapshot of categories, merging the given
    /// per-user expand/collapse map onto each node.
    ///
    /// Children are attached through an explicitly constructed adjacency map
    /// (id -> child rows) rather than per-node scans, and every sibling list
    /// is ordered by `order_index`. Rows whose parent id does not resolve to
    /// any row in the snapshot are orphans and are left out of the result
    /// entirely (they are not promoted to roots).
    pub fn build_tree(
        categories: Vec<Category>,
        preferences: &HashMap<i32, bool>,
    ) -> Vec<CategoryTreeDto> {
        let known: std::collections::HashSet<i32> = categories.iter().map(|c| c.id).collect();

        let mut roots: Vec<&Category> = Vec::new();
        let mut children: HashMap<i32, Vec<&Category>> = HashMap::new();

        for category in &categories {
            match category.parent_category_id {
                None => roots.push(category),
                Some(parent_id) if known.contains(&parent_id) => {
                    children.entry(parent_id).or_default().push(category);
                }
                Some(_) => {} // orphan: parent is not part of the snapshot
            }
        }

        roots.sort_by_key(|c| (c.order_index, c.id));
        for siblings in children.values_mut() {
            siblings.sort_by_key(|c| (c.order_index, c.id));
        }

        roots
            .into_iter()
            .map(|root| Self::build_node(root, &children, preferences))
            .collect()
    }

    fn build_node(
        category: &Category,
        children: &HashMap<i32, Vec<&Category>>,
        preferences: &HashMap<i32, bool>,
    ) -> CategoryTreeDto {
        let subcategories = children
            .get(&category.id)
            .map(|kids| {
                kids.iter()
                    .map(|child| Self::build_node(child, children, preferences))
                    .collect()
            })
            .unwrap_or_default();

        CategoryTreeDto {
            id: category.id,
            name: category.name.clone(),
            parent_category_id: category.parent_category_id,
            order_index: category.order_index,
            is_expanded: preferences.get(&category.id).copied().unwrap_or(false),
            subcategories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i32, name: &str, parent: Option<i32>, order_index: i32) -> Category {
        Category {
            id,
            name: name.to_string(),
            parent_category_id: parent,
            order_index,
        }
    }

    /// Two roots, two children under the first, one under the second.
    fn sample_categories() -> Vec<Category> {
        vec![
            category(1, "Root Category 1", None, 0),
            category(2, "Root Category 2", None, 1),
            category(3, "Subcategory 1.1", Some(1), 0),
            category(4, "Subcategory 1.2", Some(1), 1),
            category(5, "Subcategory 2.1", Some(2), 0),
        ]
    }

    #[test]
    fn test_build_tree_roots_in_order() {
        let tree = CategoryTreeDto::build_tree(sample_categories(), &HashMap::new());

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, 1);
        assert_eq!(tree[1].id, 2);
        assert_eq!(tree[0].subcategories.len(), 2);
        assert_eq!(tree[0].subcategories[0].id, 3);
        assert_eq!(tree[0].subcategories[1].id, 4);
        assert_eq!(tree[1].subcategories.len(), 1);
        assert_eq!(tree[1].subcategories[0].id, 5);
    }

    #[test]
    fn test_build_tree_orders_by_order_index_not_input_order() {
        // Same forest, rows shuffled and order indices reversed.
        let categories = vec![
            category(4, "B", Some(1), 0),
            category(2, "Root B", None, 0),
            category(1, "Root A", None, 1),
            category(3, "A", Some(1), 1),
        ];

        let tree = CategoryTreeDto::build_tree(categories, &HashMap::new());

        assert_eq!(tree[0].id, 2);
        assert_eq!(tree[1].id, 1);
        assert_eq!(tree[1].subcategories[0].id, 4);
        assert_eq!(tree[1].subcategories[1].id, 3);
    }

    #[test]
    fn test_build_tree_excludes_orphans() {
        let mut categories = sample_categories();
        // Parent 99 is not part of the snapshot.
        categories.push(category(6, "Orphan", Some(99), 0));

        let tree = CategoryTreeDto::build_tree(categories, &HashMap::new());

        let mut ids = Vec::new();
        fn collect(nodes: &[CategoryTreeDto], ids: &mut Vec<i32>) {
            for node in nodes {
                ids.push(node.id);
                collect(&node.subcategories, ids);
            }
        }
        collect(&tree, &mut ids);

        assert!(!ids.contains(&6), "orphan must not surface anywhere");
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_build_tree_merges_preferences() {
        let mut preferences = HashMap::new();
        preferences.insert(1, true);
        preferences.insert(2, false);

        let tree = CategoryTreeDto::build_tree(sample_categories(), &preferences);

        assert!(tree[0].is_expanded);
        assert!(!tree[1].is_expanded);
        // No stored row renders the same as a stored `false`.
        assert!(!tree[0].subcategories[0].is_expanded);
        assert!(!tree[1].subcategories[0].is_expanded);
    }

    #[test]
    fn test_build_tree_empty_input() {
        let tree = CategoryTreeDto::build_tree(Vec::new(), &HashMap::new());
        assert!(tree.is_empty());
    }
}
