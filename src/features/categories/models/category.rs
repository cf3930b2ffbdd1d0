use sqlx::FromRow;

/// Database model for a category
///
/// `parent_category_id = NULL` marks a root. `order_index` is the dense
/// 0-based position within the sibling group sharing the same parent.
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub parent_category_id: Option<i32>,
    pub order_index: i32,
}

/// Database model for a per-user expand/collapse preference
///
/// At most one row exists per (user_id, category_id) pair.
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct UserCategoryPreference {
    pub id: i32,
    pub user_id: i32,
    pub category_id: i32,
    pub is_expanded: bool,
}
