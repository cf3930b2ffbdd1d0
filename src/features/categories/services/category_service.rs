use std::collections::{HashMap, HashSet};

use sqlx::{PgPool, Postgres, Transaction};

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryResponseDto, CategoryTreeDto, CreateCategoryDto,
};
use crate::features::categories::models::{Category, UserCategoryPreference};

/// Dense order indices for a sibling group after inserting `moved_id` at
/// `position`.
///
/// `siblings` is the target group WITHOUT the moved category, ordered by
/// current order index. Inserting at `siblings.len()` appends; anything
/// beyond that is rejected rather than clamped.
fn insert_and_reindex(siblings: &[i32], moved_id: i32, position: usize) -> Result<Vec<(i32, i32)>> {
    if position > siblings.len() {
        return Err(AppError::OutOfRange(format!(
            "Position {} is out of range; the target group has {} categories",
            position,
            siblings.len()
        )));
    }

    let mut ordered = siblings.to_vec();
    ordered.insert(position, moved_id);

    Ok(ordered
        .into_iter()
        .enumerate()
        .map(|(index, id)| (id, index as i32))
        .collect())
}

/// True when attaching `category_id` under `new_parent_id` would create a
/// cycle, i.e. the new parent is the category itself or lies in its subtree.
///
/// `parents` maps every category id to its parent id. The walk refuses to
/// loop forever if the stored data already contains a cycle.
fn creates_cycle(
    parents: &HashMap<i32, Option<i32>>,
    category_id: i32,
    new_parent_id: i32,
) -> bool {
    let mut current = Some(new_parent_id);
    let mut seen = HashSet::new();

    while let Some(id) = current {
        if id == category_id {
            return true;
        }
        if !seen.insert(id) {
            return true;
        }
        current = parents.get(&id).copied().flatten();
    }

    false
}

/// Service for category tree operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all categories (flat)
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, parent_category_id, order_index
            FROM categories
            ORDER BY parent_category_id NULLS FIRST, order_index
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get category by id
    pub async fn get(&self, id: i32) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, parent_category_id, order_index
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category: {:?}", e);
            AppError::Database(e)
        })?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Build the category tree for one user, with that user's
    /// expand/collapse preferences merged onto the nodes.
    ///
    /// Loads the complete category snapshot; fine for the hundreds of
    /// categories this catalog carries, not meant for very large trees.
    pub async fn tree_for_user(&self, user_id: i32) -> Result<Vec<CategoryTreeDto>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, parent_category_id, order_index
            FROM categories
            ORDER BY order_index
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load categories for tree: {:?}", e);
            AppError::Database(e)
        })?;

        let preferences = self.get_display_preferences(user_id).await?;

        Ok(CategoryTreeDto::build_tree(categories, &preferences))
    }

    /// Create a category appended at the end of its sibling group
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let mut tx = self.pool.begin().await?;

        if let Some(parent_id) = dto.parent_category_id {
            self.lock_category(&mut tx, parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent category not found".to_string()))?;
        }

        // New categories always append; the group size is the next free index.
        let siblings = Self::lock_sibling_group(&mut tx, dto.parent_category_id, None).await?;
        let order_index = siblings.len() as i32;

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, parent_category_id, order_index)
            VALUES ($1, $2, $3)
            RETURNING id, name, parent_category_id, order_index
            "#,
        )
        .bind(&dto.name)
        .bind(dto.parent_category_id)
        .bind(order_index)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create category: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await?;

        tracing::info!(
            "Category created: id={}, parent={:?}, order_index={}",
            category.id,
            category.parent_category_id,
            category.order_index
        );

        Ok(category.into())
    }

    /// Rename a category (name only)
    pub async fn rename(&self, id: i32, new_name: &str) -> Result<CategoryResponseDto> {
        let name = new_name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Category name must not be empty".to_string(),
            ));
        }

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2
            WHERE id = $1
            RETURNING id, name, parent_category_id, order_index
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to rename category: {:?}", e);
            AppError::Database(e)
        })?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Delete a category, gated on it being empty.
    ///
    /// The remaining siblings are reindexed in the same transaction so their
    /// order indices stay a dense 0..k-1 run. Preference rows cascade at the
    /// storage layer.
    pub async fn delete(&self, id: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let category = self
            .lock_category(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;

        let (subcategories, artifacts) = Self::direct_contents(&mut tx, id).await?;
        if subcategories > 0 || artifacts > 0 {
            return Err(AppError::BadRequest(
                "Cannot delete non-empty category.".to_string(),
            ));
        }

        let siblings =
            Self::lock_sibling_group(&mut tx, category.parent_category_id, Some(id)).await?;

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::apply_order_indices(
            &mut tx,
            siblings
                .iter()
                .enumerate()
                .map(|(index, &sibling)| (sibling, index as i32)),
        )
        .await?;

        tx.commit().await?;

        tracing::info!("Category deleted: id={}", id);

        Ok(())
    }

    /// True iff the category exists and has zero direct subcategories and
    /// zero directly attached artifacts. Recursive contents are not
    /// considered; a nonexistent category reports `false` by convention.
    pub async fn is_category_empty(&self, id: i32) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if !exists {
            return Ok(false);
        }

        let (subcategories, artifacts) = Self::direct_contents(&mut tx, id).await?;

        Ok(subcategories == 0 && artifacts == 0)
    }

    /// Move a category to a new parent and/or position among its siblings.
    ///
    /// Validates the target, refuses moves that would create a cycle, then
    /// reassigns the parent and rewrites the order index of every member of
    /// the target group (and of the old group when the parent changed) so
    /// both stay dense. Everything commits as one transaction; the affected
    /// rows are locked so concurrent rearranges of the same groups serialize
    /// instead of losing updates.
    pub async fn rearrange(
        &self,
        category_id: i32,
        new_parent_id: Option<i32>,
        new_position: i32,
    ) -> Result<()> {
        if new_position < 0 {
            return Err(AppError::OutOfRange(
                "Position must be non-negative".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let category = self
            .lock_category(&mut tx, category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        if let Some(parent_id) = new_parent_id {
            if parent_id == category_id {
                return Err(AppError::CycleDetected(
                    "A category cannot become its own parent".to_string(),
                ));
            }

            self.lock_category(&mut tx, parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent category not found".to_string()))?;

            // Fresh parent snapshot within the transaction for the cycle walk.
            let rows = sqlx::query_as::<_, (i32, Option<i32>)>(
                "SELECT id, parent_category_id FROM categories",
            )
            .fetch_all(&mut *tx)
            .await?;
            let parents: HashMap<i32, Option<i32>> = rows.into_iter().collect();

            if creates_cycle(&parents, category_id, parent_id) {
                return Err(AppError::CycleDetected(
                    "Cannot move a category into its own subtree".to_string(),
                ));
            }
        }

        let old_parent_id = category.parent_category_id;
        let parent_changed = old_parent_id != new_parent_id;

        let target_siblings =
            Self::lock_sibling_group(&mut tx, new_parent_id, Some(category_id)).await?;
        let plan = insert_and_reindex(&target_siblings, category_id, new_position as usize)?;

        if parent_changed {
            sqlx::query("UPDATE categories SET parent_category_id = $2 WHERE id = $1")
                .bind(category_id)
                .bind(new_parent_id)
                .execute(&mut *tx)
                .await?;
        }

        Self::apply_order_indices(&mut tx, plan.iter().copied()).await?;

        // When the category left its old group, close the gap there too so
        // the dense-index invariant holds for both groups.
        if parent_changed {
            let old_siblings =
                Self::lock_sibling_group(&mut tx, old_parent_id, Some(category_id)).await?;
            Self::apply_order_indices(
                &mut tx,
                old_siblings
                    .iter()
                    .enumerate()
                    .map(|(index, &sibling)| (sibling, index as i32)),
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Category rearranged: id={}, new_parent={:?}, new_position={}",
            category_id,
            new_parent_id,
            new_position
        );

        Ok(())
    }

    /// Upsert the caller's expand/collapse preference for a category.
    ///
    /// The (user, category) pair is unique at the storage layer, so the
    /// operation can never produce a second row for the same pair.
    pub async fn set_display_preference(
        &self,
        category_id: i32,
        user_id: i32,
        is_expanded: bool,
    ) -> Result<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        if !exists {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                category_id
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO user_category_preferences (user_id, category_id, is_expanded)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, category_id)
            DO UPDATE SET is_expanded = EXCLUDED.is_expanded
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .bind(is_expanded)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save display preference: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::debug!(
            "Display preference saved: user={}, category={}, expanded={}",
            user_id,
            category_id,
            is_expanded
        );

        Ok(())
    }

    /// Full expand/collapse map for one user in a single query.
    ///
    /// Categories without a stored row are simply absent from the map; the
    /// tree layer treats that as collapsed.
    pub async fn get_display_preferences(&self, user_id: i32) -> Result<HashMap<i32, bool>> {
        let rows = sqlx::query_as::<_, UserCategoryPreference>(
            r#"
            SELECT id, user_id, category_id, is_expanded
            FROM user_category_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load display preferences: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows
            .into_iter()
            .map(|row| (row.category_id, row.is_expanded))
            .collect())
    }

    /// Lock and load one category row for the rest of the transaction.
    async fn lock_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, parent_category_id, order_index
            FROM categories
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(category)
    }

    /// Lock the rows of one sibling group and return its member ids ordered
    /// by current order index, optionally excluding one category.
    async fn lock_sibling_group(
        tx: &mut Transaction<'_, Postgres>,
        parent_id: Option<i32>,
        exclude: Option<i32>,
    ) -> Result<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT id
            FROM categories
            WHERE parent_category_id IS NOT DISTINCT FROM $1
              AND ($2::INTEGER IS NULL OR id <> $2)
            ORDER BY order_index
            FOR UPDATE
            "#,
        )
        .bind(parent_id)
        .bind(exclude)
        .fetch_all(&mut **tx)
        .await?;

        Ok(ids)
    }

    /// Write the given (id, order_index) assignments.
    async fn apply_order_indices(
        tx: &mut Transaction<'_, Postgres>,
        assignments: impl Iterator<Item = (i32, i32)>,
    ) -> Result<()> {
        for (id, order_index) in assignments {
            sqlx::query("UPDATE categories SET order_index = $2 WHERE id = $1")
                .bind(id)
                .bind(order_index)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    /// Direct (non-recursive) contents of a category: subcategory count and
    /// attached artifact count.
    async fn direct_contents(
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> Result<(i64, i64)> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM categories WHERE parent_category_id = $1),
                (SELECT COUNT(*) FROM artifacts WHERE category_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_reindex_at_front() {
        // Moving category 3 to the front of a group holding only 5.
        let plan = insert_and_reindex(&[5], 3, 0).expect("position is valid");
        assert_eq!(plan, vec![(3, 0), (5, 1)]);
    }

    #[test]
    fn test_insert_and_reindex_appends_at_group_size() {
        let plan = insert_and_reindex(&[7, 8], 9, 2).expect("appending is valid");
        assert_eq!(plan, vec![(7, 0), (8, 1), (9, 2)]);
    }

    #[test]
    fn test_insert_and_reindex_rejects_out_of_range() {
        let err = insert_and_reindex(&[7, 8], 9, 3).unwrap_err();
        assert!(matches!(err, AppError::OutOfRange(_)));
    }

    #[test]
    fn test_insert_and_reindex_into_empty_group() {
        let plan = insert_and_reindex(&[], 4, 0).expect("empty group accepts position 0");
        assert_eq!(plan, vec![(4, 0)]);

        let err = insert_and_reindex(&[], 4, 1).unwrap_err();
        assert!(matches!(err, AppError::OutOfRange(_)));
    }

    #[test]
    fn test_insert_and_reindex_indices_are_dense() {
        let plan = insert_and_reindex(&[10, 11, 12, 13], 20, 2).unwrap();

        let mut indices: Vec<i32> = plan.iter().map(|&(_, index)| index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(plan[2], (20, 2));
    }

    #[test]
    fn test_insert_and_reindex_is_idempotent_for_no_op() {
        // Category 8 currently sits at position 1 of [7, 8, 9]; moving it to
        // position 1 again must reproduce the existing ordering.
        let without_moved = [7, 9];
        let first = insert_and_reindex(&without_moved, 8, 1).unwrap();
        let second = insert_and_reindex(&without_moved, 8, 1).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec![(7, 0), (8, 1), (9, 2)]);
    }

    fn parent_map(edges: &[(i32, Option<i32>)]) -> HashMap<i32, Option<i32>> {
        edges.iter().copied().collect()
    }

    #[test]
    fn test_creates_cycle_self_parent() {
        let parents = parent_map(&[(1, None)]);
        assert!(creates_cycle(&parents, 1, 1));
    }

    #[test]
    fn test_creates_cycle_direct_child() {
        // 2 is a child of 1; moving 1 under 2 closes a loop.
        let parents = parent_map(&[(1, None), (2, Some(1))]);
        assert!(creates_cycle(&parents, 1, 2));
    }

    #[test]
    fn test_creates_cycle_deep_descendant() {
        // 1 -> 2 -> 3 -> 4; moving 1 under 4 closes a loop.
        let parents = parent_map(&[(1, None), (2, Some(1)), (3, Some(2)), (4, Some(3))]);
        assert!(creates_cycle(&parents, 1, 4));
    }

    #[test]
    fn test_creates_cycle_allows_unrelated_parent() {
        let parents = parent_map(&[(1, None), (2, Some(1)), (3, None), (4, Some(3))]);
        assert!(!creates_cycle(&parents, 2, 4));
        assert!(!creates_cycle(&parents, 2, 3));
    }

    #[test]
    fn test_creates_cycle_allows_move_to_own_ancestor() {
        // Moving a leaf up to its grandparent is legal.
        let parents = parent_map(&[(1, None), (2, Some(1)), (3, Some(2))]);
        assert!(!creates_cycle(&parents, 3, 1));
    }

    #[test]
    fn test_creates_cycle_terminates_on_corrupt_data() {
        // 5 and 6 already point at each other; the walk must not hang.
        let parents = parent_map(&[(5, Some(6)), (6, Some(5))]);
        assert!(creates_cycle(&parents, 7, 5));
    }
}
