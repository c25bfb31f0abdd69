//! Defines the category store trait and its parameter types.

use crate::{
    Error,
    models::{Category, CategoryName, DatabaseID, TransactionType, UserID},
};

/// The data needed to create a user category.
#[derive(Clone, Debug)]
pub struct NewCategory {
    /// The user creating the category.
    pub user_id: UserID,
    /// The display name.
    pub name: CategoryName,
    /// Whether the category holds income or expenses.
    pub r#type: TransactionType,
    /// An optional icon name.
    pub icon: Option<String>,
    /// An optional display color.
    pub color: Option<String>,
}

/// The mutable fields of a category. `None` leaves a field unchanged.
///
/// A category's type and system flag are fixed at creation and deliberately
/// absent here.
#[derive(Clone, Debug, Default)]
pub struct CategoryPatch {
    /// A replacement display name.
    pub name: Option<CategoryName>,
    /// A replacement icon name.
    pub icon: Option<String>,
    /// A replacement display color.
    pub color: Option<String>,
}

/// Handles the creation, retrieval and ordering of categories.
pub trait CategoryStore {
    /// List the categories visible to `user_id`: every system category plus
    /// the user's own, optionally restricted to one type.
    ///
    /// Categories are returned in display order: system categories first,
    /// then by ascending sort order, with creation order breaking ties.
    fn list(
        &self,
        user_id: UserID,
        type_filter: Option<TransactionType>,
    ) -> Result<Vec<Category>, Error>;

    /// Create a category owned by a user.
    ///
    /// The new category is placed at the end of its type partition: its sort
    /// order is one greater than the maximum over the categories of that type
    /// visible to the user (system categories included), or zero when no such
    /// category exists.
    fn create(&mut self, new_category: NewCategory) -> Result<Category, Error>;

    /// Update the name, icon or color of a category owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the category does not exist or belongs to
    /// another user, and [Error::SystemCategoryImmutable] for system
    /// categories.
    fn update(
        &mut self,
        user_id: UserID,
        category_id: DatabaseID,
        patch: CategoryPatch,
    ) -> Result<Category, Error>;

    /// Delete a category owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the category does not exist or belongs to
    /// another user, [Error::SystemCategoryImmutable] for system categories
    /// and [Error::CategoryInUse] if transactions still reference it.
    fn delete(&mut self, user_id: UserID, category_id: DatabaseID) -> Result<(), Error>;

    /// Reassign sort orders from an ordered list of category ids: the id at
    /// position `index` receives sort order `index + 1`.
    ///
    /// The whole batch is applied atomically. If any id does not exist or is
    /// not visible to `user_id` (neither system nor owned), nothing is
    /// written and [Error::ReorderDenied] is returned. Categories not listed
    /// keep their current sort order, even where that collides with the
    /// reassigned values.
    fn reorder(&mut self, user_id: UserID, ordered_ids: &[DatabaseID]) -> Result<(), Error>;

    /// Whether a category with the given id exists, regardless of owner.
    fn exists(&self, category_id: DatabaseID) -> Result<bool, Error>;
}
