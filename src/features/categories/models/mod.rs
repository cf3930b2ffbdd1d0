mod category;

pub use category::{Category, UserCategoryPreference};
