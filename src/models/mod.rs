pub mod ingredient;
pub mod lenient;
pub mod recipe;

pub use ingredient::{Ingredient, IngredientCatalog};
pub use recipe::{Difficulty, IngredientLine, Nutrition, Recipe};
