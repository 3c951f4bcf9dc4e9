use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Read-only ingredient list fetched once at start-up.
///
/// Keeps the backend order and an id index for name resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientCatalog {
    ingredients: Vec<Ingredient>,
    by_id: HashMap<String, usize>,
}

impl IngredientCatalog {
    #[must_use]
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        let by_id = ingredients
            .iter()
            .enumerate()
            .map(|(index, ingredient)| (ingredient.id.clone(), index))
            .collect();

        Self { ingredients, by_id }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Ingredient> {
        self.by_id.get(id).map(|&index| &self.ingredients[index])
    }

    /// Display name for `id`, if the id is known and the name is non-empty.
    #[must_use]
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.get(id)
            .map(|i| i.name.as_str())
            .filter(|name| !name.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

impl From<Vec<Ingredient>> for IngredientCatalog {
    fn from(ingredients: Vec<Ingredient>) -> Self {
        Self::new(ingredients)
    }
}
