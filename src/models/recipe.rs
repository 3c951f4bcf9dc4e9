use serde::{Deserialize, Serialize};
use std::fmt;

use super::lenient;

/// A recipe as returned by the search endpoint.
///
/// Every field is optional on the wire. Missing, `null` or mistyped fields
/// read as their defaults so one sloppy field never drops the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "_id", deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub slug: String,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::difficulty")]
    pub difficulty: Option<Difficulty>,
    #[serde(deserialize_with = "lenient::count")]
    pub servings: u32,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_count")]
    pub prep_time_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_count")]
    pub cook_time_minutes: Option<u32>,
    #[serde(deserialize_with = "lenient::count")]
    pub total_time_minutes: u32,
    #[serde(deserialize_with = "lenient::strings")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient::entries")]
    pub ingredients: Vec<IngredientLine>,
    #[serde(deserialize_with = "lenient::strings")]
    pub instructions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_strings")]
    pub tips: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_none")]
    pub nutrition: Option<Nutrition>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_none")]
    pub updated_at: Option<String>,
}

impl Recipe {
    #[must_use]
    pub fn uses_ingredient(&self, ingredient_id: &str) -> bool {
        self.ingredients
            .iter()
            .any(|line| line.ingredient_id == ingredient_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngredientLine {
    #[serde(deserialize_with = "lenient::text")]
    pub ingredient_id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_number")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_none")]
    pub unit: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_none")]
    pub notes: Option<String>,
}

/// Formats as `"<quantity> <unit> <name> (<notes>)"`.
///
/// Quantity and unit are only printed when both are present.
impl fmt::Display for IngredientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(quantity), Some(unit)) = (self.quantity, self.unit.as_deref()) {
            write!(f, "{quantity} {unit} ")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(notes) = self.notes.as_deref().filter(|n| !n.is_empty()) {
            write!(f, " ({notes})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrition {
    #[serde(deserialize_with = "lenient::number")]
    pub calories: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub protein: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub carbs: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub fat: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub fiber: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub sugar: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_recipe_deserializes() {
        let recipe: Recipe =
            serde_json::from_value(serde_json::json!({ "_id": "1", "title": "Soup" })).unwrap();
        assert_eq!(recipe.id, "1");
        assert_eq!(recipe.title, "Soup");
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.difficulty, None);
    }

    #[test]
    fn test_camel_case_fields() {
        let recipe: Recipe = serde_json::from_value(serde_json::json!({
            "_id": "r1",
            "title": "Paella",
            "difficulty": "hard",
            "totalTimeMinutes": 60,
            "prepTimeMinutes": 20,
            "ingredients": [
                { "ingredientId": "i1", "name": "Rice", "quantity": 400.0, "unit": "g", "optional": false }
            ]
        }))
        .unwrap();

        assert_eq!(recipe.difficulty, Some(Difficulty::Hard));
        assert_eq!(recipe.total_time_minutes, 60);
        assert_eq!(recipe.prep_time_minutes, Some(20));
        assert!(recipe.uses_ingredient("i1"));
        assert!(!recipe.uses_ingredient("i2"));
    }

    #[test]
    fn test_ingredient_line_display() {
        let line = IngredientLine {
            ingredient_id: "i1".to_string(),
            name: "Rice".to_string(),
            quantity: Some(400.0),
            unit: Some("g".to_string()),
            optional: false,
            notes: Some("bomba".to_string()),
        };
        assert_eq!(line.to_string(), "400 g Rice (bomba)");

        let bare = IngredientLine {
            name: "Salt".to_string(),
            quantity: Some(1.0),
            ..Default::default()
        };
        assert_eq!(bare.to_string(), "Salt");
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("Medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("extreme"), None);
    }
}
