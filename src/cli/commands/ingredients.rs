//! Ingredient catalog command

use anyhow::Context;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::models::Ingredient;

pub async fn cmd_ingredients(config: &Config) -> anyhow::Result<()> {
    let backend = super::connect(config)?;
    let ingredients = backend
        .list_ingredients()
        .await
        .context("Failed to fetch the ingredient catalog")?;

    if ingredients.is_empty() {
        println!("The ingredient catalog is empty.");
        return Ok(());
    }

    let mut by_category: BTreeMap<&str, Vec<&Ingredient>> = BTreeMap::new();
    for ingredient in &ingredients {
        let category = if ingredient.category.trim().is_empty() {
            "Uncategorized"
        } else {
            ingredient.category.as_str()
        };
        by_category.entry(category).or_default().push(ingredient);
    }

    println!("Ingredients ({} total)", ingredients.len());
    println!("{:-<60}", "");

    for (category, mut items) in by_category {
        items.sort_by(|a, b| a.name.cmp(&b.name));
        println!("{category} ({})", items.len());
        for ingredient in items {
            match ingredient.description.as_deref() {
                Some(description) if !description.is_empty() => {
                    println!("  • {} <{}> - {description}", ingredient.name, ingredient.id);
                }
                _ => println!("  • {} <{}>", ingredient.name, ingredient.id),
            }
        }
    }

    println!();
    println!("Filter by ingredient with: recetario search --ingredient <id>");

    Ok(())
}
