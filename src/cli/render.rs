//! Plain-text rendering of search state.

use std::fmt::Write as _;

use crate::models::Recipe;
use crate::services::{
    ChatMessage, Dimension, FacetOption, FacetSelection, FacetSidebar, MaxTime, SearchState,
    Speaker,
};

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

#[must_use]
pub fn status_line(state: &SearchState) -> String {
    if state.is_loading() {
        "Loading recipes...".to_string()
    } else if state.failed {
        "Search failed: no recipes found.".to_string()
    } else {
        format!("{} recipes found", state.results.len())
    }
}

#[must_use]
pub fn recipe_card(recipe: &Recipe) -> String {
    let mut out = format!("• {}", recipe.title);

    let mut meta = Vec::new();
    if let Some(cuisine) = recipe.cuisine.as_deref() {
        meta.push(cuisine.to_string());
    }
    if let Some(course) = recipe.course.as_deref() {
        meta.push(course.to_string());
    }
    if let Some(difficulty) = recipe.difficulty {
        meta.push(difficulty.label().to_string());
    }
    if recipe.total_time_minutes > 0 {
        meta.push(format!("{} min", recipe.total_time_minutes));
    }

    if !meta.is_empty() {
        let _ = write!(out, " ({})", meta.join(" | "));
    }
    let _ = write!(out, "\n  ID: {}", recipe.id);
    if !recipe.description.is_empty() {
        let _ = write!(out, "\n  {}", recipe.description);
    }
    out
}

#[must_use]
pub fn results(state: &SearchState) -> String {
    let mut out = status_line(state);
    if state.is_loading() {
        return out;
    }

    out.push('\n');
    out.push_str(&rule());
    for recipe in state.results.iter() {
        out.push('\n');
        out.push_str(&recipe_card(recipe));
    }
    out
}

#[must_use]
pub fn recipe_detail(recipe: &Recipe) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", recipe.title);
    let _ = writeln!(out, "{}", rule());

    let mut meta = Vec::new();
    if let Some(prep) = recipe.prep_time_minutes {
        meta.push(format!("Prep: {prep} min"));
    }
    if let Some(cook) = recipe.cook_time_minutes {
        meta.push(format!("Cook: {cook} min"));
    }
    meta.push(format!("Total: {} min", recipe.total_time_minutes));
    if let Some(difficulty) = recipe.difficulty {
        meta.push(difficulty.label().to_string());
    }
    meta.push(format!("Servings: {}", recipe.servings));
    let _ = writeln!(out, "{}", meta.join(" • "));

    if let Some(image) = recipe.image_url.as_deref() {
        let _ = writeln!(out, "Image: {image}");
    }

    let _ = writeln!(out, "\nDescription\n  {}", recipe.description);

    let _ = writeln!(out, "\nIngredients");
    for line in &recipe.ingredients {
        let optional = if line.optional { " [optional]" } else { "" };
        let _ = writeln!(out, "  - {line}{optional}");
    }

    let _ = writeln!(out, "\nInstructions");
    if recipe.instructions.is_empty() {
        let _ = writeln!(out, "  No instructions available.");
    }
    for (index, step) in recipe.instructions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {step}", index + 1);
    }

    if let Some(tips) = recipe.tips.as_ref().filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "\nTips");
        for tip in tips {
            let _ = writeln!(out, "  * {tip}");
        }
    }

    if let Some(n) = &recipe.nutrition {
        let _ = writeln!(
            out,
            "\nNutrition\n  {} kcal | protein {} g | carbs {} g | fat {} g | fiber {} g | sugar {} g",
            n.calories, n.protein, n.carbs, n.fat, n.fiber, n.sugar
        );
    }

    if !recipe.tags.is_empty() {
        let _ = writeln!(out, "\nTags: {}", recipe.tags.join(", "));
    }

    out
}

fn section(out: &mut String, title: &str, options: &[FacetOption], selected: impl Fn(&str) -> bool) {
    if options.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title}");
    for option in options {
        let mark = if selected(option.id.as_str()) { "[x]" } else { "[ ]" };
        let _ = writeln!(
            out,
            "  {mark} {} ({})  <{}>",
            option.label, option.count, option.id
        );
    }
}

#[must_use]
pub fn sidebar(
    facets: &FacetSidebar,
    selection: &FacetSelection,
    categories: &std::collections::BTreeSet<String>,
) -> String {
    let mut out = String::from("Filters\n");

    let _ = writeln!(out, "Max time");
    for choice in MaxTime::CHOICES {
        let mark = if selection.max_time == choice { "(o)" } else { "( )" };
        let _ = writeln!(out, "  {mark} {choice}");
    }

    section(&mut out, "Categories", &facets.categories, |id| {
        categories.contains(id)
    });
    section(&mut out, "Ingredients", &facets.ingredients, |id| {
        selection.is_selected(Dimension::Ingredients, id)
    });
    section(&mut out, "Cuisine", &facets.cuisines, |id| {
        selection.is_selected(Dimension::Cuisine, id)
    });
    section(&mut out, "Course", &facets.courses, |id| {
        selection.is_selected(Dimension::Course, id)
    });
    section(&mut out, "Difficulty", &facets.difficulties, |id| {
        selection.is_selected(Dimension::Difficulty, id)
    });

    out
}

#[must_use]
pub fn chat_message(message: &ChatMessage) -> String {
    let who = match message.from {
        Speaker::User => "you",
        Speaker::Assistant => "assistant",
    };
    format!("{who}> {}", message.text)
}
