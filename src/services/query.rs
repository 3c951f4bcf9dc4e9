//! Derives search endpoint parameters from the facet selection.

use crate::constants::limits::SEARCH_RESULT_SIZE;
use crate::domain::QueryParams;
use crate::models::IngredientCatalog;
use crate::services::selection::FacetSelection;

/// Builds the query for `GET /search/recipes`.
///
/// Pure: the same selection and catalog always yield the same parameters.
///
/// - `ingredients` carries names, not ids. Ids the catalog cannot resolve are dropped.
/// - `cuisine` and `course` are scalar on the backend, so only the first
///   selected value of each is sent.
/// - `size` is always present.
#[must_use]
pub fn build_query(selection: &FacetSelection, catalog: &IngredientCatalog) -> QueryParams {
    let mut params = QueryParams::new();

    let query = selection.query.trim();
    if !query.is_empty() {
        params.push("q", query);
    }

    let names: Vec<&str> = selection
        .ingredients
        .iter()
        .filter_map(|id| catalog.name_of(id))
        .collect();
    if !names.is_empty() {
        params.push("ingredients", names.join(","));
    }

    if !selection.difficulties.is_empty() {
        let difficulties: Vec<&str> = selection.difficulties.iter().map(String::as_str).collect();
        params.push("difficulty", difficulties.join(","));
    }

    if let Some(cuisine) = selection.cuisines.first() {
        params.push("cuisine", cuisine.as_str());
    }

    if let Some(course) = selection.courses.first() {
        params.push("course", course.as_str());
    }

    if let Some(minutes) = selection.max_time.minutes() {
        params.push("maxTime", minutes.to_string());
    }

    params.push("size", SEARCH_RESULT_SIZE.to_string());
    params
}

/// True when `params` carry nothing but the fixed result size.
#[must_use]
pub fn is_unfiltered(params: &QueryParams) -> bool {
    params.iter().all(|(key, _)| key == "size")
}
