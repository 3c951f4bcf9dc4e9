//! Per-option result counts for the filter sidebar.
//!
//! Everything here is a pure function of the catalog, the cuisine/course
//! universe and the committed result set; nothing is cached.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::models::{Difficulty, IngredientCatalog, Recipe};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub id: String,
    pub label: String,
    pub count: usize,
}

impl FacetOption {
    fn new(id: impl Into<String>, label: impl Into<String>, count: usize) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            count,
        }
    }
}

/// Every cuisine and course value the browser knows about.
///
/// Captured once from an unfiltered result set so that the sidebar keeps
/// showing options that the active filters have narrowed down to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetUniverse {
    cuisines: BTreeSet<String>,
    courses: BTreeSet<String>,
    captured: bool,
}

impl FacetUniverse {
    #[must_use]
    pub fn capture(recipes: &[Recipe]) -> Self {
        Self {
            cuisines: distinct(recipes.iter().map(|r| r.cuisine.as_deref())),
            courses: distinct(recipes.iter().map(|r| r.course.as_deref())),
            captured: true,
        }
    }

    #[must_use]
    pub fn from_values<C, K>(cuisines: C, courses: K) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            cuisines: cuisines.into_iter().map(Into::into).collect(),
            courses: courses.into_iter().map(Into::into).collect(),
            captured: true,
        }
    }

    #[must_use]
    pub const fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn cuisines(&self) -> impl Iterator<Item = &str> {
        self.cuisines.iter().map(String::as_str)
    }

    pub fn courses(&self) -> impl Iterator<Item = &str> {
        self.courses.iter().map(String::as_str)
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> BTreeSet<String> {
    values
        .flatten()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// All option lists the sidebar renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetSidebar {
    pub categories: Vec<FacetOption>,
    pub ingredients: Vec<FacetOption>,
    pub cuisines: Vec<FacetOption>,
    pub courses: Vec<FacetOption>,
    pub difficulties: Vec<FacetOption>,
}

#[must_use]
pub fn aggregate(
    catalog: &IngredientCatalog,
    universe: &FacetUniverse,
    results: &[Recipe],
    selected_categories: &BTreeSet<String>,
) -> FacetSidebar {
    FacetSidebar {
        categories: category_options(catalog),
        ingredients: ingredient_options(catalog, results, selected_categories),
        cuisines: cuisine_options(universe, results),
        courses: course_options(universe, results),
        difficulties: difficulty_options(results),
    }
}

/// One option per ingredient category; the count is the number of catalog
/// ingredients in it, independent of the results.
#[must_use]
pub fn category_options(catalog: &IngredientCatalog) -> Vec<FacetOption> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for ingredient in catalog.iter().filter(|i| !i.category.trim().is_empty()) {
        *counts.entry(ingredient.category.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(category, count)| FacetOption::new(category, category, count))
        .collect()
}

/// Catalog ingredients, optionally restricted to the selected categories,
/// each counted by the number of results that use it. Sorted by name.
#[must_use]
pub fn ingredient_options(
    catalog: &IngredientCatalog,
    results: &[Recipe],
    selected_categories: &BTreeSet<String>,
) -> Vec<FacetOption> {
    let mut usage: HashMap<&str, usize> = HashMap::new();
    for recipe in results {
        let ids: HashSet<&str> = recipe
            .ingredients
            .iter()
            .map(|line| line.ingredient_id.as_str())
            .collect();
        for id in ids {
            *usage.entry(id).or_default() += 1;
        }
    }

    let mut options: Vec<FacetOption> = catalog
        .iter()
        .filter(|i| selected_categories.is_empty() || selected_categories.contains(&i.category))
        .map(|i| {
            let count = usage.get(i.id.as_str()).copied().unwrap_or(0);
            FacetOption::new(i.id.as_str(), i.name.as_str(), count)
        })
        .collect();

    options.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));
    options
}

#[must_use]
pub fn cuisine_options(universe: &FacetUniverse, results: &[Recipe]) -> Vec<FacetOption> {
    scalar_options(universe.cuisines(), results, |r| r.cuisine.as_deref())
}

#[must_use]
pub fn course_options(universe: &FacetUniverse, results: &[Recipe]) -> Vec<FacetOption> {
    scalar_options(universe.courses(), results, |r| r.course.as_deref())
}

/// Counts per value of a scalar recipe field over the universe plus any value
/// that only shows up in the current results.
fn scalar_options<'a>(
    universe: impl Iterator<Item = &'a str>,
    results: &'a [Recipe],
    field: impl Fn(&'a Recipe) -> Option<&'a str>,
) -> Vec<FacetOption> {
    let mut counts: BTreeMap<&str, usize> = universe.map(|value| (value, 0)).collect();
    for value in results
        .iter()
        .filter_map(&field)
        .filter(|v| !v.trim().is_empty())
    {
        *counts.entry(value).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(value, count)| FacetOption::new(value, value, count))
        .collect()
}

#[must_use]
pub fn difficulty_options(results: &[Recipe]) -> Vec<FacetOption> {
    Difficulty::ALL
        .into_iter()
        .map(|difficulty| {
            let count = results
                .iter()
                .filter(|r| r.difficulty == Some(difficulty))
                .count();
            FacetOption::new(difficulty.as_str(), difficulty.label(), count)
        })
        .collect()
}
