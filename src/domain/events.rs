//! Change events published by the facet selection store.

use std::sync::Arc;

use crate::models::IngredientCatalog;
use crate::services::selection::FacetSelection;

/// Snapshot published after every store mutation.
///
/// Carries everything the query builder needs, so a subscriber never has to
/// read back into the store.
#[derive(Clone, Debug, Default)]
pub struct SearchInput {
    pub selection: FacetSelection,
    pub catalog: Arc<IngredientCatalog>,
}

impl SearchInput {
    #[must_use]
    pub const fn new(selection: FacetSelection, catalog: Arc<IngredientCatalog>) -> Self {
        Self { selection, catalog }
    }
}
