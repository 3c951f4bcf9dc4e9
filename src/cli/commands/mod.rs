mod browse;
mod chat;
mod ingredients;
mod search;

pub use browse::{BrowseCommand, cmd_browse};
pub use chat::cmd_chat;
pub use ingredients::cmd_ingredients;
pub use search::{cmd_search, cmd_show};

use std::sync::Arc;

use crate::clients::{RecipeApiClient, RecipeBackend};
use crate::config::Config;

fn connect(config: &Config) -> anyhow::Result<Arc<dyn RecipeBackend>> {
    Ok(Arc::new(RecipeApiClient::new(&config.backend)?))
}
