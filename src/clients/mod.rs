//! Backend collaborators: recipe search, ingredient catalog and chat.

pub mod api;

pub use api::RecipeApiClient;

use thiserror::Error;

use crate::domain::QueryParams;
use crate::models::Ingredient;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// True when the server answered with a non-success status, as opposed
    /// to the request never completing.
    #[must_use]
    pub const fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}

/// The HTTP services the browser talks to.
///
/// Implemented by [`RecipeApiClient`] for real deployments and by in-memory
/// fakes in tests.
#[async_trait::async_trait]
pub trait RecipeBackend: Send + Sync {
    /// `GET /search/recipes`. Returns the raw JSON body; its shape is not
    /// stable across deployments.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Request`] on transport failures or an undecodable body
    /// - [`BackendError::Status`] on a non-success status
    async fn search_recipes(&self, params: &QueryParams)
    -> Result<serde_json::Value, BackendError>;

    /// `GET /ingredients`.
    ///
    /// # Errors
    ///
    /// Same as [`RecipeBackend::search_recipes`].
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, BackendError>;

    /// `POST /chat` with `{message}`, returning the `answer` field.
    ///
    /// # Errors
    ///
    /// Same as [`RecipeBackend::search_recipes`].
    async fn chat(&self, message: &str) -> Result<String, BackendError>;
}
