pub mod selection;
pub use selection::{Dimension, FacetSelection, FacetStore, MaxTime, MaxTimeError};

pub mod query;
pub use query::{build_query, is_unfiltered};

pub mod normalize;
pub use normalize::normalize_response;

pub mod search;
pub use search::{SearchController, SearchOutcome, SearchPhase, SearchState};

pub mod facets;
pub use facets::{FacetOption, FacetSidebar, FacetUniverse, aggregate};

pub mod chat;
pub use chat::{ChatMessage, ChatSession, Speaker};
