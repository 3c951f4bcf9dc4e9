pub const APP_NAME: &str = "recetario";

pub const USER_AGENT: &str = "Recetario/0.1";

pub mod endpoints {

    pub const SEARCH_RECIPES: &str = "search/recipes";

    pub const INGREDIENTS: &str = "ingredients";

    pub const CHAT: &str = "chat";
}

pub mod limits {

    /// Fixed result cap sent with every search.
    pub const SEARCH_RESULT_SIZE: usize = 50;

    pub const DEFAULT_EVENT_BUFFER: usize = 64;
}
