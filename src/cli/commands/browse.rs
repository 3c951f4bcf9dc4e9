//! Interactive browser
//!
//! Every line mutates the facet store; the search controller picks the change
//! up through its subscription and the renderer prints each settled result.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::render;
use crate::config::Config;
use crate::models::Difficulty;
use crate::services::{
    ChatSession, Dimension, FacetStore, MaxTime, SearchController, SearchState, aggregate,
};

const HELP: &str = "\
Commands:
  q <text>             set the search text (empty clears it)
  i <ingredient id>    toggle an ingredient
  c <cuisine>          toggle a cuisine
  course <course>      toggle a course
  d <easy|medium|hard> toggle a difficulty
  t <15|30|45|60|any>  set the max preparation time
  cat <category>       toggle an ingredient category in the sidebar
  clear [dimension]    clear one dimension, or every filter
  facets               show the filter sidebar
  show <recipe id>     show a recipe from the current results
  chat <message>       ask the recipe assistant
  help                 show this help
  quit                 leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Query(String),
    Toggle(Dimension, String),
    MaxTime(MaxTime),
    Category(String),
    Clear(Option<Dimension>),
    Facets,
    Show(String),
    Chat(String),
    Help,
    Quit,
}

impl BrowseCommand {
    /// Parses one input line. Errors are user-facing messages.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(h, r)| (h, r.trim()));

        let require = |what: &str| {
            if rest.is_empty() {
                Err(format!("Missing {what}. Type 'help' for usage."))
            } else {
                Ok(rest.to_string())
            }
        };

        match head.to_ascii_lowercase().as_str() {
            "q" | "query" => Ok(Self::Query(rest.to_string())),
            "i" | "ingredient" => Ok(Self::Toggle(Dimension::Ingredients, require("ingredient id")?)),
            "c" | "cuisine" => Ok(Self::Toggle(Dimension::Cuisine, require("cuisine")?)),
            "course" => Ok(Self::Toggle(Dimension::Course, require("course")?)),
            "d" | "difficulty" => {
                let value = require("difficulty")?;
                let difficulty = Difficulty::parse(&value)
                    .ok_or_else(|| format!("Unknown difficulty '{value}'"))?;
                Ok(Self::Toggle(Dimension::Difficulty, difficulty.as_str().to_string()))
            }
            "t" | "time" => rest
                .parse::<MaxTime>()
                .map(Self::MaxTime)
                .map_err(|e| e.to_string()),
            "cat" | "category" => Ok(Self::Category(require("category")?)),
            "clear" if rest.is_empty() => Ok(Self::Clear(None)),
            "clear" => Dimension::parse(rest)
                .map(|d| Self::Clear(Some(d)))
                .ok_or_else(|| format!("Unknown filter '{rest}'")),
            "facets" | "f" => Ok(Self::Facets),
            "show" => Ok(Self::Show(require("recipe id")?)),
            "chat" => Ok(Self::Chat(require("message")?)),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(format!("Unknown command '{head}'. Type 'help' for usage.")),
        }
    }
}

pub async fn cmd_browse(config: &Config) -> anyhow::Result<()> {
    let backend = super::connect(config)?;
    let controller = Arc::new(SearchController::new(backend.clone()));
    let mut store = FacetStore::new(config.search.event_buffer_size);
    let mut categories: BTreeSet<String> = BTreeSet::new();
    let mut chat = ChatSession::new();

    let listener = Arc::clone(&controller).start_listener(store.subscribe());
    let renderer = spawn_renderer(controller.subscribe());

    println!("{HELP}\n");
    drop(controller.trigger(store.snapshot()));
    store.load_catalog(backend.as_ref()).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match BrowseCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            BrowseCommand::Query(text) => store.set_query(text),
            BrowseCommand::Toggle(dimension, id) => {
                store.toggle(dimension, id);
            }
            BrowseCommand::MaxTime(max_time) => store.set_max_time(max_time),
            BrowseCommand::Category(category) => {
                if !categories.remove(&category) {
                    categories.insert(category);
                }
                print_sidebar(&store, &controller.state(), &categories);
            }
            BrowseCommand::Clear(Some(dimension)) => store.clear(dimension),
            BrowseCommand::Clear(None) => {
                categories.clear();
                store.clear_all();
            }
            BrowseCommand::Facets => print_sidebar(&store, &controller.state(), &categories),
            BrowseCommand::Show(id) => {
                let state = controller.state();
                match state.results.iter().find(|r| r.id == id) {
                    Some(recipe) => print!("{}", render::recipe_detail(recipe)),
                    None => println!("Recipe {id} is not in the current results."),
                }
            }
            BrowseCommand::Chat(message) => {
                if let Some(reply) = chat.send(backend.as_ref(), &message).await {
                    println!("{}", render::chat_message(reply));
                }
            }
            BrowseCommand::Help => println!("{HELP}"),
            BrowseCommand::Quit => break,
        }
    }

    drop(store);
    let _ = listener.await;
    renderer.abort();
    Ok(())
}

fn print_sidebar(store: &FacetStore, state: &SearchState, categories: &BTreeSet<String>) {
    let facets = aggregate(&store.catalog(), &state.universe, &state.results, categories);
    print!("{}", render::sidebar(&facets, store.selection(), categories));
}

fn spawn_renderer(
    mut rx: tokio::sync::watch::Receiver<SearchState>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_rendered = None;
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if state.is_loading() || state.committed == last_rendered {
                continue;
            }
            last_rendered = state.committed;
            println!("{}\n", render::results(&state));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toggles() {
        assert_eq!(
            BrowseCommand::parse("i  abc123 "),
            Ok(BrowseCommand::Toggle(Dimension::Ingredients, "abc123".to_string()))
        );
        assert_eq!(
            BrowseCommand::parse("course Main dish"),
            Ok(BrowseCommand::Toggle(Dimension::Course, "Main dish".to_string()))
        );
        assert_eq!(
            BrowseCommand::parse("d HARD"),
            Ok(BrowseCommand::Toggle(Dimension::Difficulty, "hard".to_string()))
        );
        assert!(BrowseCommand::parse("d extreme").is_err());
        assert!(BrowseCommand::parse("c").is_err());
    }

    #[test]
    fn test_parse_query_and_time() {
        assert_eq!(
            BrowseCommand::parse("q tomato soup"),
            Ok(BrowseCommand::Query("tomato soup".to_string()))
        );
        assert_eq!(BrowseCommand::parse("q"), Ok(BrowseCommand::Query(String::new())));
        assert_eq!(
            BrowseCommand::parse("t 30"),
            Ok(BrowseCommand::MaxTime(MaxTime::Within30))
        );
        assert_eq!(
            BrowseCommand::parse("t any"),
            Ok(BrowseCommand::MaxTime(MaxTime::Unbounded))
        );
        assert!(BrowseCommand::parse("t 20").is_err());
    }

    #[test]
    fn test_parse_clear() {
        assert_eq!(BrowseCommand::parse("clear"), Ok(BrowseCommand::Clear(None)));
        assert_eq!(
            BrowseCommand::parse("clear cuisine"),
            Ok(BrowseCommand::Clear(Some(Dimension::Cuisine)))
        );
        assert!(BrowseCommand::parse("clear everything").is_err());
        assert!(BrowseCommand::parse("frobnicate").is_err());
    }
}
