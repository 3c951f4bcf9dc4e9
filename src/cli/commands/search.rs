//! One-shot search and recipe detail commands

use std::collections::BTreeSet;

use crate::cli::SearchArgs;
use crate::cli::render;
use crate::config::Config;
use crate::domain::SearchInput;
use crate::models::Difficulty;
use crate::services::{
    Dimension, FacetSelection, FacetStore, SearchController, SearchOutcome, aggregate,
    build_query, is_unfiltered,
};

pub async fn cmd_search(config: &Config, args: SearchArgs) -> anyhow::Result<()> {
    let backend = super::connect(config)?;
    let mut store = FacetStore::new(config.search.event_buffer_size);
    store.load_catalog(backend.as_ref()).await;

    if let Err(message) = apply_args(&mut store, &args) {
        println!("{message}");
        return Ok(());
    }

    let controller = SearchController::new(backend);

    // The unfiltered search seeds the cuisine/course universe for the sidebar.
    if args.facets && !is_unfiltered(&build_query(store.selection(), &store.catalog())) {
        controller
            .execute(SearchInput::new(FacetSelection::default(), store.catalog()))
            .await;
    }

    if let SearchOutcome::Failed { error, .. } = controller.execute(store.snapshot()).await {
        println!("⚠ {error}");
    }

    let state = controller.state();
    println!("{}", render::results(&state));

    if args.facets {
        let facets = aggregate(
            &store.catalog(),
            &state.universe,
            &state.results,
            &BTreeSet::new(),
        );
        println!();
        print!("{}", render::sidebar(&facets, store.selection(), &BTreeSet::new()));
    }

    Ok(())
}

fn apply_args(store: &mut FacetStore, args: &SearchArgs) -> Result<(), String> {
    store.set_query(args.query.join(" "));

    for id in &args.ingredients {
        if store.catalog().get(id).is_none() {
            println!("⚠ Unknown ingredient ID '{id}' will be ignored");
        }
        store.select(Dimension::Ingredients, id.as_str());
    }
    for cuisine in &args.cuisines {
        store.select(Dimension::Cuisine, cuisine.as_str());
    }
    for course in &args.courses {
        store.select(Dimension::Course, course.as_str());
    }
    for value in &args.difficulties {
        let difficulty = Difficulty::parse(value)
            .ok_or_else(|| format!("Unknown difficulty '{value}' (use easy, medium or hard)"))?;
        store.select(Dimension::Difficulty, difficulty.as_str());
    }
    if let Some(max_time) = args.max_time {
        store.set_max_time(max_time);
    }

    Ok(())
}

pub async fn cmd_show(config: &Config, id: &str) -> anyhow::Result<()> {
    let backend = super::connect(config)?;
    let controller = SearchController::new(backend);

    if let SearchOutcome::Failed { error, .. } =
        controller.execute(SearchInput::default()).await
    {
        println!("⚠ {error}");
        return Ok(());
    }

    let state = controller.state();
    match state.results.iter().find(|r| r.id == id) {
        Some(recipe) => print!("{}", render::recipe_detail(recipe)),
        None => println!("Recipe {id} not found among the first {} results.", state.results.len()),
    }

    Ok(())
}
