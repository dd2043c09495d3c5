//! Recipe catalog browsing: normalized recipes, category filtering and
//! pagination, locally persisted favorites and combined shopping lists.

pub mod client;
pub mod combine;
pub mod config;
pub mod error;
pub mod favorites;
pub mod listing;
pub mod model;
pub mod normalize;

use log::debug;

pub use client::{CatalogSource, MealDbClient};
pub use combine::{combine, shopping_list_text};
pub use crate::config::BrowserConfig;
pub use error::{BrowserError, Result};
pub use favorites::{
    load_all_favorites, load_favorites, BoardStatus, FavoritesBoard, FavoritesStore,
    FavoritesView, FileStorage, MemoryStorage, Storage,
};
pub use listing::{browse, Listing, ListingQuery, ListingSettings, Page};
pub use model::{CombinedIngredient, Ingredient, RawRecipeRecord, Recipe, RecipeCard};

/// Look up one recipe by id and normalize it.
///
/// An empty lookup result is reported as [`BrowserError::NotFoundError`].
pub async fn fetch_recipe<S>(source: &S, id: &str) -> Result<Recipe>
where
    S: CatalogSource + ?Sized,
{
    let records = source.lookup_by_id(id).await?;
    let raw = records
        .first()
        .ok_or_else(|| BrowserError::NotFoundError(id.to_string()))?;
    let recipe = normalize::to_detail(raw)?;
    debug!("{:#?}", recipe);
    Ok(recipe)
}

/// Search the catalog and return summary cards
pub async fn search_recipes<S>(source: &S, query: &str) -> Result<Vec<RecipeCard>>
where
    S: CatalogSource + ?Sized,
{
    let records = source.search_by_name(query).await?;
    normalize::to_cards(&records)
}

/// Favorites store backed by files in the configured data directory
pub fn open_favorites(config: &BrowserConfig) -> FavoritesStore {
    FavoritesStore::new(std::sync::Arc::new(FileStorage::new(config.data_dir.clone())))
}
