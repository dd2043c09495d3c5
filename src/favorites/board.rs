use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::watch;

use crate::client::CatalogSource;
use crate::combine::combine;
use crate::error::BrowserError;
use crate::model::{CombinedIngredient, Recipe, RecipeCard};

/// Outcome of one favorite's lookup
#[derive(Debug)]
pub enum LookupState {
    Pending,
    Loaded(Recipe),
    Failed(BrowserError),
}

#[derive(Debug)]
pub struct FavoriteEntry {
    pub id: String,
    pub state: LookupState,
}

/// Overall state of the favorites page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoardStatus {
    /// No favorites selected
    Empty,
    /// At least one lookup has not answered yet
    Loading,
    /// Every lookup succeeded
    Loaded,
    /// Some lookups failed, others succeeded
    Partial,
    /// Every lookup failed
    Failed,
}

/// Favorites together with the result of looking each one up
#[derive(Debug)]
pub struct FavoritesBoard {
    entries: Vec<FavoriteEntry>,
}

impl FavoritesBoard {
    pub fn new(ids: &[String]) -> Self {
        Self {
            entries: ids
                .iter()
                .map(|id| FavoriteEntry {
                    id: id.clone(),
                    state: LookupState::Pending,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    fn record(&mut self, index: usize, result: Result<Recipe, BrowserError>) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.state = match result {
                Ok(recipe) => LookupState::Loaded(recipe),
                Err(e) => {
                    warn!("Favorite {} failed to load: {}", entry.id, e);
                    LookupState::Failed(e)
                }
            };
        }
    }

    pub fn status(&self) -> BoardStatus {
        if self.entries.is_empty() {
            return BoardStatus::Empty;
        }

        let (mut loaded, mut failed, mut pending) = (0, 0, 0);
        for entry in &self.entries {
            match entry.state {
                LookupState::Pending => pending += 1,
                LookupState::Loaded(_) => loaded += 1,
                LookupState::Failed(_) => failed += 1,
            }
        }

        if pending > 0 {
            BoardStatus::Loading
        } else if failed == 0 {
            BoardStatus::Loaded
        } else if loaded == 0 {
            BoardStatus::Failed
        } else {
            BoardStatus::Partial
        }
    }

    /// Successfully loaded recipes, in favorites order
    pub fn recipes(&self) -> Vec<&Recipe> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.state {
                LookupState::Loaded(recipe) => Some(recipe),
                _ => None,
            })
            .collect()
    }

    pub fn cards(&self) -> Vec<RecipeCard> {
        self.recipes().into_iter().map(Recipe::card).collect()
    }

    pub fn failures(&self) -> Vec<(&str, &BrowserError)> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.state {
                LookupState::Failed(e) => Some((entry.id.as_str(), e)),
                _ => None,
            })
            .collect()
    }

    /// Combined shopping list over the loaded recipes
    pub fn shopping_list(&self) -> Vec<CombinedIngredient> {
        let recipes: Vec<Recipe> = self.recipes().into_iter().cloned().collect();
        combine(&recipes)
    }
}

/// Look up every favorite concurrently and collect the outcomes.
///
/// Each id gets its own request; a failing lookup does not affect the
/// others. Once `teardown` turns `true`, results still in flight are
/// discarded and their entries stay [`LookupState::Pending`].
pub async fn load_favorites<S>(
    source: &S,
    ids: &[String],
    teardown: watch::Receiver<bool>,
) -> FavoritesBoard
where
    S: CatalogSource + ?Sized,
{
    load_favorites_with_progress(source, ids, teardown, |_, _| {}).await
}

/// [`load_favorites`] that reports each settled lookup as it arrives.
///
/// `on_settled` gets the index of the entry that just settled and the board
/// as it stands at that moment. It is not called for lookups dropped by
/// teardown.
pub async fn load_favorites_with_progress<S, F>(
    source: &S,
    ids: &[String],
    mut teardown: watch::Receiver<bool>,
    mut on_settled: F,
) -> FavoritesBoard
where
    S: CatalogSource + ?Sized,
    F: FnMut(usize, &FavoritesBoard),
{
    let mut board = FavoritesBoard::new(ids);
    if *teardown.borrow() {
        return board;
    }

    let mut lookups: FuturesUnordered<_> = ids
        .iter()
        .enumerate()
        .map(|(index, id)| async move { (index, crate::fetch_recipe(source, id).await) })
        .collect();

    let mut watching = true;
    loop {
        tokio::select! {
            biased;
            changed = teardown.changed(), if watching => match changed {
                Ok(()) if *teardown.borrow() => {
                    debug!("Favorites view torn down, dropping pending lookups");
                    break;
                }
                Ok(()) => {}
                // Nobody can tear us down any more
                Err(_) => watching = false,
            },
            next = lookups.next() => match next {
                Some((index, result)) => {
                    board.record(index, result);
                    on_settled(index, &board);
                }
                None => break,
            },
        }
    }

    info!("Favorites board: {:?}", board.status());
    board
}

/// [`load_favorites`] without a teardown signal
pub async fn load_all_favorites<S>(source: &S, ids: &[String]) -> FavoritesBoard
where
    S: CatalogSource + ?Sized,
{
    let (_keep_alive, teardown) = watch::channel(false);
    load_favorites(source, ids, teardown).await
}
