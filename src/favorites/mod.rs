mod board;
mod storage;
mod store;

pub use board::{
    load_all_favorites, load_favorites, load_favorites_with_progress, BoardStatus, FavoriteEntry,
    FavoritesBoard, LookupState,
};
pub use storage::{FileStorage, MemoryStorage, Origin, Storage, StorageEvent};
pub use store::{FavoritesStore, FavoritesView, FAVORITES_KEY};
