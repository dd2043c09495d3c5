use clap::{Parser, Subcommand};
use log::error;
use tokio::sync::watch;

use recipe_browser::favorites::{
    load_favorites_with_progress, BoardStatus, FavoritesView, LookupState,
};
use recipe_browser::listing::{visible_pages, PageButton};
use recipe_browser::{
    browse, fetch_recipe, normalize, open_favorites, shopping_list_text,
    BrowserConfig, CatalogSource, ListingQuery, ListingSettings, MealDbClient, RecipeCard,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search recipes by name, or show a random selection when no query is given
    Search {
        query: Option<String>,
        #[arg(short, long, default_value = "All")]
        category: String,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show one recipe in full
    Show { id: String },
    /// List the catalog's categories
    Categories,
    /// List recipes of one category or cuisine
    Filter {
        #[arg(long, conflicts_with = "area", required_unless_present = "area")]
        category: Option<String>,
        #[arg(long)]
        area: Option<String>,
    },
    /// Manage favorite recipes
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Combined shopping list for all favorites
    ShoppingList,
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    List,
    Add { id: String },
    Remove { id: String },
    Toggle { id: String },
    Clear,
}

fn print_cards(cards: &[RecipeCard]) {
    for card in cards {
        let tags = card
            .tags
            .as_ref()
            .map(|tags| format!(" [{}]", tags.join(", ")))
            .unwrap_or_default();
        println!(
            "{:>6}  {} ({} / {}){}",
            card.id, card.name, card.category, card.area, tags
        );
    }
}

fn render_pager(current: usize, total_pages: usize, max_visible: usize) -> String {
    visible_pages(current, total_pages, max_visible)
        .into_iter()
        .map(|button| match button {
            PageButton::Page(n) if n == current => format!("[{n}]"),
            PageButton::Page(n) => n.to_string(),
            PageButton::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

async fn run(args: Args, config: BrowserConfig) -> recipe_browser::Result<()> {
    let client = MealDbClient::from_config(&config)?;

    match args.command {
        Command::Search {
            query,
            category,
            page,
        } => {
            let query = ListingQuery {
                search: query.unwrap_or_default(),
                category,
                page,
            };
            let settings = ListingSettings {
                page_size: config.page_size,
                random_count: config.random_count,
            };
            let listing = browse(&client, &query, settings).await?;

            println!(
                "{} recipes, page {} of {} (categories: {})",
                listing.total_matches,
                query.page,
                listing.page.total_pages,
                listing.categories.join(", ")
            );
            print_cards(&listing.page.items);
            let pager = render_pager(query.page, listing.page.total_pages, config.max_visible_pages);
            if !pager.is_empty() {
                println!("{pager}");
            }
        }
        Command::Show { id } => {
            let recipe = fetch_recipe(&client, &id).await?;
            let favorites = open_favorites(&config);

            let marker = if favorites.is_selected(&recipe.id) { " ★" } else { "" };
            println!("{}{}", recipe.name, marker);
            println!("{} / {}", recipe.category, recipe.area);
            if let Some(youtube) = &recipe.youtube {
                println!("Video: {youtube}");
            }
            if let Some(source) = &recipe.source {
                println!("Source: {source}");
            }
            println!("\nIngredients:");
            for ingredient in &recipe.ingredients {
                let measure = if ingredient.measure.is_empty() {
                    "to taste"
                } else {
                    ingredient.measure.as_str()
                };
                println!("  {} - {}", ingredient.name, measure);
            }
            println!("\nInstructions:");
            for paragraph in recipe.instruction_paragraphs() {
                println!("  {}", paragraph.trim());
            }
        }
        Command::Categories => {
            for category in client.list_categories().await? {
                println!("{category}");
            }
        }
        Command::Filter { category, area } => {
            let records = match (category, area) {
                (Some(category), _) => client.filter_by_category(&category).await?,
                (None, Some(area)) => client.filter_by_area(&area).await?,
                (None, None) => Vec::new(),
            };
            print_cards(&normalize::to_cards(&records)?);
        }
        Command::Favorites { action } => {
            let mut view = FavoritesView::new(open_favorites(&config));
            match action {
                FavoritesAction::List => {}
                FavoritesAction::Add { id } => view.add(&id),
                FavoritesAction::Remove { id } => view.remove(&id),
                FavoritesAction::Toggle { id } => {
                    let selected = view.toggle(&id);
                    println!("{id} {}", if selected { "added" } else { "removed" });
                }
                FavoritesAction::Clear => view.clear(),
            }
            view.poll();
            for id in view.ids() {
                println!("{id}");
            }
        }
        Command::ShoppingList => {
            let ids = open_favorites(&config).get_all();
            let (_keep_alive, teardown) = watch::channel(false);
            let board = load_favorites_with_progress(&client, &ids, teardown, |index, board| {
                let entry = &board.entries()[index];
                let outcome = match entry.state {
                    LookupState::Failed(_) => "failed",
                    _ => "loaded",
                };
                eprintln!("{} {} ({:?})", entry.id, outcome, board.status());
            })
            .await;

            match board.status() {
                BoardStatus::Empty => {
                    println!("No favorite recipes");
                    return Ok(());
                }
                BoardStatus::Partial => println!("Some recipes failed to load"),
                BoardStatus::Failed => println!("None of your favorite recipes could be loaded"),
                BoardStatus::Loaded | BoardStatus::Loading => {}
            }
            for (id, e) in board.failures() {
                println!("  {id}: {e}");
            }

            print_cards(&board.cards());
            let list = board.shopping_list();
            if !list.is_empty() {
                println!("\nShopping list ({} ingredients):", list.len());
                println!("{}", shopping_list_text(&list));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match BrowserConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args, config).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
