use std::sync::Arc;

use anyhow::{Context, Result};
use browse_core::{BrowsingSession, DetailView, FavoritePolicy, FavoritesList, ToggleOutcome};
use catalog_client::{
    config::{load_settings, Settings},
    CatalogClient, TmdbClient,
};
use clap::{Parser, Subcommand};
use shared::domain::{CatalogItem, Category, MovieId};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "movies", about = "Browse the TMDB movie catalog")]
struct Cli {
    /// Print each movie as a detail payload, one JSON object per line.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a category (nowPlaying, popular, topRated, upcoming).
    Browse {
        #[arg(long, default_value = "nowPlaying")]
        category: Category,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Search titles; blank text lists the default category.
    Search {
        text: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// List the account's favorite movies.
    Favorites,
    /// Mark a movie as a favorite by id.
    Favorite {
        id: i64,
        /// Remove the movie from favorites instead.
        #[arg(long)]
        off: bool,
    },
    /// Show a movie from a payload printed by `--json`.
    Show {
        payload: String,
        #[arg(long)]
        toggle_favorite: bool,
        /// Put the favorite flag back if the update fails.
        #[arg(long)]
        reconcile: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = load_settings();

    match cli.command {
        Command::Browse { category, pages } => {
            let client = build_client(&settings)?;
            let mut session = BrowsingSession::new(client, category, settings.language.as_str());
            session.start();
            collect_pages(&mut session, pages).await;
            print_items(session.controller().items(), cli.json)?;
        }
        Command::Search { text, pages } => {
            let client = build_client(&settings)?;
            let mut session =
                BrowsingSession::new(client, Category::default(), settings.language.as_str());
            session.set_search_text(&text);
            collect_pages(&mut session, pages).await;
            print_items(session.controller().items(), cli.json)?;
        }
        Command::Favorites => {
            let client = build_client(&settings)?;
            let mut favorites = FavoritesList::new(client.account_id(), settings.language.as_str());
            favorites.load(client.as_ref()).await;
            if favorites.items().is_empty() {
                println!("No favorite movies found.");
            } else {
                print_items(favorites.items(), cli.json)?;
            }
        }
        Command::Favorite { id, off } => {
            let client = build_client(&settings)?;
            let movie = MovieId(id);
            client
                .set_favorite(movie, !off)
                .await
                .with_context(|| format!("failed to update favorite for movie {movie}"))?;
            println!("Favorite: {}", !off);
        }
        Command::Show {
            payload,
            toggle_favorite,
            reconcile,
        } => {
            let policy = if reconcile {
                FavoritePolicy::Reconcile
            } else {
                FavoritePolicy::default()
            };
            let mut view =
                DetailView::from_payload(&payload, policy).context("invalid movie payload")?;
            println!("{}", view.item().title);
            if let Some(url) = view.poster_url() {
                println!("Poster: {url}");
            }
            for line in view.summary_lines() {
                println!("{line}");
            }

            if toggle_favorite {
                let client = build_client(&settings)?;
                match view.toggle_favorite(client.as_ref()).await {
                    ToggleOutcome::Confirmed(notice) => {
                        println!("{}: {}", notice.title, notice.body)
                    }
                    ToggleOutcome::Failed { reverted } => {
                        warn!(reverted, "favorite update failed");
                    }
                }
                println!("Favorite: {}", view.is_favorite());
            }
        }
    }

    Ok(())
}

fn build_client(settings: &Settings) -> Result<Arc<TmdbClient>> {
    let client = TmdbClient::from_settings(settings).context("failed to set up catalog client")?;
    Ok(Arc::new(client))
}

async fn collect_pages<C: CatalogClient + 'static>(session: &mut BrowsingSession<C>, pages: u32) {
    session.settle().await;
    for _ in 1..pages.max(1) {
        if !session.load_more() {
            break;
        }
        session.settle().await;
    }
    info!(
        items = session.controller().items().len(),
        cursor = session.controller().cursor(),
        "browse: done"
    );
}

fn print_items(items: &[CatalogItem], json: bool) -> Result<()> {
    if items.is_empty() {
        println!("Oops! No movies found");
        return Ok(());
    }

    for item in items {
        if json {
            println!("{}", item.to_payload()?);
            continue;
        }
        let release = item
            .release_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "----------".to_string());
        println!(
            "{:>8}  {release}  {:>4.1}  {}",
            item.id.0, item.vote_average, item.title
        );
    }
    Ok(())
}
