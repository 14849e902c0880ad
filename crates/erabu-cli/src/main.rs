//! Command-line picker for movie and anime recommendations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use erabu_api::jikan::types::AgeRating;
use erabu_api::jikan::JikanClient;
use erabu_api::tmdb::TmdbClient;
use erabu_core::{AppConfig, ContentKind, FavoritesStore, FilterSet, Recommendation, Session};

#[derive(Parser, Debug)]
#[command(name = "erabu", version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick a random recommendation matching the filters
    Suggest {
        /// What to recommend
        #[arg(long, value_enum, default_value_t = Kind::Movie)]
        kind: Kind,

        /// Genre id (TMDB genre for movies, MAL genre for anime)
        #[arg(long)]
        genre: Option<u32>,

        /// Mood label attached to movie suggestions
        #[arg(long)]
        mood: Option<String>,

        /// Age rating filter (anime only): g, pg, pg13, r17
        #[arg(long)]
        rating: Option<AgeRating>,

        /// Minimum score, 0-10
        #[arg(long)]
        min_score: Option<f32>,

        /// Add the suggestion to favorites
        #[arg(long)]
        favorite: bool,
    },

    /// List saved favorites
    Favorites,

    /// Remove all saved favorites
    ClearFavorites,

    /// Wipe all stored data (favorites and any cached state)
    Reset,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Movie,
    Anime,
}

impl From<Kind> for ContentKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Movie => ContentKind::Movie,
            Kind::Anime => ContentKind::Anime,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("failed to load config")?,
    };
    debug!(
        tmdb_base_url = config.tmdb.base_url,
        jikan_base_url = config.jikan.base_url,
        "configuration loaded"
    );

    let favorites_path = config.favorites_path();
    info!(path = %favorites_path.display(), "opening favorites");
    let favorites = FavoritesStore::open(favorites_path);
    let session = Session::new(
        TmdbClient::with_base_url(config.tmdb.api_key.clone(), config.tmdb.base_url.clone()),
        JikanClient::with_base_url(config.jikan.base_url.clone()),
        favorites,
    );

    match args.command {
        Command::Suggest {
            kind,
            genre,
            mood,
            rating,
            min_score,
            favorite,
        } => {
            let mut filters = FilterSet::new(kind.into());
            filters.genre = genre;
            filters.mood = mood;
            filters.age_rating = rating;
            filters.min_score = min_score;

            match session.get_recommendation(&filters).await {
                Ok(rec) => {
                    print_recommendation(&rec);
                    if favorite {
                        session.toggle_favorite(&rec).await;
                        println!("Added to favorites.");
                    }
                }
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }

        Command::Favorites => {
            let favorites = session.favorites().await;
            if favorites.is_empty() {
                println!("No favorites yet.");
            }
            for entry in favorites {
                println!("{}  {}  ({:.1})", entry.kind, entry.title, entry.rating);
            }
        }

        Command::ClearFavorites => {
            session.clear_favorites().await;
            println!("Favorites cleared.");
        }

        Command::Reset => {
            session.reset_all().await;
            println!("All data cleared.");
        }
    }

    Ok(())
}

fn print_recommendation(rec: &Recommendation) {
    match rec {
        Recommendation::Movie(m) => {
            println!("{}", m.title);
            if let Some(year) = &m.year {
                println!("Year: {year}");
            }
            println!("Genre: {}  Mood: {}", m.genre, m.mood);
            println!("Rating: {:.1}", m.rating);
            if m.hidden_gem {
                println!("Hidden gem!");
            }
            if let Some(plot) = &m.plot {
                println!("\n{plot}");
            }
            if let Some(poster) = &m.poster {
                println!("\nPoster: {poster}");
            }
        }
        Recommendation::Anime(a) => {
            println!("{}", a.title);
            if let Some(score) = a.score {
                println!("Score: {score:.1}");
            }
            if let Some(episodes) = a.episodes {
                println!("Episodes: {episodes}");
            }
            if !a.genres.is_empty() {
                println!("Genres: {}", a.genres.join(", "));
            }
            if let Some(rating) = &a.age_rating {
                println!("Rated: {rating}");
            }
            if let Some(synopsis) = &a.synopsis {
                println!("\n{synopsis}");
            }
            println!("\n{}", a.url);
        }
    }
}
