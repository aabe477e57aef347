mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Movie, MovieId, SearchQuery, load_catalog, sample_movies, search_movies};
use rand::SeedableRng;
use rand::rngs::StdRng;
use recommender::{Metric, Recommendation, Recommender, RecommenderConfig};
use session::{MAX_SEARCH_RESULTS, MenuState, Outcome, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// Genre-based movie recommendations
#[derive(Parser)]
#[command(name = "genre-recs")]
#[command(about = "Recommend movies by genre similarity to the ones you pick", long_about = None)]
struct Cli {
    /// Path to the movies.csv catalog (movieId,title,genres)
    #[arg(short, long, default_value = "data/movies.csv")]
    data_file: PathBuf,

    /// Number of recommendations to show
    #[arg(short, long, default_value = "10")]
    k: usize,

    /// Distance metric for the neighbour search (cosine or euclidean)
    #[arg(long, default_value_t = Metric::Cosine)]
    metric: Metric,

    /// Leave already-selected movies out of the recommendations
    #[arg(long)]
    exclude_selected: bool,

    /// Seed for the random browse suggestions
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Menu-driven session: browse, search, select, get recommendations (default)
    Interactive,

    /// Recommend movies for a fixed selection
    Recommend {
        /// Comma-separated movie ids, e.g. 1,3114,2355
        #[arg(long, value_delimiter = ',', required = true)]
        select: Vec<MovieId>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Show the genre profile the recommendations were computed from
        #[arg(long)]
        explain: bool,
    },

    /// Search for movies by title, or by year when the query is a number
    Search {
        /// Title fragment (case-insensitive) or a year
        #[arg(long)]
        query: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show random movies from the catalog
    Browse {
        /// How many movies to show
        #[arg(long, default_value = "10")]
        count: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing; logs go to stderr so they never mix with menu output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = RecommenderConfig::default()
        .with_k(cli.k)
        .with_metric(cli.metric)
        .with_exclude_selected(cli.exclude_selected);

    // Load and encode the catalog before serving anything
    let start = Instant::now();
    let movies = load_catalog(&cli.data_file)
        .with_context(|| format!("Failed to load catalog from {}", cli.data_file.display()))?;
    let recommender =
        Recommender::build(movies, config).context("Failed to build recommender")?;
    debug!("Catalog ready in {:?}", start.elapsed());

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // Dispatch to appropriate command handler
    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => handle_interactive(&recommender, &mut rng)?,
        Commands::Recommend {
            select,
            json,
            explain,
        } => handle_recommend(&recommender, &select, json, explain)?,
        Commands::Search { query, json } => handle_search(&recommender, &query, json)?,
        Commands::Browse { count } => handle_browse(&recommender, count, &mut rng),
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    recommender: &Recommender,
    selection: &[MovieId],
    json: bool,
    explain: bool,
) -> Result<()> {
    let recommendations = recommender.recommend_default(selection)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    if explain {
        let query = recommender.query_vector(selection)?;
        print_profile(recommender, &query);
    }
    print_recommendations(&recommendations, explain);
    Ok(())
}

/// Handle the 'search' command
fn handle_search(recommender: &Recommender, raw_query: &str, json: bool) -> Result<()> {
    let query = SearchQuery::parse(raw_query)
        .context("Search query must not be empty")?;
    let results = search_movies(recommender.index().items(), &query);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results found.");
    } else {
        println!("{}", format!("Search results for {}:", query).bold().blue());
        print_movies(results.iter().take(MAX_SEARCH_RESULTS).copied());
    }
    Ok(())
}

/// Handle the 'browse' command
fn handle_browse(recommender: &Recommender, count: usize, rng: &mut StdRng) {
    println!("{}", format!("Here are {} random movie suggestions:", count).bold().blue());
    print_movies(sample_movies(recommender.index().items(), count, rng));
}

/// Run the menu loop until the user exits or stdin closes
fn handle_interactive(recommender: &Recommender, rng: &mut StdRng) -> Result<()> {
    println!("\n{}", "Welcome to the movie recommendation engine.".bold());
    println!("\nHere are 10 random movie suggestions:");
    print_movies(sample_movies(recommender.index().items(), 10, rng));

    let mut session = Session::new();
    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        match session.state() {
            MenuState::Browsing => {
                if let Some(result) = session.recommendations(recommender) {
                    match result {
                        Ok(recommendations) => {
                            println!("\nHere are some recommended movies based on your selection:");
                            print_recommendations(&recommendations, false);
                        }
                        Err(e) => println!("{}", e.to_string().red()),
                    }
                }
                println!("\nChoose an option:");
                println!("1. Select a movie by movieId from suggestions");
                println!("2. Search for a movie by title or year");
                println!("3. Exit");
                prompt("Enter your choice (1/2/3): ")?;
            }
            MenuState::Searching => prompt("Enter a movie title or year: ")?,
            MenuState::Confirming => {
                prompt("Enter the movieId of the movie you'd like to select (blank for menu): ")?
            }
            MenuState::Done => break,
        }

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            // EOF
            println!();
            break;
        }

        match session.step(&input, recommender) {
            Ok(Outcome::SearchResults(results)) => print_movies(results),
            Ok(Outcome::Selected(movie)) => {
                println!("{} Added {} to your selections!", "✓".green(), movie.title);
            }
            Ok(Outcome::Exit) => {
                println!("Exiting movie recommendation system. Goodbye!");
            }
            Ok(Outcome::PromptMovieId | Outcome::PromptSearch | Outcome::BackToMenu) => {}
            Err(e) => println!("{}", e.to_string().red()),
        }
    }

    Ok(())
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    io::stdout().flush()?;
    Ok(())
}

/// Print the genre weights of a query vector, strongest first
fn print_profile(recommender: &Recommender, query: &[f32]) {
    println!("{}", "Your genre profile:".bold().blue());
    for (label, weight) in recommender.vocabulary().describe(query) {
        println!("{}{}: {:.2}", "• ".cyan(), label, weight);
    }
}

/// Helper function to format and print movies as a table
fn print_movies<'a>(movies: impl IntoIterator<Item = &'a Movie>) {
    println!("{:>8}  {:<60}  {}", "movieId".bold(), "title".bold(), "genres".bold());
    for movie in movies {
        println!("{:>8}  {:<60}  {}", movie.id, movie.title, movie.genres_label());
    }
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[Recommendation], explain: bool) {
    for (rank, rec) in recommendations.iter().enumerate() {
        let line = format!(
            "{}. [{}] {} ({})",
            (rank + 1).to_string().green(),
            rec.movie_id,
            rec.title,
            rec.genres.join("|"),
        );
        if explain {
            println!("{} - distance: {:.4}", line, rec.distance);
        } else {
            println!("{}", line);
        }
    }
}
