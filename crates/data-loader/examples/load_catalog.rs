use data_loader::load_catalog;
use std::path::Path;
use std::time::Instant;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let path = Path::new("data/movies.csv");

    println!("Loading movie catalog...\n");

    let start = Instant::now();
    let movies = load_catalog(path).expect("Failed to load catalog");
    let elapsed = start.elapsed();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", movies.len());
    println!("\nPerformance: {:.0} movies/second",
             movies.len() as f64 / elapsed.as_secs_f64());
}
