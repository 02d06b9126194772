use clap::Parser;
use log::error;

use vecino::{NeighborhoodService, UserId, DEFAULT_NEIGHBORS};

/// Builds the similarity index from a ratings CSV and prints the nearest
/// neighbors of the given users as JSON, one line per query.
#[derive(Parser)]
#[command(name = "vecino", version)]
struct Args {
    /// Path to a CSV with `userId` and `rating` columns
    ratings: std::path::PathBuf,

    /// User ids to query
    #[arg(required = true)]
    users: Vec<UserId>,

    /// Number of neighbors per query
    #[arg(short, long, default_value_t = DEFAULT_NEIGHBORS)]
    k: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let service = match NeighborhoodService::from_csv_path(&args.ratings) {
        Ok(service) => service,
        Err(err) => {
            error!("failed to build similarity index: {err}");
            std::process::exit(1);
        }
    };

    let mut failed = false;
    for user in args.users {
        match service.neighborhood(user, args.k) {
            Ok(payload) => match serde_json::to_string(&payload) {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    error!("failed to encode result for user {user}: {err}");
                    failed = true;
                }
            },
            Err(err) => {
                error!("query for user {user} failed: {err}");
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
