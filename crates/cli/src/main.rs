use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use service::{DEFAULT_POPULAR_COUNT, RelationService};
use store::{Film, FilmId, Seed, User, UserId};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Filmorate - films, users, friendships and likes
#[derive(Parser)]
#[command(name = "filmorate")]
#[command(about = "Inspect an in-memory Filmorate store built from a seed file", long_about = None)]
struct Cli {
    /// JSON seed snapshot to load before running the command
    #[arg(short, long, global = true)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every film
    Films,

    /// List every user
    Users,

    /// Show the most liked films
    Popular {
        /// Number of films to return (at least 1)
        #[arg(long, default_value_t = DEFAULT_POPULAR_COUNT)]
        count: usize,
    },

    /// Show a user's friends
    Friends {
        #[arg(long)]
        user_id: UserId,
    },

    /// Show the friends two users have in common
    CommonFriends {
        #[arg(long)]
        user_id: UserId,

        #[arg(long)]
        other_id: UserId,
    },

    /// Show which users like a film
    Likes {
        #[arg(long)]
        film_id: FilmId,
    },

    /// Hammer the store with concurrent like/unlike traffic
    Stress {
        /// Number of operations to run
        #[arg(long, default_value = "10000")]
        requests: usize,

        /// Number of concurrent workers
        #[arg(long, default_value = "8")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let service = build_service(cli.seed.as_ref())?;

    match cli.command {
        Commands::Films => handle_films(&service),
        Commands::Users => handle_users(&service),
        Commands::Popular { count } => handle_popular(&service, count)?,
        Commands::Friends { user_id } => handle_friends(&service, user_id)?,
        Commands::CommonFriends { user_id, other_id } => {
            handle_common_friends(&service, user_id, other_id)?
        }
        Commands::Likes { film_id } => handle_likes(&service, film_id)?,
        Commands::Stress {
            requests,
            concurrent,
        } => handle_stress(service, requests, concurrent).await?,
    }

    Ok(())
}

/// Build the service and apply the seed, if one was given
fn build_service(seed_path: Option<&PathBuf>) -> Result<RelationService> {
    let service = RelationService::in_memory();
    let Some(path) = seed_path else {
        info!("No seed given, starting with an empty store");
        return Ok(service);
    };

    let start = Instant::now();
    let seed = Seed::from_path(path)
        .with_context(|| format!("Failed to load seed {}", path.display()))?;
    let report = service
        .apply_seed(&seed)
        .context("Failed to apply seed")?;
    println!(
        "{} Seeded {} users and {} films in {:?}",
        "✓".green(),
        report.users,
        report.films,
        start.elapsed()
    );
    Ok(service)
}

fn handle_films(service: &RelationService) {
    let films = service.all_films();
    println!("{}", format!("Films ({}):", films.len()).bold().blue());
    for film in &films {
        print_film(service, film);
    }
}

fn handle_users(service: &RelationService) {
    let users = service.all_users();
    println!("{}", format!("Users ({}):", users.len()).bold().blue());
    for user in &users {
        print_user(user);
    }
}

fn handle_popular(service: &RelationService, count: usize) -> Result<()> {
    let films = service.popular_films(count)?;
    println!("{}", format!("Top {} films:", count).bold().blue());
    for (rank, film) in films.iter().enumerate() {
        print!("{} ", format!("{}.", rank + 1).green());
        print_film(service, film);
    }
    Ok(())
}

fn handle_friends(service: &RelationService, user_id: UserId) -> Result<()> {
    let user = service.user(user_id)?;
    let friends = service.friends(user_id)?;
    println!(
        "{}",
        format!("Friends of {} ({}):", user.name, friends.len()).bold().blue()
    );
    for friend in &friends {
        print_user(friend);
    }
    Ok(())
}

fn handle_common_friends(service: &RelationService, user_id: UserId, other_id: UserId) -> Result<()> {
    let common = service.common_friends(user_id, other_id)?;
    println!(
        "{}",
        format!("Common friends of {} and {}:", user_id, other_id).bold().blue()
    );
    if common.is_empty() {
        println!("  (none)");
    }
    for friend in &common {
        print_user(friend);
    }
    Ok(())
}

fn handle_likes(service: &RelationService, film_id: FilmId) -> Result<()> {
    let film = service.film(film_id)?;
    let likes = service.film_likes(film_id)?;
    println!(
        "{}",
        format!("{} is liked by {} users:", film.name, likes.len()).bold().blue()
    );
    for user_id in likes {
        if let Ok(user) = service.user(user_id) {
            print_user(&user);
        }
    }
    Ok(())
}

/// Handle the 'stress' command
async fn handle_stress(service: RelationService, requests: usize, concurrent: usize) -> Result<()> {
    let (user_count, film_count) = service.counts();
    if user_count == 0 || film_count == 0 {
        bail!("stress needs a seed with at least one user and one film");
    }
    let concurrent = concurrent.max(1);
    let per_worker = requests / concurrent;

    let user_ids: Vec<UserId> = service.all_users().iter().map(|u| u.id).collect();
    let film_ids: Vec<FilmId> = service.all_films().iter().map(|f| f.id).collect();

    let start = Instant::now();
    let mut handles = Vec::with_capacity(concurrent);
    for _ in 0..concurrent {
        let service = service.clone();
        let user_ids = user_ids.clone();
        let film_ids = film_ids.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let mut timings = Vec::with_capacity(per_worker);
            for _ in 0..per_worker {
                let user_id = user_ids[rand::random::<u32>() as usize % user_ids.len()];
                let film_id = film_ids[rand::random::<u32>() as usize % film_ids.len()];
                let op_start = Instant::now();
                if rand::random::<u8>() % 4 == 0 {
                    service.unlike_film(film_id, user_id)?;
                } else {
                    service.like_film(film_id, user_id)?;
                }
                timings.push(op_start.elapsed());
            }
            Ok::<_, anyhow::Error>(timings)
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for handle in handles {
        timings.extend(handle.await??);
    }
    let total_time = start.elapsed();

    // A film can never have more likes than there are users
    for film_id in &film_ids {
        let likes = service.film_likes(*film_id)?;
        if likes.len() > user_count {
            return Err(anyhow!("film {} has {} likes from {} users", film_id, likes.len(), user_count));
        }
    }

    if timings.is_empty() {
        println!("No operations were run");
        return Ok(());
    }
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p99 = timings[((timings.len() as f32 * 0.99) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f64 / total_time.as_secs_f64();

    println!("{}", "Stress results:".bold().blue());
    println!("Operations: {}", timings.len());
    println!("Total time: {:?}", total_time);
    println!("P50 latency: {:?}", p50);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} ops/second", throughput);

    handle_popular(&service, DEFAULT_POPULAR_COUNT.min(film_count))
}

fn print_film(service: &RelationService, film: &Film) {
    let likes = service.film_likes(film.id).map(|l| l.len()).unwrap_or(0);
    println!(
        "[{}] {} ({}) {} min - {} likes",
        film.id,
        film.name.bold(),
        film.release_date,
        film.duration,
        likes.to_string().cyan()
    );
}

fn print_user(user: &User) {
    println!(
        "{}[{}] {} <{}> login={} born {}",
        "• ".green(),
        user.id,
        user.name,
        user.email,
        user.login,
        user.birthday
    );
}
