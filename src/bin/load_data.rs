//! Bulk CSV loader for seeding the Critica database.
//!
//! Reads the fixture files from a data directory and inserts them in
//! dependency order (users and reference data first, then titles, reviews
//! and comments). Existing rows with the same id are skipped, so the loader
//! can be re-run safely. Pass `--truncate` to wipe the tables first.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use critica_server::config::AppConfig;

#[derive(Parser)]
#[command(name = "load_data", about = "Seed the Critica database from CSV files")]
struct Args {
    /// Directory containing the CSV fixture files
    #[arg(long, default_value = "static/data")]
    data_dir: PathBuf,

    /// Erase all existing rows before loading
    #[arg(long)]
    truncate: bool,
}

#[derive(Deserialize)]
struct UserRow {
    id: i32,
    username: String,
    email: String,
    role: String,
    bio: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Deserialize)]
struct TaggedRow {
    id: i32,
    name: String,
    slug: String,
}

#[derive(Deserialize)]
struct TitleRow {
    id: i32,
    name: String,
    year: i32,
    category: i32,
}

#[derive(Deserialize)]
struct ReviewRow {
    id: i32,
    title_id: i32,
    text: String,
    author: i32,
    score: i16,
    pub_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize)]
struct CommentRow {
    id: i32,
    review_id: i32,
    text: String,
    author: i32,
    pub_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize)]
struct GenreTitleRow {
    #[allow(dead_code)]
    id: i32,
    title_id: i32,
    genre_id: i32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("load_data={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    if args.truncate {
        sqlx::query(
            "TRUNCATE comments, reviews, title_genres, titles, genres, categories, users \
             RESTART IDENTITY CASCADE",
        )
        .execute(&pool)
        .await?;
        tracing::info!("All existing records were erased");
    }

    load_users(&pool, &args.data_dir.join("users.csv")).await?;
    load_tagged(&pool, &args.data_dir.join("category.csv"), "categories").await?;
    load_tagged(&pool, &args.data_dir.join("genre.csv"), "genres").await?;
    load_titles(&pool, &args.data_dir.join("titles.csv")).await?;
    load_genre_titles(&pool, &args.data_dir.join("genre_title.csv")).await?;
    load_reviews(&pool, &args.data_dir.join("review.csv")).await?;
    load_comments(&pool, &args.data_dir.join("comments.csv")).await?;

    reset_sequences(&pool).await?;

    tracing::info!("Data load complete");
    Ok(())
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> anyhow::Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| anyhow::anyhow!("cannot open {}: {}", path.display(), e))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!("skipping malformed row in {}: {}", path.display(), e),
        }
    }
    Ok(rows)
}

async fn load_users(pool: &PgPool, path: &Path) -> anyhow::Result<()> {
    let rows: Vec<UserRow> = read_rows(path)?;
    let mut success = 0u64;
    let mut failed = 0u64;
    for row in rows {
        let result = sqlx::query(
            "INSERT INTO users (id, username, email, role, bio, first_name, last_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (id) DO NOTHING",
        )
        .bind(row.id)
        .bind(&row.username)
        .bind(&row.email)
        .bind(&row.role)
        .bind(&row.bio)
        .bind(&row.first_name)
        .bind(&row.last_name)
        .execute(pool)
        .await;
        match result {
            Ok(r) => success += r.rows_affected(),
            Err(e) => {
                failed += 1;
                tracing::warn!("user {} failed: {}", row.username, e);
            }
        }
    }
    tracing::info!("users: inserted {}, failed {}", success, failed);
    Ok(())
}

async fn load_tagged(pool: &PgPool, path: &Path, table: &str) -> anyhow::Result<()> {
    let rows: Vec<TaggedRow> = read_rows(path)?;
    let mut success = 0u64;
    let mut failed = 0u64;
    let query = format!(
        "INSERT INTO {} (id, name, slug) VALUES ($1, $2, $3) ON CONFLICT (id) DO NOTHING",
        table
    );
    for row in rows {
        let result = sqlx::query(&query)
            .bind(row.id)
            .bind(&row.name)
            .bind(&row.slug)
            .execute(pool)
            .await;
        match result {
            Ok(r) => success += r.rows_affected(),
            Err(e) => {
                failed += 1;
                tracing::warn!("{} {} failed: {}", table, row.slug, e);
            }
        }
    }
    tracing::info!("{}: inserted {}, failed {}", table, success, failed);
    Ok(())
}

async fn load_titles(pool: &PgPool, path: &Path) -> anyhow::Result<()> {
    let rows: Vec<TitleRow> = read_rows(path)?;
    let mut success = 0u64;
    let mut failed = 0u64;
    for row in rows {
        let result = sqlx::query(
            "INSERT INTO titles (id, name, year, category_id) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (id) DO NOTHING",
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(row.year)
        .bind(row.category)
        .execute(pool)
        .await;
        match result {
            Ok(r) => success += r.rows_affected(),
            Err(e) => {
                failed += 1;
                tracing::warn!("title {} failed: {}", row.id, e);
            }
        }
    }
    tracing::info!("titles: inserted {}, failed {}", success, failed);
    Ok(())
}

async fn load_genre_titles(pool: &PgPool, path: &Path) -> anyhow::Result<()> {
    let rows: Vec<GenreTitleRow> = read_rows(path)?;
    let mut success = 0u64;
    let mut failed = 0u64;
    for row in rows {
        let result = sqlx::query(
            "INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(row.title_id)
        .bind(row.genre_id)
        .execute(pool)
        .await;
        match result {
            Ok(r) => success += r.rows_affected(),
            Err(e) => {
                failed += 1;
                tracing::warn!("title_genre ({}, {}) failed: {}", row.title_id, row.genre_id, e);
            }
        }
    }
    tracing::info!("title_genres: inserted {}, failed {}", success, failed);
    Ok(())
}

async fn load_reviews(pool: &PgPool, path: &Path) -> anyhow::Result<()> {
    let rows: Vec<ReviewRow> = read_rows(path)?;
    let mut success = 0u64;
    let mut failed = 0u64;
    for row in rows {
        let result = sqlx::query(
            "INSERT INTO reviews (id, title_id, author_id, text, score, pub_date) \
             VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (id) DO NOTHING",
        )
        .bind(row.id)
        .bind(row.title_id)
        .bind(row.author)
        .bind(&row.text)
        .bind(row.score)
        .bind(row.pub_date)
        .execute(pool)
        .await;
        match result {
            Ok(r) => success += r.rows_affected(),
            Err(e) => {
                failed += 1;
                tracing::warn!("review {} failed: {}", row.id, e);
            }
        }
    }
    tracing::info!("reviews: inserted {}, failed {}", success, failed);
    Ok(())
}

async fn load_comments(pool: &PgPool, path: &Path) -> anyhow::Result<()> {
    let rows: Vec<CommentRow> = read_rows(path)?;
    let mut success = 0u64;
    let mut failed = 0u64;
    for row in rows {
        let result = sqlx::query(
            "INSERT INTO comments (id, review_id, author_id, text, pub_date) \
             VALUES ($1, $2, $3, $4, $5) ON CONFLICT (id) DO NOTHING",
        )
        .bind(row.id)
        .bind(row.review_id)
        .bind(row.author)
        .bind(&row.text)
        .bind(row.pub_date)
        .execute(pool)
        .await;
        match result {
            Ok(r) => success += r.rows_affected(),
            Err(e) => {
                failed += 1;
                tracing::warn!("comment {} failed: {}", row.id, e);
            }
        }
    }
    tracing::info!("comments: inserted {}, failed {}", success, failed);
    Ok(())
}

/// Explicit ids bypass the serial sequences, so bump them past the loaded
/// maximum or the next API insert would collide.
async fn reset_sequences(pool: &PgPool) -> anyhow::Result<()> {
    for table in ["users", "categories", "genres", "titles", "reviews", "comments"] {
        let query = format!(
            "SELECT setval(pg_get_serial_sequence('{0}', 'id'), \
             COALESCE((SELECT MAX(id) FROM {0}), 0) + 1, false)",
            table
        );
        sqlx::query(&query).execute(pool).await?;
    }
    Ok(())
}
