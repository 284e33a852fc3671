use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Vec<String>,
}

#[derive(Deserialize)]
pub struct CreateMovie {
    pub title: String,
    pub year: Option<i32>,
    pub genres: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
    pub description: Option<String>,
    pub director: Option<String>,
    pub cast: Option<Vec<String>>,
}

#[derive(Deserialize, Default)]
pub struct ListParams {
    pub q: Option<String>,
    pub genre: Option<String>,
}

impl ListParams {
    fn matches(&self, movie: &Movie) -> bool {
        let title_ok = match non_blank(&self.q) {
            Some(q) => contains_ci(&movie.title, q),
            None => true,
        };
        let genre_ok = match non_blank(&self.genre) {
            Some(g) => movie.genres.iter().any(|mg| contains_ci(mg, g)),
            None => true,
        };
        title_ok && genre_ok
    }
}

/// Insertion-ordered, so list responses are deterministic.
pub type Db = Arc<RwLock<Vec<Movie>>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

/// Router pre-seeded with `movies`.
pub fn app_with(movies: Vec<Movie>) -> Router {
    let db: Db = Arc::new(RwLock::new(movies));
    Router::new()
        .route("/api/movies", get(list_movies).post(create_movie))
        .route("/api/movies/{id}", delete(delete_movie))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_movies(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Movie>> {
    let movies = db.read().await;
    Json(movies.iter().filter(|m| params.matches(m)).cloned().collect())
}

async fn create_movie(
    State(db): State<Db>,
    Json(input): Json<CreateMovie>,
) -> Result<(StatusCode, Json<Movie>), (StatusCode, String)> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "title is required".to_string()));
    }
    let movie = Movie {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        year: input.year,
        genres: input.genres.unwrap_or_default(),
        rating: input.rating,
        poster_url: input.poster_url,
        description: input.description,
        director: input.director,
        cast: input.cast.unwrap_or_default(),
    };
    debug!(id = %movie.id, title = %movie.title, "stored movie");
    db.write().await.push(movie.clone());
    Ok((StatusCode::CREATED, Json(movie)))
}

async fn delete_movie(State(db): State<Db>, Path(id): Path<String>) -> StatusCode {
    let mut movies = db.write().await;
    match movies.iter().position(|m| m.id == id) {
        Some(idx) => {
            movies.remove(idx);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
