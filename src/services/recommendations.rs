use std::collections::BTreeMap;

use crate::{
    db::MovieStore,
    error::AppResult,
    models::{Customer, Movie},
};

use super::settle;

/// Earliest release year considered recent
const RECENT_SINCE_YEAR: i32 = 2010;
/// Candidates taken from the recent-releases strategy
const RECENT_LIMIT: i64 = 10;
/// Candidates taken from the above-average-engagement strategy
const ENGAGEMENT_LIMIT: i64 = 10;

/// Generates personalized movie suggestions
///
/// Merges three strategies, none of which suggests a movie the customer
/// already watched:
/// 1. For each genre in the customer's history, the most-voted movie of that genre.
/// 2. The most-voted, then best-rated, releases since 2010.
/// 3. Movies with more votes than the customer's watched movies have on average.
///
/// A movie found by several strategies appears once. The result is ordered
/// by ascending movie id.
pub async fn suggest_movies<S>(store: &mut S, customer: &Customer) -> AppResult<Vec<Movie>>
where
    S: MovieStore + ?Sized,
{
    let outcome = collect_suggestions(store, customer).await;
    settle(store, "suggest_movies", outcome).await
}

async fn collect_suggestions<S>(store: &mut S, customer: &Customer) -> AppResult<Vec<Movie>>
where
    S: MovieStore + ?Sized,
{
    let by_genre = top_pick_per_genre(store, customer).await?;
    let recent = store
        .recent_popular_unwatched(customer.customer_id, RECENT_SINCE_YEAR, RECENT_LIMIT)
        .await?;
    let engaging = above_average_engagement(store, customer).await?;

    tracing::debug!(
        customer_id = customer.customer_id,
        by_genre = by_genre.len(),
        recent = recent.len(),
        engaging = engaging.len(),
        "Recommendation candidates collected"
    );

    Ok(merge_candidates([by_genre, recent, engaging]))
}

/// Strategy 1: one pick per watched genre
///
/// Genres where every movie has been watched contribute nothing.
async fn top_pick_per_genre<S>(store: &mut S, customer: &Customer) -> AppResult<Vec<Movie>>
where
    S: MovieStore + ?Sized,
{
    let genres = store.watched_genres(customer.customer_id).await?;

    let mut picks = Vec::with_capacity(genres.len());
    for genre in genres {
        match store
            .top_unwatched_in_genre(customer.customer_id, &genre)
            .await?
        {
            Some(movie) => picks.push(movie),
            None => tracing::debug!(genre = %genre, "No unwatched movie left in genre"),
        }
    }

    Ok(picks)
}

/// Strategy 3: movies more engaging than the customer's average
///
/// Without watch history there is no average to beat.
async fn above_average_engagement<S>(store: &mut S, customer: &Customer) -> AppResult<Vec<Movie>>
where
    S: MovieStore + ?Sized,
{
    let Some(average) = store.average_watched_votes(customer.customer_id).await? else {
        return Ok(Vec::new());
    };

    store
        .unwatched_above_votes(customer.customer_id, average, ENGAGEMENT_LIMIT)
        .await
}

/// Unions candidate lists keyed by movie id, ascending
fn merge_candidates<I>(strategies: I) -> Vec<Movie>
where
    I: IntoIterator<Item = Vec<Movie>>,
{
    let mut merged: BTreeMap<String, Movie> = BTreeMap::new();
    for movie in strategies.into_iter().flatten() {
        merged.entry(movie.movie_id.clone()).or_insert(movie);
    }
    merged.into_values().collect()
}
