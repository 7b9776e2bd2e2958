use crate::{
    db::MovieStore,
    error::AppResult,
    models::{Customer, MovieMatch},
};

use super::settle;

/// Finds movies whose title contains `search_text`, ignoring case
///
/// Results are ordered by movie id and flagged with whether this customer
/// has watched them.
pub async fn search_for_movies<S>(
    store: &mut S,
    customer: &Customer,
    search_text: &str,
) -> AppResult<Vec<MovieMatch>>
where
    S: MovieStore + ?Sized,
{
    let outcome = annotated_search(store, customer, search_text).await;
    settle(store, "search_for_movies", outcome).await
}

async fn annotated_search<S>(
    store: &mut S,
    customer: &Customer,
    search_text: &str,
) -> AppResult<Vec<MovieMatch>>
where
    S: MovieStore + ?Sized,
{
    let movies = store.search_movies(search_text).await?;

    let mut matches = Vec::with_capacity(movies.len());
    for movie in movies {
        let watched = store.has_watched(customer.customer_id, &movie.movie_id).await?;
        matches.push(MovieMatch { movie, watched });
    }

    tracing::debug!(
        customer_id = customer.customer_id,
        search_text = %search_text,
        results = matches.len(),
        "Movie search completed"
    );

    Ok(matches)
}
