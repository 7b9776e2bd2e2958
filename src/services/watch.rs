use crate::{
    db::MovieStore,
    error::{AppResult, Rejection},
    models::Customer,
};

use super::settle;

/// Records that the customer watched each of `movie_ids`
///
/// The batch is all-or-nothing: one unknown id discards every pair staged
/// before it. Pairs already on record are skipped, as are repeats within
/// the batch. Returns how many new pairs were recorded.
pub async fn watch<S>(store: &mut S, customer: &Customer, movie_ids: &[String]) -> AppResult<usize>
where
    S: MovieStore + ?Sized,
{
    let outcome = record_batch(store, customer, movie_ids).await;
    settle(store, "watch", outcome).await
}

async fn record_batch<S>(store: &mut S, customer: &Customer, movie_ids: &[String]) -> AppResult<usize>
where
    S: MovieStore + ?Sized,
{
    let mut recorded = 0;

    for movie_id in movie_ids {
        if !store.movie_exists(movie_id).await? {
            tracing::info!(
                customer_id = customer.customer_id,
                movie_id = %movie_id,
                "Watch batch refused, unknown movie"
            );
            return Err(Rejection::UnknownMovie(movie_id.clone()).into());
        }

        if store.has_watched(customer.customer_id, movie_id).await? {
            continue;
        }

        store.insert_watched(customer.customer_id, movie_id).await?;
        recorded += 1;
    }

    tracing::info!(
        customer_id = customer.customer_id,
        requested = movie_ids.len(),
        recorded,
        "Watch history updated"
    );

    Ok(recorded)
}
