//! Business operations of the vault
//!
//! Every public operation runs as one transaction: `settle` commits when the
//! operation succeeds and rolls back everything it issued when it fails.

use crate::{db::MovieStore, error::AppResult};

pub mod recommendations;
pub mod search;
pub mod session;
pub mod subscription;
pub mod watch;

pub use recommendations::suggest_movies;
pub use search::search_for_movies;
pub use session::{quit, sign_in, sign_out, sign_up};
pub use subscription::{show_plans, show_subscription, subscribe};
pub use watch::watch;

/// Ends the transaction of one operation according to its outcome
///
/// Rejections are expected and only logged at debug level. Transient failures
/// are logged with their cause, which the user never sees.
async fn settle<S, T>(store: &mut S, operation: &'static str, outcome: AppResult<T>) -> AppResult<T>
where
    S: MovieStore + ?Sized,
{
    match outcome {
        Ok(value) => {
            store.commit().await.map_err(|e| {
                tracing::error!(operation, error = %e, "Commit failed");
                e
            })?;
            Ok(value)
        }
        Err(err) => {
            if err.is_transient() {
                tracing::error!(operation, error = %err, "Operation failed, rolling back");
            } else {
                tracing::debug!(operation, reason = %err, "Operation rejected, rolling back");
            }

            if let Err(rollback_err) = store.rollback().await {
                tracing::error!(operation, error = %rollback_err, "Rollback failed");
            }

            Err(err)
        }
    }
}
