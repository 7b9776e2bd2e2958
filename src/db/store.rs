use crate::{
    error::AppResult,
    models::{Customer, Movie, NewCustomer, Plan},
};

/// Data access for the movie vault
///
/// A store is one unit of work over a single connection. The first statement
/// after construction, `commit` or `rollback` opens a transaction that stays
/// open until the next `commit` or `rollback`, so every write issued by one
/// operation lands or disappears together.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieStore: Send {
    /// Looks up the customer registered under `email`
    async fn find_customer_by_email(&mut self, email: &str) -> AppResult<Option<Customer>>;

    /// Returns every customer whose email and password both match
    ///
    /// Matching rows stay locked until the transaction ends.
    async fn find_customers_by_credentials(
        &mut self,
        email: &str,
        password: &str,
    ) -> AppResult<Vec<Customer>>;

    /// Inserts a customer with no open sessions
    async fn insert_customer(&mut self, customer: NewCustomer) -> AppResult<Customer>;

    /// Adds one session and returns the new count
    async fn increment_session_count(&mut self, customer_id: i32) -> AppResult<i32>;

    /// Removes one session, never going below zero, and returns the new count
    async fn decrement_session_count(&mut self, customer_id: i32) -> AppResult<i32>;

    async fn update_customer_plan(&mut self, customer_id: i32, plan_id: i32) -> AppResult<()>;

    /// All plans in ascending plan id order
    async fn list_plans(&mut self) -> AppResult<Vec<Plan>>;

    async fn find_plan(&mut self, plan_id: i32) -> AppResult<Option<Plan>>;

    async fn movie_exists(&mut self, movie_id: &str) -> AppResult<bool>;

    async fn has_watched(&mut self, customer_id: i32, movie_id: &str) -> AppResult<bool>;

    async fn insert_watched(&mut self, customer_id: i32, movie_id: &str) -> AppResult<()>;

    /// Movies whose title contains `text`, ignoring case, by ascending movie id
    ///
    /// `text` is matched literally; wildcard characters carry no meaning.
    async fn search_movies(&mut self, text: &str) -> AppResult<Vec<Movie>>;

    /// Distinct genres of the movies the customer watched
    async fn watched_genres(&mut self, customer_id: i32) -> AppResult<Vec<String>>;

    /// The unwatched movie with the most votes in `genre`
    async fn top_unwatched_in_genre(
        &mut self,
        customer_id: i32,
        genre: &str,
    ) -> AppResult<Option<Movie>>;

    /// Unwatched movies released in or after `min_year`, by votes then rating, both descending
    async fn recent_popular_unwatched(
        &mut self,
        customer_id: i32,
        min_year: i32,
        limit: i64,
    ) -> AppResult<Vec<Movie>>;

    /// Mean vote count over the customer's watched movies, `None` without history
    async fn average_watched_votes(&mut self, customer_id: i32) -> AppResult<Option<f64>>;

    /// Unwatched movies with strictly more than `threshold` votes, by votes descending
    async fn unwatched_above_votes(
        &mut self,
        customer_id: i32,
        threshold: f64,
        limit: i64,
    ) -> AppResult<Vec<Movie>>;

    /// Makes every statement since the last commit or rollback permanent
    async fn commit(&mut self) -> AppResult<()>;

    /// Discards every statement since the last commit or rollback
    async fn rollback(&mut self) -> AppResult<()>;
}
