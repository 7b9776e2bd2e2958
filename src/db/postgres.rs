use async_trait::async_trait;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool, Postgres, Transaction,
};

use crate::{
    db::MovieStore,
    error::AppResult,
    models::{Customer, Movie, NewCustomer, Plan},
};

/// Column list shared by every query that yields a `Movie`
macro_rules! movie_columns {
    () => {
        "m.movieid, m.originaltitle, \
         COALESCE(m.startyear, 0)::int4 AS startyear, \
         COALESCE(m.averagerating, 0)::float8 AS averagerating, \
         COALESCE(m.numvotes, 0)::int4 AS numvotes"
    };
}

/// Column list shared by every query that yields a `Customer`
macro_rules! customer_columns {
    () => {
        "c.customerid, c.email, c.firstname, c.lastname, c.sessioncount, c.planid"
    };
}

const FIND_CUSTOMER_BY_EMAIL: &str = concat!(
    "SELECT ",
    customer_columns!(),
    " FROM customers c WHERE c.email = $1"
);

const FIND_CUSTOMERS_BY_CREDENTIALS: &str = concat!(
    "SELECT ",
    customer_columns!(),
    " FROM customers c WHERE c.email = $1 AND c.password = $2 FOR UPDATE"
);

const INSERT_CUSTOMER: &str = r#"
    INSERT INTO customers AS c (email, password, firstname, lastname, sessioncount, planid)
    VALUES ($1, $2, $3, $4, 0, $5)
    RETURNING c.customerid, c.email, c.firstname, c.lastname, c.sessioncount, c.planid
"#;

const SEARCH_MOVIES: &str = concat!(
    "SELECT ",
    movie_columns!(),
    r" FROM movies m WHERE m.originaltitle ILIKE $1 ESCAPE '\' ORDER BY m.movieid"
);

const TOP_UNWATCHED_IN_GENRE: &str = concat!(
    "SELECT ",
    movie_columns!(),
    " FROM movies m JOIN genres g ON g.movieid = m.movieid \
     WHERE g.genre = $2 \
       AND m.movieid NOT IN (SELECT w.movieid FROM watched w WHERE w.customerid = $1) \
     ORDER BY m.numvotes DESC NULLS LAST, m.movieid \
     LIMIT 1"
);

const RECENT_POPULAR_UNWATCHED: &str = concat!(
    "SELECT ",
    movie_columns!(),
    " FROM movies m \
     WHERE m.startyear >= $2 \
       AND m.movieid NOT IN (SELECT w.movieid FROM watched w WHERE w.customerid = $1) \
     ORDER BY m.numvotes DESC NULLS LAST, m.averagerating DESC NULLS LAST, m.movieid \
     LIMIT $3"
);

const UNWATCHED_ABOVE_VOTES: &str = concat!(
    "SELECT ",
    movie_columns!(),
    " FROM movies m \
     WHERE m.numvotes > $2 \
       AND m.movieid NOT IN (SELECT w.movieid FROM watched w WHERE w.customerid = $1) \
     ORDER BY m.numvotes DESC, m.movieid \
     LIMIT $3"
);

/// Creates the PostgreSQL connection pool
///
/// The vault serves one terminal session, so the pool holds a single
/// connection that every command shares.
pub async fn create_pool(options: PgConnectOptions) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Creates the vault tables when they are missing
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database schema is up to date");
    Ok(())
}

/// Escapes LIKE wildcards so `text` is matched as a literal substring
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// `MovieStore` backed by PostgreSQL
pub struct PgStore {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, tx: None }
    }

    /// Returns the open transaction, beginning one if needed
    async fn tx(&mut self) -> AppResult<&mut Transaction<'static, Postgres>> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => {
                tracing::trace!("Beginning transaction");
                self.pool.begin().await?
            }
        };
        Ok(self.tx.insert(tx))
    }
}

#[async_trait]
impl MovieStore for PgStore {
    async fn find_customer_by_email(&mut self, email: &str) -> AppResult<Option<Customer>> {
        let tx = self.tx().await?;
        let customer = sqlx::query_as::<_, Customer>(FIND_CUSTOMER_BY_EMAIL)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(customer)
    }

    async fn find_customers_by_credentials(
        &mut self,
        email: &str,
        password: &str,
    ) -> AppResult<Vec<Customer>> {
        let tx = self.tx().await?;
        let customers = sqlx::query_as::<_, Customer>(FIND_CUSTOMERS_BY_CREDENTIALS)
            .bind(email)
            .bind(password)
            .fetch_all(&mut **tx)
            .await?;
        Ok(customers)
    }

    async fn insert_customer(&mut self, customer: NewCustomer) -> AppResult<Customer> {
        let tx = self.tx().await?;
        let inserted = sqlx::query_as::<_, Customer>(INSERT_CUSTOMER)
            .bind(customer.email)
            .bind(customer.password)
            .bind(customer.first_name)
            .bind(customer.last_name)
            .bind(customer.plan_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(inserted)
    }

    async fn increment_session_count(&mut self, customer_id: i32) -> AppResult<i32> {
        let tx = self.tx().await?;
        let count = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE customers
            SET sessioncount = sessioncount + 1
            WHERE customerid = $1
            RETURNING sessioncount
            "#,
        )
        .bind(customer_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(count)
    }

    async fn decrement_session_count(&mut self, customer_id: i32) -> AppResult<i32> {
        let tx = self.tx().await?;
        let count = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE customers
            SET sessioncount = GREATEST(sessioncount - 1, 0)
            WHERE customerid = $1
            RETURNING sessioncount
            "#,
        )
        .bind(customer_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(count)
    }

    async fn update_customer_plan(&mut self, customer_id: i32, plan_id: i32) -> AppResult<()> {
        let tx = self.tx().await?;
        sqlx::query("UPDATE customers SET planid = $1 WHERE customerid = $2")
            .bind(plan_id)
            .bind(customer_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn list_plans(&mut self) -> AppResult<Vec<Plan>> {
        let tx = self.tx().await?;
        let plans = sqlx::query_as::<_, Plan>(
            "SELECT planid, name, resolution, maxsessions, fee FROM plans ORDER BY planid",
        )
        .fetch_all(&mut **tx)
        .await?;
        Ok(plans)
    }

    async fn find_plan(&mut self, plan_id: i32) -> AppResult<Option<Plan>> {
        let tx = self.tx().await?;
        let plan = sqlx::query_as::<_, Plan>(
            "SELECT planid, name, resolution, maxsessions, fee FROM plans WHERE planid = $1",
        )
        .bind(plan_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(plan)
    }

    async fn movie_exists(&mut self, movie_id: &str) -> AppResult<bool> {
        let tx = self.tx().await?;
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM movies WHERE movieid = $1)",
        )
        .bind(movie_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(exists)
    }

    async fn has_watched(&mut self, customer_id: i32, movie_id: &str) -> AppResult<bool> {
        let tx = self.tx().await?;
        let watched = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM watched WHERE customerid = $1 AND movieid = $2)",
        )
        .bind(customer_id)
        .bind(movie_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(watched)
    }

    async fn insert_watched(&mut self, customer_id: i32, movie_id: &str) -> AppResult<()> {
        let tx = self.tx().await?;
        sqlx::query("INSERT INTO watched (customerid, movieid) VALUES ($1, $2)")
            .bind(customer_id)
            .bind(movie_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn search_movies(&mut self, text: &str) -> AppResult<Vec<Movie>> {
        let pattern = contains_pattern(text);
        let tx = self.tx().await?;
        let movies = sqlx::query_as::<_, Movie>(SEARCH_MOVIES)
            .bind(pattern)
            .fetch_all(&mut **tx)
            .await?;
        Ok(movies)
    }

    async fn watched_genres(&mut self, customer_id: i32) -> AppResult<Vec<String>> {
        let tx = self.tx().await?;
        let genres = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT g.genre
            FROM watched w
            JOIN genres g ON g.movieid = w.movieid
            WHERE w.customerid = $1
            ORDER BY g.genre
            "#,
        )
        .bind(customer_id)
        .fetch_all(&mut **tx)
        .await?;
        Ok(genres)
    }

    async fn top_unwatched_in_genre(
        &mut self,
        customer_id: i32,
        genre: &str,
    ) -> AppResult<Option<Movie>> {
        let tx = self.tx().await?;
        let movie = sqlx::query_as::<_, Movie>(TOP_UNWATCHED_IN_GENRE)
            .bind(customer_id)
            .bind(genre)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(movie)
    }

    async fn recent_popular_unwatched(
        &mut self,
        customer_id: i32,
        min_year: i32,
        limit: i64,
    ) -> AppResult<Vec<Movie>> {
        let tx = self.tx().await?;
        let movies = sqlx::query_as::<_, Movie>(RECENT_POPULAR_UNWATCHED)
            .bind(customer_id)
            .bind(min_year)
            .bind(limit)
            .fetch_all(&mut **tx)
            .await?;
        Ok(movies)
    }

    async fn average_watched_votes(&mut self, customer_id: i32) -> AppResult<Option<f64>> {
        let tx = self.tx().await?;
        let average = sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT AVG(m.numvotes)::float8
            FROM watched w
            JOIN movies m ON m.movieid = w.movieid
            WHERE w.customerid = $1
            "#,
        )
        .bind(customer_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(average)
    }

    async fn unwatched_above_votes(
        &mut self,
        customer_id: i32,
        threshold: f64,
        limit: i64,
    ) -> AppResult<Vec<Movie>> {
        let tx = self.tx().await?;
        let movies = sqlx::query_as::<_, Movie>(UNWATCHED_ABOVE_VOTES)
            .bind(customer_id)
            .bind(threshold)
            .bind(limit)
            .fetch_all(&mut **tx)
            .await?;
        Ok(movies)
    }

    async fn commit(&mut self) -> AppResult<()> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
            tracing::trace!("Transaction committed");
        }
        Ok(())
    }

    async fn rollback(&mut self) -> AppResult<()> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
            tracing::debug!("Transaction rolled back");
        }
        Ok(())
    }
}
