#![allow(dead_code)]

use std::cmp::Ordering;

use async_trait::async_trait;
use movie_vault::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{Customer, Movie, NewCustomer, Plan},
};

#[derive(Debug, Clone)]
pub struct StoredCustomer {
    pub customer: Customer,
    pub password: String,
}

/// Rows of every vault table
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub customers: Vec<StoredCustomer>,
    pub plans: Vec<Plan>,
    pub movies: Vec<Movie>,
    pub genres: Vec<(String, String)>,
    pub watched: Vec<(i32, String)>,
}

impl Tables {
    fn has_watched(&self, customer_id: i32, movie_id: &str) -> bool {
        self.watched
            .iter()
            .any(|(c, m)| *c == customer_id && m == movie_id)
    }

    fn unwatched(&self, customer_id: i32) -> impl Iterator<Item = &Movie> + '_ {
        self.movies
            .iter()
            .filter(move |m| !self.has_watched(customer_id, &m.movie_id))
    }

    fn customer_mut(&mut self, customer_id: i32) -> AppResult<&mut StoredCustomer> {
        self.customers
            .iter_mut()
            .find(|c| c.customer.customer_id == customer_id)
            .ok_or(AppError::Database(sqlx::Error::RowNotFound))
    }
}

fn by_votes_desc(a: &Movie, b: &Movie) -> Ordering {
    b.num_votes
        .cmp(&a.num_votes)
        .then_with(|| a.movie_id.cmp(&b.movie_id))
}

/// In-memory `MovieStore` with the same transaction semantics as `PgStore`
///
/// Statements run against a staged copy of the committed tables; `commit`
/// publishes the copy and `rollback` throws it away.
#[derive(Debug, Default)]
pub struct MemoryStore {
    committed: Tables,
    staged: Option<Tables>,
    /// When set, every write fails like a lost connection
    pub fail_writes: bool,
    pub commits: usize,
    pub rollbacks: usize,
}

impl MemoryStore {
    /// Plans and a small movie catalogue, no customers
    pub fn seeded() -> Self {
        let plans = vec![
            plan(1, "Basic", "720P", 2, 30),
            plan(2, "Advanced", "1080P", 4, 50),
            plan(3, "Premium", "4K", 10, 90),
            plan(4, "Family", "1080P", 4, 45),
        ];

        let movies = vec![
            movie("tt0147505", "Sinbad: The Battle of the Dark Knights", 1998, 2.2, 149),
            movie("tt0468569", "The Dark Knight", 2008, 9.0, 2021237),
            movie("tt1345836", "The Dark Knight Rises", 2012, 8.4, 1362116),
            movie("tt4430982", "Batman: The Dark Knight Beyond", 0, 0.0, 0),
            movie("tt0111161", "The Shawshank Redemption", 1994, 9.3, 2400000),
            movie("tt1375666", "Inception", 2010, 8.8, 2100000),
            movie("tt0816692", "Interstellar", 2014, 8.6, 1700000),
            movie("tt2015381", "Guardians of the Galaxy", 2014, 8.0, 1100000),
            movie("tt4154796", "Avengers: Endgame", 2019, 8.4, 1100000),
            movie("tt0133093", "The Matrix", 1999, 8.7, 1800000),
            movie("tt6751668", "Parasite", 2019, 8.5, 800000),
            movie("tt9000001", "100% Wolf", 2020, 5.6, 3000),
            movie("tt9000002", "Pan_Am", 2011, 7.0, 20000),
        ];

        let genres = [
            ("tt0468569", "Action"),
            ("tt0468569", "Crime"),
            ("tt1345836", "Action"),
            ("tt0111161", "Drama"),
            ("tt1375666", "Action"),
            ("tt1375666", "Sci-Fi"),
            ("tt0816692", "Sci-Fi"),
            ("tt0816692", "Drama"),
            ("tt0133093", "Sci-Fi"),
            ("tt6751668", "Thriller"),
            ("tt0147505", "Animation"),
        ]
        .iter()
        .map(|(m, g)| (m.to_string(), g.to_string()))
        .collect();

        Self {
            committed: Tables {
                plans,
                movies,
                genres,
                ..Tables::default()
            },
            ..Self::default()
        }
    }

    /// Adds a customer straight to the committed tables
    pub fn add_customer(&mut self, email: &str, password: &str, plan_id: i32, session_count: i32) -> Customer {
        let customer_id = next_customer_id(&self.committed);
        let customer = Customer {
            customer_id,
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: format!("Customer{}", customer_id),
            session_count,
            plan_id,
        };
        self.committed.customers.push(StoredCustomer {
            customer: customer.clone(),
            password: password.to_string(),
        });
        customer
    }

    /// Adds watched pairs straight to the committed tables
    pub fn add_watched(&mut self, customer_id: i32, movie_ids: &[&str]) {
        for movie_id in movie_ids {
            self.committed.watched.push((customer_id, movie_id.to_string()));
        }
    }

    pub fn committed(&self) -> &Tables {
        &self.committed
    }

    pub fn has_open_transaction(&self) -> bool {
        self.staged.is_some()
    }

    pub fn committed_customer(&self, customer_id: i32) -> Option<&Customer> {
        self.committed
            .customers
            .iter()
            .map(|c| &c.customer)
            .find(|c| c.customer_id == customer_id)
    }

    pub fn committed_watched(&self, customer_id: i32) -> Vec<String> {
        self.committed
            .watched
            .iter()
            .filter(|(c, _)| *c == customer_id)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn tables(&mut self) -> &mut Tables {
        let committed = &self.committed;
        self.staged.get_or_insert_with(|| committed.clone())
    }

    fn writable(&mut self) -> AppResult<&mut Tables> {
        if self.fail_writes {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.tables())
    }
}

fn next_customer_id(tables: &Tables) -> i32 {
    tables
        .customers
        .iter()
        .map(|c| c.customer.customer_id)
        .max()
        .unwrap_or(0)
        + 1
}

pub fn plan(plan_id: i32, name: &str, resolution: &str, max_parallel_sessions: i32, monthly_fee: i32) -> Plan {
    Plan {
        plan_id,
        name: name.to_string(),
        resolution: resolution.to_string(),
        max_parallel_sessions,
        monthly_fee,
    }
}

pub fn movie(movie_id: &str, title: &str, start_year: i32, average_rating: f64, num_votes: i32) -> Movie {
    Movie {
        movie_id: movie_id.to_string(),
        title: title.to_string(),
        start_year,
        average_rating,
        num_votes,
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn find_customer_by_email(&mut self, email: &str) -> AppResult<Option<Customer>> {
        Ok(self
            .tables()
            .customers
            .iter()
            .find(|c| c.customer.email == email)
            .map(|c| c.customer.clone()))
    }

    async fn find_customers_by_credentials(
        &mut self,
        email: &str,
        password: &str,
    ) -> AppResult<Vec<Customer>> {
        Ok(self
            .tables()
            .customers
            .iter()
            .filter(|c| c.customer.email == email && c.password == password)
            .map(|c| c.customer.clone())
            .collect())
    }

    async fn insert_customer(&mut self, customer: NewCustomer) -> AppResult<Customer> {
        let tables = self.writable()?;
        let inserted = Customer {
            customer_id: next_customer_id(tables),
            email: customer.email,
            first_name: customer.first_name,
            last_name: customer.last_name,
            session_count: 0,
            plan_id: customer.plan_id,
        };
        tables.customers.push(StoredCustomer {
            customer: inserted.clone(),
            password: customer.password,
        });
        Ok(inserted)
    }

    async fn increment_session_count(&mut self, customer_id: i32) -> AppResult<i32> {
        let stored = self.writable()?.customer_mut(customer_id)?;
        stored.customer.session_count += 1;
        Ok(stored.customer.session_count)
    }

    async fn decrement_session_count(&mut self, customer_id: i32) -> AppResult<i32> {
        let stored = self.writable()?.customer_mut(customer_id)?;
        stored.customer.session_count = (stored.customer.session_count - 1).max(0);
        Ok(stored.customer.session_count)
    }

    async fn update_customer_plan(&mut self, customer_id: i32, plan_id: i32) -> AppResult<()> {
        let stored = self.writable()?.customer_mut(customer_id)?;
        stored.customer.plan_id = plan_id;
        Ok(())
    }

    async fn list_plans(&mut self) -> AppResult<Vec<Plan>> {
        let mut plans = self.tables().plans.clone();
        plans.sort_by_key(|p| p.plan_id);
        Ok(plans)
    }

    async fn find_plan(&mut self, plan_id: i32) -> AppResult<Option<Plan>> {
        Ok(self
            .tables()
            .plans
            .iter()
            .find(|p| p.plan_id == plan_id)
            .cloned())
    }

    async fn movie_exists(&mut self, movie_id: &str) -> AppResult<bool> {
        Ok(self.tables().movies.iter().any(|m| m.movie_id == movie_id))
    }

    async fn has_watched(&mut self, customer_id: i32, movie_id: &str) -> AppResult<bool> {
        Ok(self.tables().has_watched(customer_id, movie_id))
    }

    async fn insert_watched(&mut self, customer_id: i32, movie_id: &str) -> AppResult<()> {
        let tables = self.writable()?;
        if tables.has_watched(customer_id, movie_id) {
            return Err(AppError::Internal(format!(
                "duplicate key (customerid, movieid)=({}, {})",
                customer_id, movie_id
            )));
        }
        tables.watched.push((customer_id, movie_id.to_string()));
        Ok(())
    }

    async fn search_movies(&mut self, text: &str) -> AppResult<Vec<Movie>> {
        let needle = text.to_lowercase();
        let mut movies: Vec<Movie> = self
            .tables()
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        movies.sort_by(|a, b| a.movie_id.cmp(&b.movie_id));
        Ok(movies)
    }

    async fn watched_genres(&mut self, customer_id: i32) -> AppResult<Vec<String>> {
        let tables = &*self.tables();
        let mut genres: Vec<String> = tables
            .genres
            .iter()
            .filter(|(movie_id, _)| tables.has_watched(customer_id, movie_id))
            .map(|(_, genre)| genre.clone())
            .collect();
        genres.sort();
        genres.dedup();
        Ok(genres)
    }

    async fn top_unwatched_in_genre(
        &mut self,
        customer_id: i32,
        genre: &str,
    ) -> AppResult<Option<Movie>> {
        let tables = &*self.tables();
        let mut candidates: Vec<&Movie> = tables
            .unwatched(customer_id)
            .filter(|m| {
                tables
                    .genres
                    .iter()
                    .any(|(movie_id, g)| *movie_id == m.movie_id && g == genre)
            })
            .collect();
        candidates.sort_by(|a, b| by_votes_desc(a, b));
        Ok(candidates.first().map(|m| (*m).clone()))
    }

    async fn recent_popular_unwatched(
        &mut self,
        customer_id: i32,
        min_year: i32,
        limit: i64,
    ) -> AppResult<Vec<Movie>> {
        let mut movies: Vec<Movie> = self
            .tables()
            .unwatched(customer_id)
            .filter(|m| m.start_year >= min_year)
            .cloned()
            .collect();
        movies.sort_by(|a, b| {
            b.num_votes
                .cmp(&a.num_votes)
                .then_with(|| {
                    b.average_rating
                        .partial_cmp(&a.average_rating)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        });
        movies.truncate(limit as usize);
        Ok(movies)
    }

    async fn average_watched_votes(&mut self, customer_id: i32) -> AppResult<Option<f64>> {
        let tables = &*self.tables();
        let votes: Vec<f64> = tables
            .movies
            .iter()
            .filter(|m| tables.has_watched(customer_id, &m.movie_id))
            .map(|m| f64::from(m.num_votes))
            .collect();
        if votes.is_empty() {
            return Ok(None);
        }
        Ok(Some(votes.iter().sum::<f64>() / votes.len() as f64))
    }

    async fn unwatched_above_votes(
        &mut self,
        customer_id: i32,
        threshold: f64,
        limit: i64,
    ) -> AppResult<Vec<Movie>> {
        let mut movies: Vec<Movie> = self
            .tables()
            .unwatched(customer_id)
            .filter(|m| f64::from(m.num_votes) > threshold)
            .cloned()
            .collect();
        movies.sort_by(by_votes_desc);
        movies.truncate(limit as usize);
        Ok(movies)
    }

    async fn commit(&mut self) -> AppResult<()> {
        if let Some(staged) = self.staged.take() {
            self.committed = staged;
        }
        self.commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> AppResult<()> {
        self.staged = None;
        self.rollbacks += 1;
        Ok(())
    }
}
