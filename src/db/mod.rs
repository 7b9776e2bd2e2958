pub mod postgres;
pub mod store;

pub use postgres::{create_pool, run_migrations, PgStore};
pub use store::MovieStore;

#[cfg(test)]
pub use store::MockMovieStore;
