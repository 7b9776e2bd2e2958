/// A movie row from the `movies` table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Movie {
    /// Opaque identifier (e.g., "tt0468569")
    #[sqlx(rename = "movieid")]
    pub movie_id: String,
    #[sqlx(rename = "originaltitle")]
    pub title: String,
    /// Release year, 0 when unknown
    #[sqlx(rename = "startyear")]
    pub start_year: i32,
    #[sqlx(rename = "averagerating")]
    pub average_rating: f64,
    #[sqlx(rename = "numvotes")]
    pub num_votes: i32,
}

/// A search hit annotated with whether the searching customer watched it
#[derive(Debug, Clone, PartialEq)]
pub struct MovieMatch {
    pub movie: Movie,
    pub watched: bool,
}
