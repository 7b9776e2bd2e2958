use std::io::{self, Write};

use crate::models::{Movie, MovieMatch, Plan};

const PLAN_HEADER: &str = "#|Name|Resolution|Max Sessions|Monthly Fee";
const SEARCH_HEADER: &str = "Id|Title|Year|Rating|Votes|Watched";
const SUGGESTION_HEADER: &str = "Id|Title|Year|Rating|Votes";

const HELP: &str = "\
*** Please enter one of the following commands ***
> help
> sign_up <email> <password> <first_name> <last_name> <plan_id>
> sign_in <email> <password>
> sign_out
> show_plans
> show_subscription
> subscribe <plan_id>
> watch <movie_id_1> <movie_id_2> <movie_id_3> ... <movie_id_n>
> search_for_movies <keyword_1> <keyword_2> <keyword_3> ... <keyword_n>
> suggest_movies
> quit";

pub fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", HELP)
}

pub fn write_plans<W: Write>(out: &mut W, plans: &[Plan]) -> io::Result<()> {
    writeln!(out, "{}", PLAN_HEADER)?;
    for plan in plans {
        writeln!(
            out,
            "{}|{}|{}|{}|{}",
            plan.plan_id, plan.name, plan.resolution, plan.max_parallel_sessions, plan.monthly_fee
        )?;
    }
    Ok(())
}

pub fn write_search_results<W: Write>(out: &mut W, matches: &[MovieMatch]) -> io::Result<()> {
    writeln!(out, "{}", SEARCH_HEADER)?;
    for hit in matches {
        writeln!(out, "{}|{}", movie_row(&hit.movie), u8::from(hit.watched))?;
    }
    Ok(())
}

pub fn write_suggestions<W: Write>(out: &mut W, movies: &[Movie]) -> io::Result<()> {
    writeln!(out, "{}", SUGGESTION_HEADER)?;
    for movie in movies {
        writeln!(out, "{}", movie_row(movie))?;
    }
    Ok(())
}

fn movie_row(movie: &Movie) -> String {
    format!(
        "{}|{}|{}|{:.1}|{}",
        movie.movie_id, movie.title, movie.start_year, movie.average_rating, movie.num_votes
    )
}
