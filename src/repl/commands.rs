use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};

/// One line typed at the prompt
///
/// Parsed in multicall mode: the first token names the command.
#[derive(Debug, Parser)]
#[command(multicall = true, disable_help_subcommand = true)]
struct ReplLine {
    #[command(subcommand)]
    command: Command,
}

/// Commands understood by the interpreter
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the available commands
    #[command(name = "help")]
    Help,

    /// Create an account
    #[command(name = "sign_up")]
    SignUp {
        email: String,
        password: String,
        first_name: String,
        last_name: String,
        plan_id: i32,
    },

    /// Open a session
    #[command(name = "sign_in")]
    SignIn { email: String, password: String },

    /// Close the current session
    #[command(name = "sign_out")]
    SignOut,

    /// List all subscription plans
    #[command(name = "show_plans")]
    ShowPlans,

    /// Show your current plan
    #[command(name = "show_subscription")]
    ShowSubscription,

    /// Move to another plan
    #[command(name = "subscribe")]
    Subscribe { plan_id: i32 },

    /// Record movies as watched
    #[command(name = "watch")]
    Watch {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true, trailing_var_arg = true)]
        movie_ids: Vec<String>,
    },

    /// Search movie titles
    #[command(name = "search_for_movies")]
    SearchForMovies {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true, trailing_var_arg = true)]
        keywords: Vec<String>,
    },

    /// Get movie suggestions
    #[command(name = "suggest_movies")]
    SuggestMovies,

    /// Sign out and leave
    #[command(name = "quit")]
    Quit,
}

impl Command {
    /// Name as typed at the prompt
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::SignUp { .. } => "sign_up",
            Command::SignIn { .. } => "sign_in",
            Command::SignOut => "sign_out",
            Command::ShowPlans => "show_plans",
            Command::ShowSubscription => "show_subscription",
            Command::Subscribe { .. } => "subscribe",
            Command::Watch { .. } => "watch",
            Command::SearchForMovies { .. } => "search_for_movies",
            Command::SuggestMovies => "suggest_movies",
            Command::Quit => "quit",
        }
    }
}

/// Why a line could not be turned into a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The first token is not a known command
    Undefined,
    /// Known command, wrong arguments
    Usage(String),
    /// The user asked for a command's help text
    Help(String),
}

/// Parses whitespace-separated tokens into a command
pub fn parse(tokens: &[&str]) -> Result<Command, ParseFailure> {
    let Some(name) = tokens.first().copied() else {
        return Err(ParseFailure::Undefined);
    };
    if ReplLine::command().find_subcommand(name).is_none() {
        return Err(ParseFailure::Undefined);
    }

    ReplLine::try_parse_from(tokens.iter().copied())
        .map(|line| line.command)
        .map_err(|err| match err.kind() {
            ErrorKind::InvalidSubcommand => ParseFailure::Undefined,
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                ParseFailure::Help(err.to_string())
            }
            _ => ParseFailure::Usage(first_line(&err.to_string())),
        })
}

/// Parses one input line, `None` when it is blank
///
/// Search text is everything after the first space, so spacing typed
/// between keywords reaches the search unchanged.
pub fn parse_line(line: &str) -> Option<Result<Command, ParseFailure>> {
    let line = line.trim();
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let parsed = parse(&tokens).map(|command| match command {
        Command::SearchForMovies { keywords } => {
            let search_text = match line.split_once(' ') {
                Some((_, rest)) => rest.to_string(),
                None => keywords.join(" "),
            };
            Command::SearchForMovies {
                keywords: vec![search_text],
            }
        }
        other => other,
    });
    Some(parsed)
}

fn first_line(rendered: &str) -> String {
    let line = rendered.lines().next().unwrap_or_default().trim();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}
