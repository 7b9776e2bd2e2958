/// Domain failures: the request was understood but the rules refuse it
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("A customer with this email already exists.")]
    EmailTaken,

    #[error("Sign-in failed, check your email and password.")]
    InvalidCredentials,

    #[error("All sessions are used, please sign out from one of your devices.")]
    SessionsExhausted,

    #[error("Plan not found.")]
    PlanNotFound,

    #[error("The new plan allows fewer parallel sessions than your current plan.")]
    CapacityUnavailable,

    #[error("Movie {0} does not exist.")]
    UnknownMovie(String),
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for failures of the data layer rather than of the business rules
    pub fn is_transient(&self) -> bool {
        !matches!(self, AppError::Rejected(_))
    }

    /// The rejection carried by this error, if any
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            AppError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    /// Message shown to the user
    ///
    /// Rejections explain themselves. Transient failures are reduced to
    /// `fallback` so that driver details never reach the terminal.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Rejected(rejection) => rejection.to_string(),
            AppError::Database(_) | AppError::Migration(_) | AppError::Internal(_) => {
                fallback.to_string()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
