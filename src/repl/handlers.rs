use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::Instrument;

use crate::{
    db::MovieStore,
    messages::{
        ALREADY_SIGNED_IN, CMD_EXECUTION_FAILED, CMD_EXECUTION_SUCCESS, CMD_UNDEFINED,
        ERROR_PREFIX, SIGN_IN_REQUIRED, USER_SIGNIN_FAILED,
    },
    models::{Customer, NewCustomer},
    services,
};

use super::{
    commands::{self, Command, ParseFailure},
    output,
    span::{make_span_with_command_id, CommandId},
    Session,
};

/// What the interpreter does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive command interpreter
///
/// Owns the store and the output sink, and carries the session context
/// from one command to the next.
pub struct Repl<S, W> {
    store: S,
    session: Session,
    out: W,
}

impl<S, W> Repl<S, W>
where
    S: MovieStore,
    W: Write,
{
    pub fn new(store: S, out: W) -> Self {
        Self {
            store,
            session: Session::new(),
            out,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Gives the store back once the interpreter is done
    pub fn into_store(self) -> S {
        self.store
    }

    /// Reads commands until `quit` or end of input
    ///
    /// End of input is handled like `quit` so the session is released.
    pub async fn run<R>(&mut self, input: R) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        output::write_help(&mut self.out)?;
        let mut lines = input.lines();

        loop {
            write!(self.out, "{} > ", self.session.prompt_label())?;
            self.out.flush()?;

            let flow = match lines.next_line().await? {
                Some(line) => self.execute_line(&line).await?,
                None => {
                    writeln!(self.out)?;
                    self.execute(Command::Quit).await?
                }
            };

            if flow == Flow::Quit {
                break;
            }
        }

        self.out.flush()
    }

    /// Parses and runs one line of input
    pub async fn execute_line(&mut self, line: &str) -> io::Result<Flow> {
        let Some(parsed) = commands::parse_line(line) else {
            return Ok(Flow::Continue);
        };

        match parsed {
            Ok(command) => self.execute(command).await,
            Err(ParseFailure::Undefined) => {
                self.print_error(CMD_UNDEFINED)?;
                Ok(Flow::Continue)
            }
            Err(ParseFailure::Usage(message)) => {
                self.print_error(&message)?;
                Ok(Flow::Continue)
            }
            Err(ParseFailure::Help(text)) => {
                write!(self.out, "{}", text)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Runs a parsed command inside its own tracing span
    pub async fn execute(&mut self, command: Command) -> io::Result<Flow> {
        let command_id = CommandId::new();
        let span = make_span_with_command_id(&command, &command_id);
        self.dispatch(command).instrument(span).await
    }

    async fn dispatch(&mut self, command: Command) -> io::Result<Flow> {
        tracing::debug!("Executing command");

        match command {
            Command::Help => output::write_help(&mut self.out)?,

            Command::SignUp {
                email,
                password,
                first_name,
                last_name,
                plan_id,
            } => {
                if !self.require_anonymous()? {
                    return Ok(Flow::Continue);
                }
                let new_customer = NewCustomer {
                    email,
                    password,
                    first_name,
                    last_name,
                    plan_id,
                };
                match services::sign_up(&mut self.store, new_customer).await {
                    Ok(_) => self.print_success()?,
                    Err(e) => self.print_error(&e.user_message(CMD_EXECUTION_FAILED))?,
                }
            }

            Command::SignIn { email, password } => {
                if !self.require_anonymous()? {
                    return Ok(Flow::Continue);
                }
                match services::sign_in(&mut self.store, &email, &password).await {
                    Ok(customer) => {
                        self.session.authenticate(customer);
                        self.print_success()?;
                    }
                    Err(e) => self.print_error(&e.user_message(USER_SIGNIN_FAILED))?,
                }
            }

            Command::SignOut => {
                let Some(customer) = self.require_customer()? else {
                    return Ok(Flow::Continue);
                };
                match services::sign_out(&mut self.store, &customer).await {
                    Ok(_) => {
                        self.session.clear();
                        self.print_success()?;
                    }
                    Err(e) => self.print_error(&e.user_message(CMD_EXECUTION_FAILED))?,
                }
            }

            Command::Quit => {
                if let Err(e) = services::quit(&mut self.store, self.session.customer()).await {
                    tracing::warn!(error = %e, "Sign-out on quit failed");
                    self.print_error(&e.user_message(CMD_EXECUTION_FAILED))?;
                }
                self.session.clear();
                return Ok(Flow::Quit);
            }

            Command::ShowPlans => match services::show_plans(&mut self.store).await {
                Ok(plans) => output::write_plans(&mut self.out, &plans)?,
                Err(e) => self.print_error(&e.user_message(CMD_EXECUTION_FAILED))?,
            },

            Command::ShowSubscription => {
                let Some(customer) = self.require_customer()? else {
                    return Ok(Flow::Continue);
                };
                match services::show_subscription(&mut self.store, &customer).await {
                    Ok(plan) => output::write_plans(&mut self.out, std::slice::from_ref(&plan))?,
                    Err(e) => self.print_error(&e.user_message(CMD_EXECUTION_FAILED))?,
                }
            }

            Command::Subscribe { plan_id } => {
                let Some(customer) = self.require_customer()? else {
                    return Ok(Flow::Continue);
                };
                match services::subscribe(&mut self.store, &customer, plan_id).await {
                    Ok(updated) => {
                        self.session.authenticate(updated);
                        self.print_success()?;
                    }
                    Err(e) => self.print_error(&e.user_message(CMD_EXECUTION_FAILED))?,
                }
            }

            Command::Watch { movie_ids } => {
                let Some(customer) = self.require_customer()? else {
                    return Ok(Flow::Continue);
                };
                match services::watch(&mut self.store, &customer, &movie_ids).await {
                    Ok(_) => self.print_success()?,
                    Err(e) => self.print_error(&e.user_message(CMD_EXECUTION_FAILED))?,
                }
            }

            Command::SearchForMovies { keywords } => {
                let Some(customer) = self.require_customer()? else {
                    return Ok(Flow::Continue);
                };
                let search_text = keywords.join(" ");
                match services::search_for_movies(&mut self.store, &customer, &search_text).await {
                    Ok(matches) => output::write_search_results(&mut self.out, &matches)?,
                    Err(e) => self.print_error(&e.user_message(CMD_EXECUTION_FAILED))?,
                }
            }

            Command::SuggestMovies => {
                let Some(customer) = self.require_customer()? else {
                    return Ok(Flow::Continue);
                };
                match services::suggest_movies(&mut self.store, &customer).await {
                    Ok(movies) => output::write_suggestions(&mut self.out, &movies)?,
                    Err(e) => self.print_error(&e.user_message(CMD_EXECUTION_FAILED))?,
                }
            }
        }

        Ok(Flow::Continue)
    }

    /// The signed-in customer, or an error printed for the anonymous user
    fn require_customer(&mut self) -> io::Result<Option<Customer>> {
        match self.session.customer() {
            Some(customer) => Ok(Some(customer.clone())),
            None => {
                self.print_error(SIGN_IN_REQUIRED)?;
                Ok(None)
            }
        }
    }

    /// False, with an error printed, when someone is already signed in
    fn require_anonymous(&mut self) -> io::Result<bool> {
        if self.session.is_signed_in() {
            self.print_error(ALREADY_SIGNED_IN)?;
            return Ok(false);
        }
        Ok(true)
    }

    fn print_success(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", CMD_EXECUTION_SUCCESS)
    }

    fn print_error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}{}", ERROR_PREFIX, message)
    }
}
