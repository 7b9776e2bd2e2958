use crate::{
    db::MovieStore,
    error::{AppError, AppResult, Rejection},
    models::{Customer, NewCustomer},
};

use super::settle;

/// Registers a new customer
///
/// Fails with `EmailTaken` when the email is already on file and with
/// `PlanNotFound` when the requested plan does not exist. The new customer
/// holds no sessions; signing up does not sign in.
pub async fn sign_up<S>(store: &mut S, customer: NewCustomer) -> AppResult<Customer>
where
    S: MovieStore + ?Sized,
{
    let outcome = register(store, customer).await;
    settle(store, "sign_up", outcome).await
}

async fn register<S>(store: &mut S, customer: NewCustomer) -> AppResult<Customer>
where
    S: MovieStore + ?Sized,
{
    if store.find_customer_by_email(&customer.email).await?.is_some() {
        return Err(Rejection::EmailTaken.into());
    }

    if store.find_plan(customer.plan_id).await?.is_none() {
        return Err(Rejection::PlanNotFound.into());
    }

    let customer = store.insert_customer(customer).await?;

    tracing::info!(
        customer_id = customer.customer_id,
        plan_id = customer.plan_id,
        "Customer signed up"
    );

    Ok(customer)
}

/// Opens a session for the customer owning these credentials
///
/// Exactly one customer must match. The session is granted only while the
/// customer's session count is below the plan's parallel-session limit; the
/// returned customer carries the incremented count.
pub async fn sign_in<S>(store: &mut S, email: &str, password: &str) -> AppResult<Customer>
where
    S: MovieStore + ?Sized,
{
    let outcome = open_session(store, email, password).await;
    settle(store, "sign_in", outcome).await
}

async fn open_session<S>(store: &mut S, email: &str, password: &str) -> AppResult<Customer>
where
    S: MovieStore + ?Sized,
{
    let customers = store.find_customers_by_credentials(email, password).await?;
    let Ok([mut customer]) = <[Customer; 1]>::try_from(customers) else {
        return Err(Rejection::InvalidCredentials.into());
    };

    let plan = store.find_plan(customer.plan_id).await?.ok_or_else(|| {
        AppError::Internal(format!(
            "customer {} references missing plan {}",
            customer.customer_id, customer.plan_id
        ))
    })?;

    if !plan.has_free_session(customer.session_count) {
        tracing::info!(
            customer_id = customer.customer_id,
            session_count = customer.session_count,
            max_sessions = plan.max_parallel_sessions,
            "Sign-in refused, all sessions in use"
        );
        return Err(Rejection::SessionsExhausted.into());
    }

    customer.session_count = store.increment_session_count(customer.customer_id).await?;

    tracing::info!(
        customer_id = customer.customer_id,
        session_count = customer.session_count,
        "Customer signed in"
    );

    Ok(customer)
}

/// Releases one of the customer's sessions
///
/// The stored count never drops below zero. Returns the customer with the
/// count as stored after the release.
pub async fn sign_out<S>(store: &mut S, customer: &Customer) -> AppResult<Customer>
where
    S: MovieStore + ?Sized,
{
    let outcome = close_session(store, customer).await;
    settle(store, "sign_out", outcome).await
}

async fn close_session<S>(store: &mut S, customer: &Customer) -> AppResult<Customer>
where
    S: MovieStore + ?Sized,
{
    if customer.session_count <= 0 {
        tracing::warn!(
            customer_id = customer.customer_id,
            "Signing out a customer with no recorded sessions"
        );
    }

    let session_count = store.decrement_session_count(customer.customer_id).await?;

    tracing::info!(
        customer_id = customer.customer_id,
        session_count,
        "Customer signed out"
    );

    Ok(Customer {
        session_count,
        ..customer.clone()
    })
}

/// Signs the customer out, if any, before the program exits
pub async fn quit<S>(store: &mut S, customer: Option<&Customer>) -> AppResult<()>
where
    S: MovieStore + ?Sized,
{
    match customer {
        Some(customer) => sign_out(store, customer).await.map(|_| ()),
        None => Ok(()),
    }
}
