use crate::{
    db::MovieStore,
    error::{AppError, AppResult, Rejection},
    models::{Customer, Plan},
};

use super::settle;

/// Lists every plan, ascending by plan id
pub async fn show_plans<S>(store: &mut S) -> AppResult<Vec<Plan>>
where
    S: MovieStore + ?Sized,
{
    let outcome = store.list_plans().await;
    settle(store, "show_plans", outcome).await
}

/// The plan the customer is currently subscribed to
pub async fn show_subscription<S>(store: &mut S, customer: &Customer) -> AppResult<Plan>
where
    S: MovieStore + ?Sized,
{
    let outcome = match store.find_plan(customer.plan_id).await {
        Ok(Some(plan)) => Ok(plan),
        Ok(None) => Err(Rejection::PlanNotFound.into()),
        Err(e) => Err(e),
    };
    settle(store, "show_subscription", outcome).await
}

/// Moves the customer to another plan
///
/// The move is refused when the target plan allows fewer parallel sessions
/// than the current one. Returns the customer with the new plan id.
pub async fn subscribe<S>(store: &mut S, customer: &Customer, plan_id: i32) -> AppResult<Customer>
where
    S: MovieStore + ?Sized,
{
    let outcome = change_plan(store, customer, plan_id).await;
    settle(store, "subscribe", outcome).await
}

async fn change_plan<S>(store: &mut S, customer: &Customer, plan_id: i32) -> AppResult<Customer>
where
    S: MovieStore + ?Sized,
{
    let new_plan = store
        .find_plan(plan_id)
        .await?
        .ok_or(Rejection::PlanNotFound)?;

    let current_plan = store.find_plan(customer.plan_id).await?.ok_or_else(|| {
        AppError::Internal(format!(
            "customer {} references missing plan {}",
            customer.customer_id, customer.plan_id
        ))
    })?;

    if !new_plan.can_replace(&current_plan) {
        tracing::info!(
            customer_id = customer.customer_id,
            current_plan = current_plan.plan_id,
            requested_plan = new_plan.plan_id,
            "Plan change refused, session capacity would shrink"
        );
        return Err(Rejection::CapacityUnavailable.into());
    }

    store
        .update_customer_plan(customer.customer_id, new_plan.plan_id)
        .await?;

    tracing::info!(
        customer_id = customer.customer_id,
        from_plan = current_plan.plan_id,
        to_plan = new_plan.plan_id,
        "Customer changed plan"
    );

    Ok(Customer {
        plan_id: new_plan.plan_id,
        ..customer.clone()
    })
}
