//! Expense API endpoints

use api_types::expense::{ExpenseCreated, ExpenseNew, ExpenseUpdate, ExpenseView, ExpensesResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn expense_view(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        name: expense.name,
        amount: expense.amount,
        date: expense.date.fixed_offset(),
        odometer: expense.odometer,
        description: expense.description,
        category: expense.category.as_str().to_string(),
        created_at: expense.created_at.fixed_offset(),
    }
}

/// Unknown category names fall back to `Other`, mirroring what reads do for
/// rows written before a category existed.
fn parse_category(category: Option<&str>) -> engine::ExpenseCategory {
    category
        .map(|value| engine::ExpenseCategory::try_from(value).unwrap_or_default())
        .unwrap_or_default()
}

/// Handle requests for recording a miscellaneous expense.
pub async fn create(
    State(state): State<ServerState>,
    Path(car_id): Path<Uuid>,
    Json(payload): Json<ExpenseNew>,
) -> Result<Json<ExpenseCreated>, ServerError> {
    let date = payload
        .date
        .map(|date| date.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let expense_id = state
        .engine
        .new_expense(
            car_id,
            &payload.name,
            payload.amount,
            date,
            payload.odometer,
            payload.description.as_deref(),
            parse_category(payload.category.as_deref()),
        )
        .await?;

    Ok(Json(ExpenseCreated { id: expense_id }))
}

/// Handle requests for listing a car's expenses, newest first.
pub async fn list(
    State(state): State<ServerState>,
    Path(car_id): Path<Uuid>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(car_id)
        .await?
        .into_iter()
        .map(expense_view)
        .collect();

    Ok(Json(ExpensesResponse { expenses }))
}

/// Handle partial updates to an expense.
pub async fn update(
    State(state): State<ServerState>,
    Path((car_id, expense_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_expense(
            car_id,
            expense_id,
            engine::ExpenseUpdate {
                name: payload.name,
                amount: payload.amount,
                date: payload.date.map(|date| date.with_timezone(&Utc)),
                // Present-but-zero clears the stored reading.
                odometer: payload.odometer.map(Some),
                description: payload.description,
                category: payload
                    .category
                    .as_deref()
                    .map(|value| parse_category(Some(value))),
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for deleting an expense.
pub async fn delete(
    State(state): State<ServerState>,
    Path((car_id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(car_id, expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
