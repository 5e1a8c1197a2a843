use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, Transaction};
use validator::Validate;

use crate::error::AppError;

/// A task entity as stored in the database and returned by the API.
///
/// `status` is an enum-like free string ("todo", "in-progress", "done", ...);
/// the server stores and returns it verbatim without enforcing a vocabulary.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: String,
    /// Identifier of the owning user. Only that user may mutate the task.
    pub user_id: i32,
}

/// Input for creating a task or fully replacing its mutable fields.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters.
    #[validate(length(max = 1000))]
    pub description: String,

    #[validate(length(min = 1, max = 32))]
    pub status: String,
}

/// Partial update payload: each field independently optional. Omitted fields
/// keep their stored values (coalesce merge), they are never nulled out.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 32))]
    pub status: Option<String>,
}

/// Outcome of checking a task against a caller's identity.
///
/// The three cases map to distinct responses: a missing row is 404, a row
/// owned by someone else is 403. Callers rely on the distinction to know
/// whether the resource exists at all.
#[derive(Debug)]
pub enum OwnershipCheck {
    Owned(Task),
    Missing,
    WrongOwner,
}

impl OwnershipCheck {
    pub fn classify(row: Option<Task>, caller_id: i32) -> Self {
        match row {
            None => OwnershipCheck::Missing,
            Some(task) if task.user_id != caller_id => OwnershipCheck::WrongOwner,
            Some(task) => OwnershipCheck::Owned(task),
        }
    }

    pub fn into_owned(self) -> Result<Task, AppError> {
        match self {
            OwnershipCheck::Owned(task) => Ok(task),
            OwnershipCheck::Missing => Err(AppError::NotFound("No task with that id".into())),
            OwnershipCheck::WrongOwner => {
                Err(AppError::Forbidden("Task belongs to another user".into()))
            }
        }
    }
}

impl Task {
    /// Loads a task inside the caller's transaction, holding a row lock, and
    /// requires the caller to be its owner.
    ///
    /// The `FOR UPDATE` lock persists until the transaction ends, so the
    /// ownership decision cannot be invalidated by a concurrent mutation
    /// between check and write.
    pub async fn lock_owned(
        tx: &mut Transaction<'_, Postgres>,
        task_id: i32,
        caller_id: i32,
    ) -> Result<Task, AppError> {
        let row = sqlx::query_as::<_, Task>(
            "SELECT id, title, description, status, user_id FROM tasks WHERE id = $1 FOR UPDATE",
        )
        .bind(task_id)
        .fetch_optional(&mut **tx)
        .await?;

        OwnershipCheck::classify(row, caller_id).into_owned()
    }
}
