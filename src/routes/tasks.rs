use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Task, TaskInput, TaskPatch},
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const TASK_COLUMNS: &str = "id, title, description, status, user_id";

/// Retrieves every task on the board.
///
/// Reads are unauthenticated; only mutations are owner-gated. An empty board
/// is still a successful read and returns an empty array, never 404.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects, ordered by id.
/// - `500 Internal Server Error`: for database errors.
#[get("")]
pub async fn list_tasks(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks ORDER BY id",
        TASK_COLUMNS
    ))
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves a single task by its id. Unauthenticated, like the list route.
///
/// ## Responses:
/// - `200 OK`: the `Task` as JSON.
/// - `404 Not Found`: no task with that id.
/// - `500 Internal Server Error`: for database errors.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = $1",
        TASK_COLUMNS
    ))
    .bind(task_id.into_inner())
    .fetch_optional(&**pool)
    .await?;

    match task {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("No task with that id".into())),
    }
}

/// Creates a new task owned by the authenticated caller.
///
/// The owner is always the token identity; a `userId` in the request body is
/// ignored, so a caller cannot create tasks on someone else's behalf. A
/// foreign-key violation (the token's user no longer exists) is handled
/// defensively as 400.
///
/// ## Request Body:
/// `{title, description, status}` — title 1..=200 chars, description up to
/// 1000 chars, status a free string.
///
/// ## Responses:
/// - `201 Created`: the created `Task` as JSON.
/// - `400 Bad Request`: invalid body.
/// - `401 Unauthorized` / `403 Forbidden`: missing or invalid token.
/// - `500 Internal Server Error`: for database errors.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (title, description, status, user_id)
         VALUES ($1, $2, $3, $4)
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&task_data.title)
    .bind(&task_data.description)
    .bind(&task_data.status)
    .bind(user.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Fully replaces a task's mutable fields. Requires ownership.
///
/// The ownership check and the write run in one transaction with the row
/// locked, so the owner cannot change between check and update.
///
/// ## Responses:
/// - `200 OK`: the updated `Task` as JSON.
/// - `401`/`403`: missing token / invalid token or wrong owner.
/// - `404 Not Found`: no task with that id.
/// - `500 Internal Server Error`: for database errors.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_id = task_id.into_inner();

    let mut tx = pool.begin().await?;
    Task::lock_owned(&mut tx, task_id, user.id).await?;

    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET title = $1, description = $2, status = $3
         WHERE id = $4
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&task_data.title)
    .bind(&task_data.description)
    .bind(&task_data.status)
    .bind(task_id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task. Requires ownership.
///
/// Each field is independently optional; omitted fields keep their stored
/// values via a coalesce merge, they are never overwritten with null. An
/// empty patch is a legal no-op.
///
/// ## Responses:
/// - `200 OK`: the updated `Task` as JSON.
/// - `400 Bad Request`: invalid body.
/// - `401`/`403`: missing token / invalid token or wrong owner.
/// - `404 Not Found`: no task with that id.
/// - `500 Internal Server Error`: for database errors.
#[patch("/{id}")]
pub async fn patch_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskPatch>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_id = task_id.into_inner();

    let mut tx = pool.begin().await?;
    Task::lock_owned(&mut tx, task_id, user.id).await?;

    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET title = COALESCE($1, title),
                          description = COALESCE($2, description),
                          status = COALESCE($3, status)
         WHERE id = $4
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task_data.title.as_deref())
    .bind(task_data.description.as_deref())
    .bind(task_data.status.as_deref())
    .bind(task_id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task. Requires ownership.
///
/// ## Responses:
/// - `204 No Content`: on successful deletion.
/// - `401`/`403`: missing token / invalid token or wrong owner.
/// - `404 Not Found`: no task with that id (including a repeat delete).
/// - `500 Internal Server Error`: for database errors.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    let mut tx = pool.begin().await?;
    Task::lock_owned(&mut tx, task_id, user.id).await?;

    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(HttpResponse::NoContent().finish())
}
