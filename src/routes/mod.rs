pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::auth::AuthMiddleware;

/// Route tree. Auth endpoints are open; the task scope carries the bearer
/// middleware, which itself lets GET requests through unauthenticated.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register).service(auth::login).service(
        web::scope("/tasks")
            .wrap(AuthMiddleware)
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::patch_task)
            .service(tasks::delete_task),
    );
}
