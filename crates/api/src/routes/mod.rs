pub mod activity;
pub mod agents;
pub mod apartments;
pub mod auth;
pub mod clients;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy (auth lives at the root, not under `/api`):
///
/// ```text
/// /auth/login                              login (public)
/// /auth/me                                 current user (requires auth)
///
/// /agents                                  list, create (create admin only)
/// /agents/{id}                             get, update, delete (mutations admin only)
///
/// /clients                                 list, create
/// /clients/{id}                            get, update, delete (owner or admin)
/// /clients/{id}/interests                  list, add interest
/// /clients/{id}/interests/{apartment_id}   remove interest
///
/// /projects                                list, create
/// /projects/{id}                           get (with apartments), update, delete
/// /projects/{id}/apartments                list project apartments
///
/// /apartments                              list (?project_id=), create
/// /apartments/price-quote                  compute a price breakdown (POST)
/// /apartments/{id}                         get, update, delete
/// /apartments/{id}/assign                  reserve or sell to a client (POST)
/// /apartments/{id}/release                 return to AVAILABLE (POST)
///
/// /tasks                                   list, create
/// /tasks/counts                            counts by status
/// /tasks/{id}                              get (with comments), update, delete
/// /tasks/{id}/comments                     add comment (POST)
/// /tasks/{task_id}/comments/{id}           delete comment
///
/// /activity/targets                        list (?year=), create (admin only)
/// /activity/targets/{id}                   update, delete (admin only)
/// /activity/summary                        monthly dashboard aggregates
///
/// /uploads                                 image upload (POST, multipart)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/agents", agents::router())
        .nest("/clients", clients::router())
        .nest("/projects", projects::router())
        .nest("/apartments", apartments::router())
        .nest("/tasks", tasks::router())
        .nest("/activity", activity::router())
        .nest("/uploads", uploads::router())
}
