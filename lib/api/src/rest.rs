use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::middleware::track_requests;
use crate::state::{AppState, EmbeddingFailurePolicy};
use crate::suggest::daily_plan;
use actix_cors::Cors;
use actix_web::middleware::from_fn;
use actix_web::{web, App, HttpResponse, HttpServer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sprintsync_core::{AssignmentOutcome, MetricsAggregator};
use sprintsync_storage::{NewTask, StorageError, Task, TaskUpdate, User, DEFAULT_STATUS};
use std::sync::Arc;
use tracing::{info, warn};

const TOP_USERS_LIMIT: usize = 5;
const MAX_TOTAL_MINUTES: i64 = i32::MAX as i64;

#[derive(Deserialize)]
struct RegisterRequest {
    email: String,
    #[serde(default)]
    resume_text: Option<String>,
}

#[derive(Deserialize)]
struct ResumeRequest {
    resume_text: String,
}

#[derive(Serialize)]
struct UserResponse {
    id: i64,
    email: String,
    is_admin: bool,
    has_embedding: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            has_embedding: user.has_embedding(),
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Deserialize)]
struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    status: Option<String>,
    total_minutes: Option<i64>,
}

#[derive(Deserialize)]
struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    total_minutes: Option<i64>,
}

#[derive(Deserialize)]
struct StatusRequest {
    status: String,
}

#[derive(Serialize)]
struct TaskResponse {
    id: i64,
    title: String,
    description: Option<String>,
    status: String,
    total_minutes: i64,
    user_id: i64,
    assigned_user_id: Option<i64>,
    assignment: &'static str,
    created_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            assigned_user_id: task.assigned_user_id(),
            assignment: task.assignment.as_str(),
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            total_minutes: task.total_minutes,
            user_id: task.user_id,
            created_at: task.created_at,
        }
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        state: Arc<AppState>,
        metrics: Arc<MetricsAggregator>,
        port: u16,
    ) -> std::io::Result<()> {
        let state = web::Data::from(state);
        let metrics = web::Data::from(metrics);

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .wrap(from_fn(track_requests))
                .app_data(state.clone())
                .app_data(metrics.clone())
                .configure(configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register every route. Callers provide `web::Data<AppState>` and
/// `web::Data<MetricsAggregator>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health))
        .route("/metrics", web::get().to(get_metrics))
        .route("/auth/register", web::post().to(register))
        .route("/users/me", web::get().to(get_me))
        .route("/users/me/resume", web::put().to(update_resume))
        .route("/tasks", web::post().to(create_task))
        .route("/tasks", web::get().to(list_tasks))
        .route("/tasks/{id}", web::get().to(get_task))
        .route("/tasks/{id}", web::put().to(update_task))
        .route("/tasks/{id}", web::delete().to(delete_task))
        .route("/tasks/{id}/status", web::patch().to(update_status))
        .route("/stats/top-users", web::get().to(top_users))
        .route("/ai/suggest", web::get().to(suggest));
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

/// `local@domain` with both parts non-empty, no whitespace and a dotted domain
fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

/// Minutes are stored as a 32-bit count
fn validate_minutes(minutes: Option<i64>) -> ApiResult<()> {
    match minutes {
        Some(m) if !(0..=MAX_TOTAL_MINUTES).contains(&m) => Err(ApiError::BadRequest(format!(
            "total_minutes must be between 0 and {}",
            MAX_TOTAL_MINUTES
        ))),
        _ => Ok(()),
    }
}

/// Trimmed text, or `None` when blank
fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    }))
}

async fn get_metrics(metrics: web::Data<MetricsAggregator>) -> HttpResponse {
    HttpResponse::Ok().json(metrics.snapshot())
}

// ==================== Users ====================

async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    let email = req.email.trim();
    if !is_valid_email(email) {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }
    if state.storage.email_taken(email) {
        return Err(StorageError::EmailTaken(email.to_string()).into());
    }

    let resume = match non_blank(req.resume_text.as_deref()) {
        Some(text) => Some((text.to_string(), state.engine.embed(text).await?)),
        None => None,
    };

    let user = state.storage.create_user(email, resume)?;
    info!(user_id = user.id, has_embedding = user.has_embedding(), "user registered");

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

async fn get_me(user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse::from(user.0))
}

async fn update_resume(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<ResumeRequest>,
) -> ApiResult<HttpResponse> {
    let text = non_blank(Some(req.resume_text.as_str()))
        .ok_or_else(|| ApiError::BadRequest("resume_text must not be empty".to_string()))?;

    let embedding = state.engine.embed(text).await?;
    let updated = state.storage.set_resume(user.0.id, text.to_string(), embedding)?;
    info!(user_id = updated.id, "resume embedding updated");

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

// ==================== Tasks ====================

async fn create_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<CreateTaskRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    validate_minutes(req.total_minutes)?;

    let assignment = match non_blank(req.description.as_deref()) {
        None => AssignmentOutcome::NotAttempted,
        Some(description) => assign(&state, description).await?,
    };

    // Inserted only after assignment completes, so a cancelled request
    // leaves nothing behind.
    let new_task = NewTask {
        title: req.title,
        description: req.description,
        status: req.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        total_minutes: req.total_minutes.unwrap_or(0),
    };
    let task = state.storage.insert_task(user.0.id, new_task, assignment);

    info!(
        task_id = task.id,
        owner = task.user_id,
        assignment = assignment.as_str(),
        assigned_user_id = ?assignment.assigned_id(),
        "task created"
    );

    Ok(HttpResponse::Created().json(TaskResponse::from(task)))
}

async fn assign(state: &AppState, description: &str) -> ApiResult<AssignmentOutcome> {
    let candidates = state.storage.candidates();

    match state.engine.assign(description, &candidates).await {
        Ok(result) => Ok(result.into()),
        Err(sprintsync_core::Error::EmbeddingProvider(msg))
            if state.failure_policy == EmbeddingFailurePolicy::StoreUnassigned =>
        {
            warn!(error = %msg, "embedding failed, storing task unassigned");
            Ok(AssignmentOutcome::NotAttempted)
        }
        Err(e) => Err(e.into()),
    }
}

async fn list_tasks(state: web::Data<AppState>, user: CurrentUser) -> HttpResponse {
    let tasks: Vec<TaskResponse> = state
        .storage
        .tasks_for(user.0.id)
        .into_iter()
        .map(TaskResponse::from)
        .collect();
    HttpResponse::Ok().json(tasks)
}

async fn get_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let task = state.storage.get_task(user.0.id, path.into_inner())?;
    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

async fn update_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
    req: web::Json<UpdateTaskRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    validate_minutes(req.total_minutes)?;
    let update = TaskUpdate {
        title: req.title,
        description: req.description,
        total_minutes: req.total_minutes,
    };
    let task = state.storage.update_task(user.0.id, path.into_inner(), update)?;
    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

async fn update_status(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
    req: web::Json<StatusRequest>,
) -> ApiResult<HttpResponse> {
    let task = state
        .storage
        .update_status(user.0.id, path.into_inner(), req.into_inner().status)?;
    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

async fn delete_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let task_id = path.into_inner();
    state.storage.delete_task(user.0.id, task_id)?;
    info!(task_id, owner = user.0.id, "task deleted");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "detail": "Task deleted successfully"
    })))
}

// ==================== Stats & AI ====================

async fn top_users(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "top_users": state.storage.top_users(TOP_USERS_LIMIT)
    }))
}

async fn suggest(state: web::Data<AppState>, user: CurrentUser) -> HttpResponse {
    let tasks = state.storage.tasks_for(user.0.id);
    HttpResponse::Ok().json(serde_json::json!({
        "daily_plan": daily_plan(&tasks)
    }))
}
