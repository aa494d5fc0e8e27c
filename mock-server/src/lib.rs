use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const BASE_PATH: &str = "/api-lessons";
pub const DEMO_TOKEN: &str = "demo-token";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lesson {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<User>,
    #[serde(default)]
    pub attenders: Vec<User>,
    /// Scheduling attributes the mock does not interpret, stored as sent.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Lesson {
    fn involves(&self, user_id: i64) -> bool {
        self.teacher.as_ref().is_some_and(|t| t.id == user_id)
            || self.attenders.iter().any(|a| a.id == user_id)
    }
}

/// In-memory backing store: registered users, lessons and issued tokens.
#[derive(Debug, Default)]
pub struct Store {
    users: BTreeMap<i64, User>,
    lessons: BTreeMap<i64, Lesson>,
    tokens: HashSet<String>,
    next_user_id: i64,
    next_lesson_id: i64,
}

impl Store {
    /// A teacher (id 1), a student (id 2) and `DEMO_TOKEN`.
    pub fn with_demo_data() -> Self {
        let mut store = Self::default();
        store.add_user("teacher@classroom.test", Some("Teacher"));
        store.add_user("student@classroom.test", Some("Student"));
        store.issue_token(DEMO_TOKEN);
        store
    }

    pub fn add_user(&mut self, email: &str, name: Option<&str>) -> User {
        self.next_user_id += 1;
        let user = User {
            id: self.next_user_id,
            email: email.to_string(),
            name: name.map(str::to_string),
        };
        self.users.insert(user.id, user.clone());
        user
    }

    pub fn issue_token(&mut self, token: &str) {
        self.tokens.insert(token.to_string());
    }

    fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email.eq_ignore_ascii_case(email))
    }

    fn lesson_mut(&mut self, id: i64) -> Result<&mut Lesson, ApiError> {
        self.lessons
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("lesson {id} not found")))
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Failure responses carry a plain-text body.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, body).into_response()
    }
}

pub fn app() -> Router {
    router(Arc::new(RwLock::new(Store::with_demo_data())))
}

pub fn router(db: Db) -> Router {
    let lessons = Router::new()
        .route("/user/{id}", get(list_user_lessons))
        .route("/lesson/{id}", get(get_lesson))
        .route("/new", post(create_lesson))
        .route("/edit", put(update_lesson))
        .route("/delete/{id}", delete(delete_lesson))
        .route("/edit/add-attenders/lesson/{id}", put(add_attenders))
        .route("/edit/delete-attenders", put(delete_attenders));
    Router::new().nest(BASE_PATH, lessons).with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, router(db)).await
}

fn authorize(headers: &HeaderMap, store: &Store) -> Result<(), ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;
    if store.tokens.contains(token) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

async fn list_user_lessons(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Lesson>>, ApiError> {
    let store = db.read().await;
    authorize(&headers, &store)?;
    if !store.users.contains_key(&user_id) {
        return Err(ApiError::NotFound(format!("user {user_id} not found")));
    }
    let lessons = store
        .lessons
        .values()
        .filter(|l| l.involves(user_id))
        .cloned()
        .collect();
    Ok(Json(lessons))
}

async fn get_lesson(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Lesson>, ApiError> {
    let store = db.read().await;
    authorize(&headers, &store)?;
    store
        .lessons
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("lesson {id} not found")))
}

/// Open endpoint: no bearer token required.
async fn create_lesson(
    State(db): State<Db>,
    Json(input): Json<Lesson>,
) -> (StatusCode, Json<Lesson>) {
    let mut store = db.write().await;
    store.next_lesson_id += 1;
    let id = store.next_lesson_id;
    let lesson = Lesson {
        id: Some(id),
        ..input
    };
    tracing::debug!(lesson_id = id, "lesson created");
    store.lessons.insert(id, lesson.clone());
    (StatusCode::CREATED, Json(lesson))
}

async fn update_lesson(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Lesson>,
) -> Result<Json<Lesson>, ApiError> {
    let mut store = db.write().await;
    authorize(&headers, &store)?;
    let id = input
        .id
        .ok_or_else(|| ApiError::BadRequest("lesson id is required".to_string()))?;
    let lesson = store.lesson_mut(id)?;
    *lesson = input;
    tracing::debug!(lesson_id = id, "lesson updated");
    Ok(Json(lesson.clone()))
}

async fn delete_lesson(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Lesson>, ApiError> {
    let mut store = db.write().await;
    authorize(&headers, &store)?;
    let removed = store
        .lessons
        .remove(&id)
        .ok_or_else(|| ApiError::NotFound(format!("lesson {id} not found")))?;
    tracing::debug!(lesson_id = id, "lesson deleted");
    Ok(Json(removed))
}

async fn add_attenders(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(emails): Json<Vec<String>>,
) -> Result<Json<Vec<User>>, ApiError> {
    let mut store = db.write().await;
    authorize(&headers, &store)?;
    let new_attenders: Vec<User> = emails
        .iter()
        .filter_map(|email| store.user_by_email(email).cloned())
        .collect();
    let lesson = store.lesson_mut(id)?;
    for user in new_attenders {
        if !lesson.attenders.iter().any(|a| a.id == user.id) {
            lesson.attenders.push(user);
        }
    }
    Ok(Json(lesson.attenders.clone()))
}

/// Removes the attenders listed in the submitted lesson.
async fn delete_attenders(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Lesson>,
) -> Result<Json<Vec<User>>, ApiError> {
    let mut store = db.write().await;
    authorize(&headers, &store)?;
    let id = input
        .id
        .ok_or_else(|| ApiError::BadRequest("lesson id is required".to_string()))?;
    let lesson = store.lesson_mut(id)?;
    lesson
        .attenders
        .retain(|a| !input.attenders.iter().any(|gone| gone.id == a.id));
    Ok(Json(lesson.attenders.clone()))
}
