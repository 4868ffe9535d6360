// ABOUTME: In-process mock of the REST collaborator built on axum
// ABOUTME: Implements the account/token contract, records requests and injects delays and failures

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-pw";
pub const USER_EMAIL: &str = "user@example.com";
pub const USER_PASSWORD: &str = "user-pw";

#[derive(Debug, Clone)]
pub struct MockUser {
    pub id: u64,
    pub email: String,
    pub password: String,
    pub user_type: String,
}

#[derive(Debug, Clone)]
pub struct MockToken {
    pub id: u64,
    pub token_name: String,
    pub secret: String,
}

/// One request as the collaborator saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Default)]
struct Data {
    users: Vec<MockUser>,
    tokens: Vec<MockToken>,
    sessions: HashMap<String, u64>,
}

#[derive(Default)]
struct Faults {
    user_listing_delays: VecDeque<Duration>,
    delete_delay: Option<Duration>,
    own_password_delays: VecDeque<Duration>,
    fail_user_listings: bool,
    token_listing_body: Option<String>,
}

#[derive(Default)]
pub struct MockState {
    data: Mutex<Data>,
    faults: Mutex<Faults>,
    requests: Mutex<Vec<RecordedRequest>>,
    next_id: AtomicU64,
}

impl MockState {
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Running mock collaborator bound to an ephemeral port
pub struct MockCollaborator {
    pub base_url: String,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl Drop for MockCollaborator {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl MockCollaborator {
    /// Serve the contract at the root of the address
    pub async fn start() -> Self {
        Self::start_with_prefix("").await
    }

    /// Serve the contract beneath `prefix` (e.g. `/api`)
    pub async fn start_with_prefix(prefix: &str) -> Self {
        let state = Arc::new(MockState::default());
        seed_user(&state, ADMIN_EMAIL, ADMIN_PASSWORD, "admin");
        seed_user(&state, USER_EMAIL, USER_PASSWORD, "user");

        let routes = Router::new()
            .route("/token", post(login))
            .route("/register/", post(register))
            .route("/users/", get(list_users).post(create_user))
            .route("/users/me/password", put(change_own_password))
            .route("/users/:id", delete(delete_user))
            .route("/users/:id/type", put(change_user_type))
            .route("/users/:id/password", put(change_user_password))
            .route("/tokens/", get(list_tokens).post(create_token))
            .route("/tokens/:id", delete(delete_token))
            .with_state(state.clone());

        let router = if prefix.is_empty() {
            routes
        } else {
            Router::new().nest(prefix, routes)
        }
        .layer(middleware::from_fn_with_state(state.clone(), record));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock collaborator");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock collaborator");
        });

        Self {
            base_url: format!("http://{addr}{prefix}"),
            state,
            handle,
        }
    }

    pub fn add_user(&self, email: &str, password: &str, user_type: &str) -> u64 {
        seed_user(&self.state, email, password, user_type)
    }

    pub fn user_id(&self, email: &str) -> u64 {
        self.state
            .data
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.id)
            .expect("user exists")
    }

    pub fn user(&self, email: &str) -> Option<MockUser> {
        self.state
            .data
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    pub fn emails(&self) -> Vec<String> {
        let mut emails: Vec<String> = self
            .state
            .data
            .lock()
            .unwrap()
            .users
            .iter()
            .map(|u| u.email.clone())
            .collect();
        emails.sort();
        emails
    }

    pub fn token_names(&self) -> Vec<String> {
        self.state
            .data
            .lock()
            .unwrap()
            .tokens
            .iter()
            .map(|t| t.token_name.clone())
            .collect()
    }

    /// Issue a bearer credential for `email` without going through `/token`
    pub fn session_for(&self, email: &str) -> String {
        let id = self.user_id(email);
        let bearer = format!("session-{}", self.state.next_id());
        self.state
            .data
            .lock()
            .unwrap()
            .sessions
            .insert(bearer.clone(), id);
        bearer
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Each user listing takes the next delay; its snapshot is taken before sleeping
    pub fn delay_user_listings(&self, delays: Vec<Duration>) {
        self.state.faults.lock().unwrap().user_listing_delays = delays.into();
    }

    pub fn delay_deletes(&self, delay: Duration) {
        self.state.faults.lock().unwrap().delete_delay = Some(delay);
    }

    /// Each own-password change takes the next delay before it is applied
    pub fn delay_own_password_changes(&self, delays: Vec<Duration>) {
        self.state.faults.lock().unwrap().own_password_delays = delays.into();
    }

    pub fn fail_user_listings(&self, fail: bool) {
        self.state.faults.lock().unwrap().fail_user_listings = fail;
    }

    pub fn set_token_listing_body(&self, body: &str) {
        self.state.faults.lock().unwrap().token_listing_body = Some(body.to_owned());
    }
}

fn seed_user(state: &MockState, email: &str, password: &str, user_type: &str) -> u64 {
    let id = state.next_id();
    state.data.lock().unwrap().users.push(MockUser {
        id,
        email: email.to_owned(),
        password: password.to_owned(),
        user_type: user_type.to_owned(),
    });
    id
}

async fn record(State(state): State<Arc<MockState>>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_owned(),
        query: request.uri().query().map(ToOwned::to_owned),
        authorization: header_string(headers, header::AUTHORIZATION.as_str()),
        request_id: header_string(headers, "x-request-id"),
    };
    state.requests.lock().unwrap().push(recorded);
    next.run(request).await
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn user_json(user: &MockUser) -> Value {
    json!({ "id": user.id, "email": user.email, "user_type": user.user_type })
}

fn authenticate(state: &MockState, headers: &HeaderMap) -> Result<MockUser, Response> {
    let unauthorized = || detail(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    let bearer = header_string(headers, header::AUTHORIZATION.as_str())
        .and_then(|v| v.strip_prefix("Bearer ").map(ToOwned::to_owned))
        .ok_or_else(unauthorized)?;

    let data = state.data.lock().unwrap();
    let id = data.sessions.get(&bearer).copied().ok_or_else(unauthorized)?;
    data.users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .ok_or_else(unauthorized)
}

fn require_admin(state: &MockState, headers: &HeaderMap) -> Result<MockUser, Response> {
    let user = authenticate(state, headers)?;
    if user.user_type != "admin" {
        return Err(detail(StatusCode::FORBIDDEN, "Not enough permissions"));
    }
    Ok(user)
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Credentials>) -> Response {
    let mut data = state.data.lock().unwrap();
    let Some(id) = data
        .users
        .iter()
        .find(|u| u.email == body.username && u.password == body.password)
        .map(|u| u.id)
    else {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect username or password");
    };
    let bearer = format!("session-{}", state.next_id());
    data.sessions.insert(bearer.clone(), id);
    Json(json!({ "access_token": bearer, "token_type": "bearer" })).into_response()
}

#[derive(Deserialize)]
struct Registration {
    email: String,
    password: String,
}

async fn register(State(state): State<Arc<MockState>>, Json(body): Json<Registration>) -> Response {
    if state.data.lock().unwrap().users.iter().any(|u| u.email == body.email) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    let id = seed_user(&state, &body.email, &body.password, "user");
    Json(json!({ "id": id, "email": body.email, "user_type": "user" })).into_response()
}

async fn list_users(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    let (delay, fail) = {
        let mut faults = state.faults.lock().unwrap();
        (faults.user_listing_delays.pop_front(), faults.fail_user_listings)
    };
    if fail {
        return detail(StatusCode::SERVICE_UNAVAILABLE, "Listing unavailable");
    }
    let users: Vec<Value> = state.data.lock().unwrap().users.iter().map(user_json).collect();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    Json(users).into_response()
}

#[derive(Deserialize)]
struct NewUser {
    email: String,
    password: String,
    #[serde(rename = "type")]
    user_type: String,
}

async fn create_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<NewUser>,
) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    if !matches!(body.user_type.as_str(), "user" | "admin") {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "Invalid user type");
    }
    if state.data.lock().unwrap().users.iter().any(|u| u.email == body.email) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    let id = seed_user(&state, &body.email, &body.password, &body.user_type);
    Json(json!({ "id": id, "email": body.email, "user_type": body.user_type })).into_response()
}

async fn delete_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    let delay = state.faults.lock().unwrap().delete_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let mut data = state.data.lock().unwrap();
    let Some(index) = data.users.iter().position(|u| u.id == id) else {
        return detail(StatusCode::NOT_FOUND, "User not found");
    };
    let removed = data.users.remove(index);
    Json(user_json(&removed)).into_response()
}

#[derive(Deserialize)]
struct NewType {
    new_type: String,
}

async fn change_user_type(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<NewType>,
) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    if !matches!(body.new_type.as_str(), "user" | "admin") {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "Invalid user type");
    }
    let mut data = state.data.lock().unwrap();
    let Some(user) = data.users.iter_mut().find(|u| u.id == id) else {
        return detail(StatusCode::NOT_FOUND, "User not found");
    };
    user.user_type = body.new_type;
    Json(user_json(user)).into_response()
}

#[derive(Deserialize)]
struct PasswordChange {
    old_password: String,
    new_password: String,
}

fn apply_password_change(state: &MockState, id: u64, body: &PasswordChange) -> Response {
    let mut data = state.data.lock().unwrap();
    let Some(user) = data.users.iter_mut().find(|u| u.id == id) else {
        return detail(StatusCode::NOT_FOUND, "User not found");
    };
    if user.password != body.old_password {
        return detail(StatusCode::BAD_REQUEST, "Old password is incorrect");
    }
    user.password.clone_from(&body.new_password);
    Json(user_json(user)).into_response()
}

async fn change_own_password(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<PasswordChange>,
) -> Response {
    let delay = state.faults.lock().unwrap().own_password_delays.pop_front();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    match authenticate(&state, &headers) {
        Ok(user) => apply_password_change(&state, user.id, &body),
        Err(response) => response,
    }
}

async fn change_user_password(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<PasswordChange>,
) -> Response {
    let caller = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if caller.user_type != "admin" && caller.id != id {
        return detail(StatusCode::FORBIDDEN, "Not enough permissions");
    }
    apply_password_change(&state, id, &body)
}

async fn list_tokens(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    if let Some(body) = state.faults.lock().unwrap().token_listing_body.clone() {
        return (StatusCode::OK, body).into_response();
    }
    let tokens: Vec<Value> = state
        .data
        .lock()
        .unwrap()
        .tokens
        .iter()
        .map(|t| json!({ "id": t.id, "token_name": t.token_name, "expires_at": "2030-01-01T00:00:00" }))
        .collect();
    Json(tokens).into_response()
}

#[derive(Deserialize)]
struct NewToken {
    token_name: String,
}

async fn create_token(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<NewToken>,
) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    let id = state.next_id();
    let secret = format!("tok-secret-{id}");
    state.data.lock().unwrap().tokens.push(MockToken {
        id,
        token_name: body.token_name.clone(),
        secret: secret.clone(),
    });
    Json(json!({ "access_token": secret, "id": id, "token_name": body.token_name })).into_response()
}

async fn delete_token(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    let mut data = state.data.lock().unwrap();
    let Some(index) = data.tokens.iter().position(|t| t.id == id) else {
        return detail(StatusCode::NOT_FOUND, "Token not found");
    };
    let removed = data.tokens.remove(index);
    Json(json!({ "id": removed.id, "token_name": removed.token_name })).into_response()
}
