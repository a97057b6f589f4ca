// Integration tests for the WebDriver client against an in-process fake remote end.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use rr_protocol::{ChromeOptions, NewSessionParams};
use rr_runtime::{DriverError, WebDriverClient};
use serde_json::{Value, json};
use tokio::sync::Mutex;

#[derive(Default)]
struct FakeState {
	current_url: String,
	typed: Vec<String>,
	clicks: usize,
	deleted: bool,
}

type Shared = Arc<Mutex<FakeState>>;

async fn status() -> Json<Value> {
	Json(json!({ "value": { "ready": true, "message": "ChromeDriver ready for new sessions." } }))
}

async fn new_session(Json(body): Json<Value>) -> Json<Value> {
	assert_eq!(body["capabilities"]["alwaysMatch"]["browserName"], "chrome");
	Json(json!({ "value": { "sessionId": "s1", "capabilities": {} } }))
}

async fn navigate(State(state): State<Shared>, Path(_id): Path<String>, Json(body): Json<Value>) -> Json<Value> {
	state.lock().await.current_url = body["url"].as_str().unwrap_or_default().to_string();
	Json(json!({ "value": null }))
}

async fn current_url(State(state): State<Shared>, Path(_id): Path<String>) -> Json<Value> {
	Json(json!({ "value": state.lock().await.current_url }))
}

async fn timeouts(Path(_id): Path<String>) -> Json<Value> {
	Json(json!({ "value": null }))
}

async fn find_element(Path(_id): Path<String>, Json(body): Json<Value>) -> impl IntoResponse {
	if body["value"] == "[name=\"airstation_uname\"]" {
		(StatusCode::OK, Json(json!({ "value": { "element-6066-11e4-a52f-4f8e9c4c8b7b": "e1" } })))
	} else {
		(
			StatusCode::NOT_FOUND,
			Json(json!({ "value": { "error": "no such element", "message": "Unable to locate element", "stacktrace": "" } })),
		)
	}
}

async fn element_value(State(state): State<Shared>, Path((_id, _el)): Path<(String, String)>, Json(body): Json<Value>) -> Json<Value> {
	state.lock().await.typed.push(body["text"].as_str().unwrap_or_default().to_string());
	Json(json!({ "value": null }))
}

async fn element_click(State(state): State<Shared>, Path((_id, _el)): Path<(String, String)>) -> Json<Value> {
	state.lock().await.clicks += 1;
	Json(json!({ "value": null }))
}

async fn element_clear(Path((_id, _el)): Path<(String, String)>) -> Json<Value> {
	Json(json!({ "value": null }))
}

async fn delete_session(State(state): State<Shared>, Path(_id): Path<String>) -> Json<Value> {
	state.lock().await.deleted = true;
	Json(json!({ "value": null }))
}

async fn start_fake_remote() -> (String, Shared) {
	let state: Shared = Arc::default();
	let app = Router::new()
		.route("/status", get(status))
		.route("/session", post(new_session))
		.route("/session/{id}", delete(delete_session))
		.route("/session/{id}/url", post(navigate).get(current_url))
		.route("/session/{id}/timeouts", post(timeouts))
		.route("/session/{id}/element", post(find_element))
		.route("/session/{id}/element/{el}/value", post(element_value))
		.route("/session/{id}/element/{el}/click", post(element_click))
		.route("/session/{id}/element/{el}/clear", post(element_clear))
		.with_state(state.clone());

	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});
	(format!("http://{}", addr), state)
}

#[tokio::test]
async fn status_reports_ready() {
	let (base, _state) = start_fake_remote().await;
	let client = WebDriverClient::new(base, Duration::from_secs(5)).unwrap();
	let status = client.status().await.unwrap();
	assert!(status.ready);
}

#[tokio::test]
async fn session_round_trip_drives_login_form() -> anyhow::Result<()> {
	let (base, state) = start_fake_remote().await;
	let client = WebDriverClient::new(format!("{}/", base), Duration::from_secs(5))?;

	let session = client.new_session(&NewSessionParams::chrome(ChromeOptions::default(), None)).await?;
	assert_eq!(session.id(), "s1");

	session.navigate("http://192.168.11.1/login.html", Duration::from_secs(10)).await?;
	assert_eq!(session.current_url().await?, "http://192.168.11.1/login.html");

	let field = session.find_element("[name=\"airstation_uname\"]").await?;
	assert_eq!(field.id, "e1");
	session.clear(&field).await?;
	session.send_keys(&field, "admin").await?;
	session.click(&field).await?;
	session.delete().await?;

	let state = state.lock().await;
	assert_eq!(state.typed, vec!["admin".to_string()]);
	assert_eq!(state.clicks, 1);
	assert!(state.deleted);
	Ok(())
}

#[tokio::test]
async fn missing_element_surfaces_w3c_error_code() {
	let (base, _state) = start_fake_remote().await;
	let client = WebDriverClient::new(base, Duration::from_secs(5)).unwrap();
	let session = client.new_session(&NewSessionParams::chrome(ChromeOptions::default(), None)).await.unwrap();

	let err = session.find_element("[name=\"reboot\"]").await.unwrap_err();
	assert!(err.is_no_such_element(), "unexpected error: {err}");
	assert!(matches!(err, DriverError::Remote { status: 404, .. }));
}

#[tokio::test]
async fn unreachable_remote_is_a_transport_error() {
	let port = rr_runtime::process::free_port().unwrap();
	let client = WebDriverClient::new(format!("http://127.0.0.1:{}", port), Duration::from_secs(2)).unwrap();
	let err = client.status().await.unwrap_err();
	assert!(matches!(err, DriverError::Transport { .. }), "unexpected error: {err}");
}
