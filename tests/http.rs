use axum::{routing::post, Json, Router};
use chrono::Local;
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const PASSWORD: &str = "secret123";

#[derive(Debug, Deserialize)]
struct Progress {
    taken: usize,
    total: usize,
    percentage: u8,
    complete: bool,
}

#[derive(Debug, Deserialize)]
struct Dose {
    medication_id: String,
    time_label: String,
    key: String,
    taken_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScheduleView {
    date: String,
    doses: Vec<Dose>,
    progress: Progress,
    notice: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TakenResponse {
    key: String,
    taken_at: String,
    schedule: Option<ScheduleView>,
}

#[derive(Debug, Deserialize)]
struct WaterProgress {
    ml: u32,
    percent: u8,
    level: String,
}

struct TestServer {
    base_url: String,
    data_path: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));
static BACKEND_URL: Lazy<String> = Lazy::new(start_mock_backend);
static NEXT_USER: AtomicU64 = AtomicU64::new(1);

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

/// In-process stand-in for the remote health backend.
mod mock_backend {
    use super::*;

    static MEDICATIONS: Lazy<std::sync::Mutex<HashMap<String, Vec<Value>>>> =
        Lazy::new(|| std::sync::Mutex::new(HashMap::new()));
    static NEXT_ID: AtomicU64 = AtomicU64::new(100);

    pub fn router() -> Router {
        Router::new()
            .route("/login", post(login))
            .route("/medication/get", post(get_medications))
            .route("/medication/add", post(add_medication))
            .route("/chat", post(chat))
    }

    async fn login(Json(body): Json<Value>) -> Json<Value> {
        if body["password"] != PASSWORD {
            return Json(json!({ "status": "error", "msg": "Invalid email or password" }));
        }
        Json(json!({
            "status": "success",
            "msg": "Login successful",
            "user": { "email": body["email"], "name": "Test User", "age": 30 }
        }))
    }

    async fn get_medications(Json(body): Json<Value>) -> Json<Value> {
        let email = body["email"].as_str().unwrap_or_default().to_string();
        let meds = MEDICATIONS.lock().unwrap();
        Json(Value::Array(meds.get(&email).cloned().unwrap_or_default()))
    }

    async fn add_medication(Json(body): Json<Value>) -> Json<Value> {
        let email = body["email"].as_str().unwrap_or_default().to_string();
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let record = json!({
            "id": id,
            "name": body["name"],
            "dosage": body["dosage"],
            "frequency": body["frequency"],
            "duration": body["duration"],
        });
        MEDICATIONS.lock().unwrap().entry(email).or_default().push(record);
        Json(json!({ "status": "success", "msg": "Medication added" }))
    }

    async fn chat(Json(body): Json<Value>) -> Json<Value> {
        let question = body["question"].as_str().unwrap_or_default();
        Json(json!({ "reply": format!("You asked: {question}") }))
    }
}

fn start_mock_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock backend");
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("mock backend runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, mock_backend::router()).await.unwrap();
        });
    });

    format!("http://{addr}")
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("health_tracker_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

fn unique_email() -> String {
    let n = NEXT_USER.fetch_add(1, Ordering::SeqCst);
    format!("patient{}_{n}@gmail.com", std::process::id())
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/session")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_health_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", &data_path)
        .env("HEALTH_API_URL", BACKEND_URL.as_str())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_path,
        child,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn login(client: &Client, server: &TestServer) -> String {
    let email = unique_email();
    let response = client
        .post(format!("{}/api/login", server.base_url))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    email
}

async fn add_medication(client: &Client, server: &TestServer, name: &str, frequency: &str) {
    let response = client
        .post(format!("{}/api/medications", server.base_url))
        .json(&json!({ "name": name, "dosage": "1 tablet", "frequency": frequency, "duration": "14" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn schedule(client: &Client, server: &TestServer) -> ScheduleView {
    client
        .get(format!("{}/api/schedule", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn mark_taken(client: &Client, server: &TestServer, dose: &Dose) -> ScheduleView {
    let response = client
        .post(format!("{}/api/schedule/taken", server.base_url))
        .json(&json!({ "medication_id": dose.medication_id, "time_label": dose.time_label }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let reply: TakenResponse = response.json().await.unwrap();
    assert_eq!(reply.key, dose.key);
    assert!(!reply.taken_at.is_empty());
    reply.schedule.expect("schedule refreshed after marking")
}

#[tokio::test]
async fn http_schedule_requires_login() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/logout", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/api/schedule", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn http_login_rejects_bad_password() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/login", server.base_url))
        .json(&json!({ "email": unique_email(), "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.text().await.unwrap(), "Invalid email or password");
}

#[tokio::test]
async fn http_new_user_has_empty_schedule() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    login(&client, &server).await;

    let view = schedule(&client, &server).await;
    assert!(view.doses.is_empty());
    assert_eq!(view.notice.as_deref(), Some("no_medications"));
    assert_eq!(view.progress.total, 0);
    assert_eq!(view.progress.percentage, 0);
    assert!(!view.progress.complete);
}

#[tokio::test]
async fn http_marking_doses_updates_progress() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    login(&client, &server).await;

    add_medication(&client, &server, "Metformin", "08:00 AM, 08:00 PM").await;
    add_medication(&client, &server, "Vitamin D", "09:00 AM").await;

    let view = schedule(&client, &server).await;
    assert_eq!(view.date, Local::now().date_naive().to_string());
    let labels: Vec<_> = view.doses.iter().map(|dose| dose.time_label.as_str()).collect();
    assert_eq!(labels, vec!["08:00 AM", "08:00 PM", "09:00 AM"]);
    assert_eq!(view.progress.total, 3);
    assert_eq!(view.progress.taken, 0);

    let view = mark_taken(&client, &server, &view.doses[0]).await;
    assert!(view.doses[0].taken_at.is_some());
    assert!(view.doses[1].taken_at.is_none());
    assert_eq!(view.progress.taken, 1);
    assert_eq!(view.progress.percentage, 33);

    let view = mark_taken(&client, &server, &view.doses[1]).await;
    let view = mark_taken(&client, &server, &view.doses[2]).await;
    assert_eq!(view.progress.taken, 3);
    assert_eq!(view.progress.percentage, 100);
    assert!(view.progress.complete);
}

#[tokio::test]
async fn http_taken_doses_are_persisted_per_user_and_day() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let email = login(&client, &server).await;

    add_medication(&client, &server, "Aspirin", " 07:30 AM ").await;
    let view = schedule(&client, &server).await;
    let dose = &view.doses[0];
    assert_eq!(dose.key, format!("{}_07:30 AM", dose.medication_id));
    mark_taken(&client, &server, dose).await;

    let raw = std::fs::read_to_string(&server.data_path).unwrap();
    let storage: HashMap<String, String> = serde_json::from_str(&raw).unwrap();
    let key = format!("medTaken_{email}_{}", Local::now().date_naive().format("%Y-%m-%d"));
    let record: HashMap<String, String> = serde_json::from_str(&storage[&key]).unwrap();
    assert!(record.contains_key(&dose.key));
    assert!(storage.contains_key("currentUser"));
}

#[tokio::test]
async fn http_medication_form_is_validated() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    login(&client, &server).await;

    let response = client
        .post(format!("{}/api/medications", server.base_url))
        .json(&json!({ "name": "Ibuprofen", "dosage": "200mg", "frequency": "", "duration": "5" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let view = schedule(&client, &server).await;
    assert!(view.doses.is_empty());
}

#[tokio::test]
async fn http_water_is_tracked_for_today() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    login(&client, &server).await;

    let water: WaterProgress = client
        .post(format!("{}/api/water", server.base_url))
        .json(&json!({ "ml": 1500 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(water.percent, 50);
    assert_eq!(water.level, "medium");

    let water: WaterProgress = client
        .get(format!("{}/api/water", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(water.ml, 1500);

    let water: WaterProgress = client
        .post(format!("{}/api/water", server.base_url))
        .json(&json!({ "ml": 1500.5 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(water.ml, 1501);

    let response = client
        .post(format!("{}/api/water", server.base_url))
        .json(&json!({ "ml": 20000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_chat_relays_backend_reply() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let reply: Value = client
        .post(format!("{}/api/chat", server.base_url))
        .json(&json!({ "question": "  How much water?  " }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply["reply"], "You asked: How much water?");
}
