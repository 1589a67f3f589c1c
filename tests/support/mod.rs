//! In-process stand-in for the checkrr backend, served with tiny_http on an
//! ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde_json::{Value, json};
use tiny_http::{Header, Response, Server, StatusCode};

use checkrr_dash::api::{BaseUrl, CheckrrClient};

/// A request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
    pub content_type: Option<String>,
}

/// Canned backend state. Bodies are served as-is, so `null` can stand in
/// for an empty collection the way the real backend sends it.
pub struct State {
    pub current: Value,
    pub schedule: Value,
    pub historical: Value,
    pub bad_files: Value,
    /// Path, or `"METHOD path"`, -> (status, raw body) served instead of the
    /// normal handler.
    pub overrides: HashMap<String, (u16, String)>,
    pub requests: Vec<Recorded>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            current: json!({ "running": false, "timeDiff": 0 }),
            schedule: Value::Null,
            historical: Value::Null,
            bad_files: Value::Null,
            overrides: HashMap::new(),
            requests: Vec::new(),
        }
    }
}

pub struct MockCheckrr {
    pub url: String,
    state: Arc<Mutex<State>>,
    server: Arc<Server>,
    thread: Option<JoinHandle<()>>,
}

impl MockCheckrr {
    pub fn start() -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind mock backend"));
        let addr = server.server_addr().to_ip().expect("ip listener");
        let state = Arc::new(Mutex::new(State::default()));

        let thread = {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            thread::spawn(move || {
                for mut request in server.incoming_requests() {
                    let method = request.method().to_string();
                    let path = request.url().to_string();
                    let content_type = request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv("Content-Type"))
                        .map(|h| h.value.as_str().to_string());
                    let mut body = String::new();
                    let _ = request.as_reader().read_to_string(&mut body);

                    let (status, reply) = {
                        let mut state = state.lock().unwrap();
                        state.requests.push(Recorded {
                            method: method.clone(),
                            path: path.clone(),
                            body: body.clone(),
                            content_type,
                        });
                        handle(&mut state, &method, &path, &body)
                    };

                    let header = Header::from_bytes("Content-Type", "application/json").unwrap();
                    let response = Response::from_string(reply)
                        .with_status_code(StatusCode(status))
                        .with_header(header);
                    let _ = request.respond(response);
                }
            })
        };

        Self {
            url: format!("http://{addr}/"),
            state,
            server,
            thread: Some(thread),
        }
    }

    pub fn client(&self) -> CheckrrClient {
        CheckrrClient::new(BaseUrl::parse(&self.url).unwrap())
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state().requests.clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Answer `path` with `status` and a raw body from now on.
    pub fn fail(&self, path: &str, status: u16, body: &str) {
        self.state()
            .overrides
            .insert(path.to_string(), (status, body.to_string()));
    }

    /// Like [`fail`](Self::fail), but only for GET requests.
    pub fn fail_get(&self, path: &str, status: u16, body: &str) {
        self.state()
            .overrides
            .insert(format!("GET {path}"), (status, body.to_string()));
    }

    pub fn heal(&self, path: &str) {
        let mut state = self.state();
        state.overrides.remove(path);
        state.overrides.remove(&format!("GET {path}"));
    }
}

impl Drop for MockCheckrr {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn handle(state: &mut State, method: &str, path: &str, body: &str) -> (u16, String) {
    let keyed = format!("{method} {path}");
    if let Some((status, raw)) = state
        .overrides
        .get(path)
        .or_else(|| state.overrides.get(&keyed))
    {
        return (*status, raw.clone());
    }

    match (method, path) {
        ("GET", "/api/stats/current") => (200, state.current.to_string()),
        ("GET", "/api/schedule") => (200, state.schedule.to_string()),
        ("GET", "/api/stats/historical") => (200, state.historical.to_string()),
        ("GET", "/api/files/bad") => (200, state.bad_files.to_string()),
        ("POST", "/api/run") => {
            if let Some(current) = state.current.as_object_mut() {
                current.insert("running".to_string(), Value::Bool(true));
            }
            (200, "{}".to_string())
        }
        ("POST", "/api/files/bad") => {
            let Ok(ids) = serde_json::from_str::<Vec<usize>>(body) else {
                return (400, json!({ "error": "bad ids" }).to_string());
            };
            // Ids are 1-based positions in the current listing.
            let rows = state.bad_files.as_array().cloned().unwrap_or_default();
            let kept: Vec<Value> = rows
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !ids.contains(&(i + 1)))
                .map(|(_, row)| row)
                .collect();
            state.bad_files = if kept.is_empty() {
                Value::Null
            } else {
                Value::Array(kept)
            };
            (200, "{}".to_string())
        }
        _ => (404, json!({ "error": "not found" }).to_string()),
    }
}

pub fn bad_file(path: &str, ext: &str, service: &str) -> Value {
    json!({
        "Path": path,
        "Data": { "fileExt": ext, "reacquire": true, "service": service }
    })
}

/// Poll `cond` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    cond()
}
