// Local HTTP server standing in for the analysis backend

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// A request the mock server received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string
    pub url: String,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone)]
struct Route {
    status: u16,
    body: String,
    delay: Duration,
}

/// Serves canned JSON per path until dropped. Unknown paths get a 404.
pub struct MockBackend {
    url: String,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    stop_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockBackend {
    pub fn start() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("Failed to start test server");
        let port = server.server_addr().to_ip().unwrap().port();
        let url = format!("http://127.0.0.1:{}", port);

        let routes: Arc<Mutex<HashMap<String, Route>>> = Arc::new(Mutex::new(HashMap::new()));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread_routes = routes.clone();
        let thread_requests = requests.clone();
        let handle = thread::spawn(move || loop {
            if stop_rx.try_recv().is_ok() {
                break;
            }
            match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(mut request)) => {
                    let mut raw = String::new();
                    let _ = request.as_reader().read_to_string(&mut raw);
                    let url = request.url().to_string();
                    thread_requests.lock().unwrap().push(RecordedRequest {
                        method: request.method().to_string(),
                        url: url.clone(),
                        body: serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null),
                    });

                    let path = url.split('?').next().unwrap_or("").to_string();
                    let route = thread_routes.lock().unwrap().get(&path).cloned();
                    let route = route.unwrap_or(Route {
                        status: 404,
                        body: r#"{"error": "Not found"}"#.to_string(),
                        delay: Duration::ZERO,
                    });
                    if !route.delay.is_zero() {
                        thread::sleep(route.delay);
                    }
                    let response = tiny_http::Response::from_string(route.body)
                        .with_status_code(route.status)
                        .with_header(
                            tiny_http::Header::from_bytes(
                                &b"Content-Type"[..],
                                &b"application/json"[..],
                            )
                            .unwrap(),
                        );
                    let _ = request.respond(response);
                }
                Ok(None) => {}
                Err(_) => break,
            }
        });

        Self {
            url,
            routes,
            requests,
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Base URL to configure the client with
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Answer `path` (e.g. `/api/fix-issues`) with `status` and a JSON body
    pub fn route(&self, path: &str, status: u16, body: serde_json::Value) {
        self.route_delayed(path, status, body, Duration::ZERO);
    }

    /// Like [`route`](Self::route), but wait `delay` before answering
    pub fn route_delayed(&self, path: &str, status: u16, body: serde_json::Value, delay: Duration) {
        self.routes.lock().unwrap().insert(
            path.to_string(),
            Route {
                status,
                body: body.to_string(),
                delay,
            },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests made to `path`, ignoring the query string
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.split('?').next() == Some(path))
            .collect()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
