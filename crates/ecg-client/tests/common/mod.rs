//! Mock relay for client tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;

/// A multipart part as the mock relay received it.
#[derive(Clone, Debug)]
pub struct ReceivedPart {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Clone)]
struct MockRelay {
    status: StatusCode,
    body: String,
    received: Arc<Mutex<Vec<Vec<ReceivedPart>>>>,
}

/// Handle to a running mock relay.
pub struct MockRelayServer {
    pub base_url: String,
    received: Arc<Mutex<Vec<Vec<ReceivedPart>>>>,
}

impl MockRelayServer {
    /// Starts a relay on an ephemeral port that always answers `status` + `body`.
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = MockRelay {
            status,
            body: body.into(),
            received: received.clone(),
        };

        let app = Router::new()
            .route("/api/analyze", post(analyze))
            .with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock relay");
        let addr = listener.local_addr().expect("mock relay address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock relay");
        });

        Self {
            base_url: format!("http://{addr}"),
            received,
        }
    }

    /// Every request body received so far, one entry per request.
    pub fn requests(&self) -> Vec<Vec<ReceivedPart>> {
        self.received.lock().expect("lock").clone()
    }
}

async fn analyze(State(mock): State<MockRelay>, mut multipart: Multipart) -> Response {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.expect("field bytes").to_vec();
        parts.push(ReceivedPart {
            field: field_name,
            file_name,
            content_type,
            data,
        });
    }
    mock.received.lock().expect("lock").push(parts);

    (
        mock.status,
        [(header::CONTENT_TYPE, "application/json")],
        mock.body.clone(),
    )
        .into_response()
}
