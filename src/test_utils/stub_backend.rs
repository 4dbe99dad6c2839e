//! A stand-in for the backend API.
//!
//! Tests build an `axum::Router` describing exactly the backend behaviour
//! they need, then point an [crate::ApiClient] at the returned base URL.

use axum::Router;

/// Serve `router` on an ephemeral local port and return its base URL,
/// e.g. "http://127.0.0.1:49152".
///
/// The server task is detached; it stops when the test's tokio runtime shuts
/// down.
pub(crate) async fn spawn_stub_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("could not bind stub backend listener");
    let address = listener
        .local_addr()
        .expect("could not get stub backend address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("stub backend exited with an error");
    });

    format!("http://{address}")
}
