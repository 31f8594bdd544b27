//! Loopback redirect listener for interactive sign-in
//!
//! The authority redirects the browser to `http://localhost:{port}/callback`
//! after the user signs in; this server catches that redirect and hands the
//! authorization code back to the caller.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use axum::extract::Query;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use plumage_common::auth::AuthError;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::error;

/// Callback data captured from the authority's redirect.
#[derive(Debug, Clone)]
pub struct CallbackData {
    /// Authorization code to redeem at the token endpoint.
    pub code: String,
    /// State echoed back by the authority.
    pub state: String,
}

/// Loopback HTTP server that receives the sign-in redirect.
pub struct LoopbackServer {
    port: u16,
    callback_data: Arc<StdMutex<Option<CallbackData>>>,
    expected_state: Arc<StdMutex<Option<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl LoopbackServer {
    /// Start the loopback server on an ephemeral port.
    ///
    /// # Errors
    /// `AuthError::Network` when the listener cannot bind.
    pub async fn start() -> Result<Self, AuthError> {
        let listener = TcpListener::bind("127.0.0.1:0").await.map_err(|err| {
            AuthError::Network(format!("failed to bind sign-in loopback server: {err}"))
        })?;

        let port = listener
            .local_addr()
            .map_err(|err| AuthError::Network(format!("failed to determine port: {err}")))?
            .port();

        let callback_data = Arc::new(StdMutex::new(None));
        let expected_state = Arc::new(StdMutex::new(None));

        let callback_data_clone = callback_data.clone();
        let expected_state_clone = expected_state.clone();

        let app = Router::new().route(
            "/callback",
            get(move |query: Query<HashMap<String, String>>| {
                handle_callback(query, callback_data_clone.clone(), expected_state_clone.clone())
            }),
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
            {
                error!("sign-in loopback server error: {}", err);
            }
        });

        Ok(Self {
            port,
            callback_data,
            expected_state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Redirect URI to put in the authorization request.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.port)
    }

    /// Configure the state the redirect must echo back (CSRF validation).
    pub fn set_expected_state(&self, state: String) {
        let mut guard = self.expected_state.lock().expect("expected_state poisoned");
        *guard = Some(state);
    }

    /// Await the redirect and return the authorization code.
    ///
    /// # Errors
    /// `AuthError::Config` when no expected state was configured,
    /// `AuthError::StateMismatch` when the redirect carried the wrong state,
    /// `AuthError::Timeout` when no redirect arrives in time.
    pub async fn wait_for_code(&self, timeout: Duration) -> Result<String, AuthError> {
        let expected = {
            let guard = self.expected_state.lock().expect("expected_state poisoned");
            guard.clone().ok_or_else(|| {
                AuthError::Config("sign-in expected state not configured".to_string())
            })?
        };

        let deadline = Instant::now() + timeout;

        loop {
            {
                let data_guard = self.callback_data.lock().expect("callback_data poisoned");
                if let Some(data) = data_guard.clone() {
                    if data.state != expected {
                        return Err(AuthError::StateMismatch {
                            expected,
                            received: data.state,
                        });
                    }
                    return Ok(data.code);
                }
            }

            if Instant::now() > deadline {
                return Err(AuthError::Timeout(
                    "sign-in callback did not arrive with an authorization code".into(),
                ));
            }

            sleep(Duration::from_millis(100)).await;
        }
    }

    /// Shut down the loopback server gracefully.
    ///
    /// # Errors
    /// `AuthError::Network` when the server task panicked.
    pub async fn shutdown(mut self) -> Result<(), AuthError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    return Err(AuthError::Network(format!(
                        "sign-in loopback server panicked: {err}"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Drop for LoopbackServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                handle.abort();
            }
        }
    }
}

async fn handle_callback(
    Query(params): Query<HashMap<String, String>>,
    callback_data: Arc<StdMutex<Option<CallbackData>>>,
    expected_state: Arc<StdMutex<Option<String>>>,
) -> Html<&'static str> {
    let code = params.get("code").cloned();
    let state = params.get("state").cloned();
    let expected = expected_state.lock().expect("expected_state poisoned").clone();

    let (Some(code), Some(state)) = (code, state) else {
        return Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Sign-in Failed</title></head>
<body><h1>Sign-in Failed</h1><p>Missing callback parameters.</p></body>
</html>"#,
        );
    };

    let matches_expected = expected.as_deref() == Some(state.as_str());

    // Record the callback either way; wait_for_code reports the mismatch.
    let mut guard = callback_data.lock().expect("callback_data poisoned");
    if guard.is_none() {
        *guard = Some(CallbackData { code, state });
    }
    drop(guard);

    if matches_expected {
        Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Sign-in Complete</title></head>
<body><h1>Sign-in Successful</h1><p>You can close this window.</p></body>
</html>"#,
        )
    } else {
        Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Sign-in Failed</title></head>
<body><h1>Sign-in Failed</h1><p>Invalid or unexpected callback parameters.</p></body>
</html>"#,
        )
    }
}
