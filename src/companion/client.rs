//! Companion WebSocket client
//!
//! One long-lived connection to the Companion WebSocket bridge. Calls are
//! correlated by id, variable pushes are cached and fanned out to change
//! handlers, button interactions go to button handlers. The connection is
//! re-established forever with a bounded back-off.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Map, Value};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use super::matcher::Matcher;
use super::protocol::{
    error_message, ButtonEvent, ButtonEventKind, ButtonLocation, Request, VariableChange,
    FIRST_CALL_ID, SNAPSHOT_REQUEST_ID,
};
use super::registry::{ButtonHandler, ChangeHandler, HandlerFuture, HandlerRegistry};
use super::snippets::{action_snippets, variable_snippets};
use super::variables::VariableStore;
use crate::config::CompanionConfig;
use crate::error::{IndirectorError, IndirectorResult};

const MAX_RECONNECT_SLEEP_SECS: u64 = 5;
const MAX_RECONNECT_DELAY_SECS: u64 = 10;

/// Where and how often editor snippets are regenerated
#[derive(Debug, Clone)]
pub struct SnippetSettings {
    pub path: PathBuf,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct CompanionSettings {
    pub url: String,
    pub request_timeout: Duration,
    pub surface_id: String,
    /// `None` disables snippet generation
    pub snippets: Option<SnippetSettings>,
}

impl CompanionSettings {
    pub fn from_config(config: &CompanionConfig) -> Self {
        Self {
            url: config.url.clone(),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            surface_id: config.surface_id.clone(),
            snippets: Some(SnippetSettings {
                path: config.snippets_path.clone(),
                delay: Duration::from_millis(config.snippet_delay_ms),
            }),
        }
    }
}

type Reply = Result<Value, String>;

struct PendingCall {
    method: String,
    reply: oneshot::Sender<Reply>,
}

struct Shared {
    settings: CompanionSettings,
    registry: RwLock<HandlerRegistry>,
    variables: RwLock<VariableStore>,
    pending: Mutex<HashMap<u64, PendingCall>>,
    next_id: AtomicU64,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    snippet_task: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Cheap to clone; all clones share one connection and one handler set.
#[derive(Clone)]
pub struct Companion {
    shared: Arc<Shared>,
}

impl Companion {
    pub fn new(settings: CompanionSettings) -> Self {
        Self {
            shared: Arc::new(Shared {
                settings,
                registry: RwLock::new(HandlerRegistry::default()),
                variables: RwLock::new(VariableStore::default()),
                pending: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(FIRST_CALL_ID),
                outbound: Mutex::new(None),
                snippet_task: Mutex::new(None),
            }),
        }
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.shared.outbound).is_some()
    }

    // ------------------------------------------------------------------
    // Handler registration
    // ------------------------------------------------------------------

    pub fn on_change<F, Fut>(&self, connection: impl Into<String>, matcher: Matcher, handler: F)
    where
        F: Fn(VariableChange) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let handler: ChangeHandler = Arc::new(move |change| -> HandlerFuture { Box::pin(handler(change)) });
        write(&self.shared.registry).add_change(connection.into(), matcher, handler);
    }

    pub fn on_button_down<F, Fut>(&self, location: ButtonLocation, handler: F)
    where
        F: Fn(ButtonEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_button(location, ButtonEventKind::Down, handler);
    }

    pub fn on_button_up<F, Fut>(&self, location: ButtonLocation, handler: F)
    where
        F: Fn(ButtonEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_button(location, ButtonEventKind::Up, handler);
    }

    pub fn on_rotate<F, Fut>(&self, location: ButtonLocation, handler: F)
    where
        F: Fn(ButtonEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_button(location, ButtonEventKind::Rotate, handler);
    }

    fn on_button<F, Fut>(&self, location: ButtonLocation, kind: ButtonEventKind, handler: F)
    where
        F: Fn(ButtonEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let handler: ButtonHandler = Arc::new(move |event| -> HandlerFuture { Box::pin(handler(event)) });
        write(&self.shared.registry).add_button(location, kind, handler);
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// Send a request and wait for its response.
    pub async fn call(&self, method: &str, params: Value) -> IndirectorResult<Value> {
        let outbound = lock(&self.shared.outbound)
            .clone()
            .ok_or(IndirectorError::NotConnected)?;

        let id = self.shared.next_id.fetch_add(1, Ordering::SeqCst);
        let text = serde_json::to_string(&Request::call(id, method, params))?;
        let (reply, response) = oneshot::channel();
        lock(&self.shared.pending).insert(
            id,
            PendingCall {
                method: method.to_string(),
                reply,
            },
        );

        if outbound.send(text).is_err() {
            lock(&self.shared.pending).remove(&id);
            return Err(IndirectorError::NotConnected);
        }
        drop(outbound);

        match tokio::time::timeout(self.shared.settings.request_timeout, response).await {
            Ok(Ok(Ok(result))) => Ok(result),
            Ok(Ok(Err(message))) => Err(IndirectorError::Remote {
                method: method.to_string(),
                message,
            }),
            // Sender dropped: the connection went away
            Ok(Err(_)) => Err(IndirectorError::NotConnected),
            Err(_) => {
                lock(&self.shared.pending).remove(&id);
                Err(IndirectorError::Timeout {
                    method: method.to_string(),
                })
            }
        }
    }

    /// `query` with `path` merged into the params.
    pub async fn query(&self, path: &str, params: Value) -> IndirectorResult<Value> {
        let mut merged = Map::new();
        merged.insert("path".to_string(), Value::String(path.to_string()));
        if let Value::Object(extra) = params {
            merged.extend(extra);
        }
        self.call("query", Value::Object(merged)).await
    }

    /// Run a connection action as if pressed on this client's surface.
    pub async fn action(&self, connection: &str, action_id: &str, options: Value) -> IndirectorResult<Value> {
        let options = if options.is_null() { json!({}) } else { options };
        self.call(
            "runConnectionAction",
            json!({
                "connectionName": connection,
                "actionId": action_id,
                "options": options,
                "extras": { "surfaceId": self.shared.settings.surface_id },
            }),
        )
        .await
    }

    /// Cached value of a variable, if it has been seen.
    pub fn var(&self, connection: &str, variable: &str) -> Option<Value> {
        read(&self.shared.variables).get(connection, variable).cloned()
    }

    // ------------------------------------------------------------------
    // Incoming messages
    // ------------------------------------------------------------------

    fn handle_text(&self, text: &str) {
        match serde_json::from_str::<Value>(text) {
            Ok(message) => self.handle_message(message),
            Err(e) => warn!(error = %e, "ignoring malformed frame"),
        }
    }

    fn handle_message(&self, message: Value) {
        if let Some(id) = message.get("id").and_then(Value::as_u64) {
            let pending = lock(&self.shared.pending).remove(&id);
            if let Some(pending) = pending {
                let reply = match message.get("error") {
                    Some(error) if message.get("result").is_none() => Err(error_message(error)),
                    _ => Ok(message.get("result").cloned().unwrap_or(Value::Null)),
                };
                debug!(id, method = %pending.method, "response");
                let _ = pending.reply.send(reply);
                return;
            }

            if id == SNAPSHOT_REQUEST_ID {
                if let Some(Value::Object(snapshot)) = message.get("result") {
                    let connections = {
                        let mut variables = write(&self.shared.variables);
                        variables.merge_snapshot(snapshot);
                        variables.connection_count()
                    };
                    info!(connections, "cached variables");
                    self.schedule_snippets();
                    return;
                }
            }
        }

        let payload = message.get("payload").cloned().unwrap_or(Value::Null);
        match message.get("event").and_then(Value::as_str) {
            Some("variables_changed") => self.variables_changed(&payload),
            Some("interaction") => self.interaction(&payload),
            Some("updateButtonState") => debug!(%payload, "button update"),
            Some(event) => info!(event, %payload, "unhandled event"),
            None => debug!(%message, "unhandled message"),
        }
    }

    fn variables_changed(&self, payload: &Value) {
        let Some(connections) = payload.as_object() else {
            return;
        };

        let mut created = false;
        for (connection, updates) in connections {
            let Some(updates) = updates.as_object() else {
                continue;
            };
            created |= write(&self.shared.variables).apply(connection, updates);

            for (variable, value) in updates {
                let handlers = read(&self.shared.registry).change_handlers(connection, variable);
                for handler in handlers {
                    let change = VariableChange {
                        connection: connection.clone(),
                        variable: variable.clone(),
                        value: value.clone(),
                    };
                    tokio::spawn(async move {
                        let (connection, variable) = (change.connection.clone(), change.variable.clone());
                        if let Err(e) = handler(change).await {
                            warn!(%connection, %variable, error = %e, "change handler failed");
                        }
                    });
                }
            }
        }

        if created {
            info!("new variables detected, regenerating snippets");
            self.schedule_snippets();
        }
    }

    fn interaction(&self, payload: &Value) {
        let Some(event) = ButtonEvent::from_interaction(payload) else {
            debug!(%payload, "ignoring interaction");
            return;
        };

        let handlers = read(&self.shared.registry).button_handlers(&event.location, event.kind);
        for handler in handlers {
            let event = event.clone();
            tokio::spawn(async move {
                let kind = event.kind.as_str();
                if let Err(e) = handler(event).await {
                    warn!(kind, error = %e, "button handler failed");
                }
            });
        }
    }

    // ------------------------------------------------------------------
    // Snippets
    // ------------------------------------------------------------------

    /// Regenerate snippets after the configured delay, unless a
    /// regeneration is already pending.
    fn schedule_snippets(&self) {
        let Some(settings) = &self.shared.settings.snippets else {
            return;
        };

        let mut task = lock(&self.shared.snippet_task);
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }

        let delay = settings.delay;
        let companion = self.clone();
        *task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = companion.generate_snippets().await {
                warn!(error = %e, "snippet generation failed");
            }
        }));
    }

    /// Build and write the snippet file now. Action snippets are skipped
    /// when `queryActions` fails.
    pub async fn generate_snippets(&self) -> IndirectorResult<()> {
        let Some(settings) = self.shared.settings.snippets.clone() else {
            return Ok(());
        };

        let names = read(&self.shared.variables).names();
        let mut snippets = variable_snippets(&names);
        match self.call("queryActions", json!({})).await {
            Ok(actions) => snippets.extend(action_snippets(&actions)),
            Err(e) => warn!(error = %e, "could not fetch action definitions"),
        }

        let count = snippets.len();
        write_snippets(&settings.path, snippets).await?;
        info!(path = %settings.path.display(), count, "snippets written");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Connection lifecycle
    // ------------------------------------------------------------------

    /// Connect and serve forever, reconnecting after failures.
    pub async fn run(&self) {
        let mut delay = 1;
        loop {
            match self.run_connection().await {
                Ok(()) => info!("connection closed"),
                Err(e) if e.is_connection_error() => {
                    warn!(error = %e, "connection lost");
                    tokio::time::sleep(Duration::from_secs(delay.min(MAX_RECONNECT_SLEEP_SECS))).await;
                    delay = (delay + 1).min(MAX_RECONNECT_DELAY_SECS);
                    continue;
                }
                Err(e) => error!(error = %e, "unexpected connection error"),
            }
            tokio::time::sleep(Duration::from_secs(delay.min(MAX_RECONNECT_SLEEP_SECS))).await;
        }
    }

    /// Serve one connection until it closes or fails.
    pub async fn run_connection(&self) -> IndirectorResult<()> {
        let (stream, _) = connect_async(self.shared.settings.url.as_str()).await?;
        info!(url = %self.shared.settings.url, "connected to Companion");

        let (mut sink, mut source) = stream.split();
        let (outbound, mut queue) = mpsc::unbounded_channel::<String>();
        outbound
            .send(serde_json::to_string(&Request::snapshot())?)
            .map_err(|_| IndirectorError::NotConnected)?;
        *lock(&self.shared.outbound) = Some(outbound);

        let writer = tokio::spawn(async move {
            while let Some(text) = queue.recv().await {
                if let Err(e) = sink.send(Message::Text(text)).await {
                    warn!(error = %e, "send failed");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let result = loop {
            match source.next().await {
                Some(Ok(Message::Text(text))) => self.handle_text(&text),
                Some(Ok(Message::Close(_))) | None => break Ok(()),
                Some(Ok(_)) => {}
                Some(Err(e)) => break Err(e.into()),
            }
        };

        self.disconnect();
        writer.abort();
        result
    }

    /// Drop the outbound queue and fail every pending call.
    fn disconnect(&self) {
        lock(&self.shared.outbound).take();
        lock(&self.shared.pending).clear();
    }

    #[cfg(test)]
    fn attach(&self) -> mpsc::UnboundedReceiver<String> {
        let (outbound, queue) = mpsc::unbounded_channel();
        *lock(&self.shared.outbound) = Some(outbound);
        queue
    }
}

async fn write_snippets(path: &Path, snippets: Map<String, Value>) -> IndirectorResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let text = serde_json::to_string_pretty(&Value::Object(snippets))?;
    tokio::fs::write(path, text).await?;
    Ok(())
}
