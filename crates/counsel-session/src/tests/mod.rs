mod file_store;

use crate::{
    ApiError, ApiResult, AuthTransport, Identity, ManualClock, MemoryStore, SessionPolicy,
    SessionReconciler,
};

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;

/// Canned response for [`ScriptedTransport`]
pub(crate) enum Reply {
    Json(Value),
    Status(u16, Value),
    Network,
}

impl Reply {
    fn into_result(self) -> ApiResult<Value> {
        match self {
            Reply::Json(body) => Ok(body),
            Reply::Status(status, body) => {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request failed")
                    .to_string();
                Err(ApiError::status(status, message, None, body))
            }
            Reply::Network => Err(ApiError::network("connection refused")),
        }
    }
}

/// In-process transport with per-path reply queues.
///
/// Paths without a queued reply answer `{}`. `hold_next` parks the next
/// request until the returned `Notify` fires.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, Option<Value>)>>,
    hold: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push(&self, path: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    pub(crate) fn calls_to(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .count()
    }

    pub(crate) fn last_body(&self, path: &str) -> Option<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .and_then(|(_, body)| body.clone())
    }

    pub(crate) fn hold_next(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    async fn respond(&self, path: &str, body: Option<Value>) -> ApiResult<Value> {
        self.calls.lock().unwrap().push((path.to_string(), body));

        let hold = self.hold.lock().unwrap().take();
        if let Some(notify) = hold {
            notify.notified().await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(reply) => reply.into_result(),
            None => Ok(json!({})),
        }
    }
}

#[async_trait]
impl AuthTransport for ScriptedTransport {
    async fn get(&self, path: &str) -> ApiResult<Value> {
        self.respond(path, None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> ApiResult<Value> {
        self.respond(path, body).await
    }
}

pub(crate) struct Harness {
    pub(crate) reconciler: SessionReconciler,
    pub(crate) transport: Arc<ScriptedTransport>,
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) clock: ManualClock,
}

/// Policy with the short verification cache disabled so every call verifies
pub(crate) fn no_reuse_policy() -> SessionPolicy {
    SessionPolicy {
        verify_cache: Duration::ZERO,
        ..SessionPolicy::default()
    }
}

pub(crate) fn harness(policy: SessionPolicy) -> Harness {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    let clock = ManualClock::default();
    let reconciler = SessionReconciler::with_clock(
        transport.clone(),
        store.clone(),
        policy,
        Arc::new(clock.clone()),
    );

    Harness {
        reconciler,
        transport,
        store,
        clock,
    }
}

pub(crate) fn user_json(id: &str) -> Value {
    json!({
        "_id": id,
        "username": format!("user-{id}"),
        "email": format!("{id}@example.com"),
        "role": "lawyer",
        "firm": { "id": "F1", "name": "Firm One", "status": "active" }
    })
}

pub(crate) fn identity(id: &str) -> Identity {
    Identity::from_value(user_json(id)).unwrap()
}

pub(crate) fn login_reply(id: &str) -> Reply {
    Reply::Json(json!({
        "error": false,
        "message": "Success",
        "user": user_json(id),
        "accessToken": format!("access-{id}"),
        "refreshToken": format!("refresh-{id}"),
        "expiresIn": 900
    }))
}

pub(crate) fn me_reply(id: &str) -> Reply {
    Reply::Json(json!({ "error": false, "user": user_json(id) }))
}

pub(crate) fn unauthorized() -> Reply {
    Reply::Status(401, json!({ "error": true, "message": "Unauthorized" }))
}
