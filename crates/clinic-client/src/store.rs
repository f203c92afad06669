//! Application store: one task owns the session and the query cache.
//!
//! Every state change goes through the task's mailbox, so transitions are
//! applied one at a time and never race each other. Handles talk to the task
//! over an unbounded channel and receive answers on oneshot channels.
//!
//! HTTP requests for queries run on spawned tasks. Their token is captured from
//! the session at the moment the request is issued, and their outcome is posted
//! back to the mailbox tagged with the request id the cache handed out.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use clinic_core::Tag;
use clinic_core::models::User;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::cache::{CacheEntry, CacheKey, Lookup, QueryCache, RequestId};
use crate::endpoint::{MutationDef, QueryDef};
use crate::error::{ClientError, Result};
use crate::http::ApiClient;
use crate::session::{Session, SessionStore};

const EVENT_CAPACITY: usize = 256;

/// Synchronous state transitions accepted by [`Store::dispatch`].
#[derive(Debug, Clone)]
pub enum Action {
    SetCredentials { user: User, token: String },
    Logout,
    Invalidate(Vec<Tag>),
}

/// Notifications published after the store changed.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    SessionChanged(Session),
    QueryUpdated(CacheEntry),
    Invalidated(Vec<Tag>),
    CachePurged,
}

/// Point-in-time copy of everything the store holds.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: Session,
    pub queries: BTreeMap<CacheKey, CacheEntry>,
}

impl AppState {
    pub fn query(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.queries.get(key)
    }

    /// Entries belonging to one resource slice
    pub fn slice<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CacheEntry> + 'a {
        self.queries
            .values()
            .filter(move |entry| entry.key.slice() == name)
    }
}

enum Command {
    Dispatch {
        action: Action,
        reply: oneshot::Sender<Result<AppState>>,
    },
    Query {
        def: QueryDef,
        force: bool,
        reply: oneshot::Sender<CacheEntry>,
    },
    Settled {
        key: CacheKey,
        request: RequestId,
        tags: Vec<Tag>,
        outcome: std::result::Result<Value, String>,
    },
    Subscribe {
        def: QueryDef,
        reply: oneshot::Sender<watch::Receiver<CacheEntry>>,
    },
    Unsubscribe(CacheKey),
    Session(oneshot::Sender<Session>),
    State(oneshot::Sender<AppState>),
}

/// Cloneable handle to the store task.
#[derive(Clone)]
pub struct Store {
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<StoreEvent>,
    api: Arc<ApiClient>,
}

impl Store {
    /// Start the store task. Must be called inside a Tokio runtime. The task
    /// stops once every handle and subscription is dropped.
    pub fn spawn(api: ApiClient, session: SessionStore) -> Self {
        let api = Arc::new(api);
        let (commands, mailbox) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let task = StoreTask {
            api: Arc::clone(&api),
            session,
            cache: QueryCache::new(),
            defs: HashMap::new(),
            waiters: HashMap::new(),
            watchers: HashMap::new(),
            events: events.clone(),
            mailbox: commands.downgrade(),
        };
        tokio::spawn(task.run(mailbox));

        Self {
            commands,
            events,
            api,
        }
    }

    async fn call<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(build(tx))
            .map_err(|_| ClientError::StoreClosed)?;
        rx.await.map_err(|_| ClientError::StoreClosed)
    }

    /// Apply an action and return the resulting state
    pub async fn dispatch(&self, action: Action) -> Result<AppState> {
        self.call(|reply| Command::Dispatch { action, reply }).await?
    }

    /// Serve a query from cache, join an in-flight request, or issue one.
    /// Resolves once the entry has settled.
    pub async fn query(&self, def: QueryDef) -> Result<CacheEntry> {
        self.call(|reply| Command::Query {
            def,
            force: false,
            reply,
        })
        .await
    }

    /// Always issue a new request; it supersedes any in flight for the key.
    pub async fn refetch(&self, def: QueryDef) -> Result<CacheEntry> {
        self.call(|reply| Command::Query {
            def,
            force: true,
            reply,
        })
        .await
    }

    /// Keep a query live: it is fetched now and refetched whenever one of its
    /// tags is invalidated, until the returned subscription is dropped.
    pub async fn subscribe_query(&self, def: QueryDef) -> Result<QuerySubscription> {
        let key = def.key();
        let receiver = self.call(|reply| Command::Subscribe { def, reply }).await?;
        Ok(QuerySubscription {
            key,
            receiver,
            commands: self.commands.clone(),
        })
    }

    /// Run a mutation with the current token. On success its tags are
    /// invalidated before this returns. Failures leave the cache untouched.
    pub async fn mutate(&self, def: MutationDef) -> Result<Value> {
        let token = if def.is_authenticated() {
            self.session().await?.token().map(str::to_owned)
        } else {
            None
        };

        tracing::debug!(mutation = %def.name(), path = def.path(), "Sending mutation");
        let value = match self
            .api
            .send(def.method().clone(), def.path(), def.body(), token.as_deref())
            .await
        {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(mutation = %def.name(), error = %e, "Mutation failed");
                return Err(e);
            }
        };

        if !def.invalidated_tags().is_empty() {
            self.dispatch(Action::Invalidate(def.invalidated_tags().to_vec()))
                .await?;
        }
        Ok(value)
    }

    pub async fn session(&self) -> Result<Session> {
        self.call(Command::Session).await
    }

    pub async fn state(&self) -> Result<AppState> {
        self.call(Command::State).await
    }

    /// Receive every [`StoreEvent`] published from now on
    pub fn events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}

/// Live view of one query. Dropping it releases the subscription.
pub struct QuerySubscription {
    key: CacheKey,
    receiver: watch::Receiver<CacheEntry>,
    commands: mpsc::UnboundedSender<Command>,
}

impl QuerySubscription {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn current(&self) -> CacheEntry {
        self.receiver.borrow().clone()
    }

    /// Wait for the next published change
    pub async fn changed(&mut self) -> Result<CacheEntry> {
        self.receiver
            .changed()
            .await
            .map_err(|_| ClientError::StoreClosed)?;
        Ok(self.current())
    }

    /// Wait until the entry satisfies `predicate`, checking the current value first
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&CacheEntry) -> bool,
    ) -> Result<CacheEntry> {
        let entry = self
            .receiver
            .wait_for(predicate)
            .await
            .map_err(|_| ClientError::StoreClosed)?;
        Ok(entry.clone())
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Unsubscribe(self.key.clone()));
    }
}

struct StoreTask {
    api: Arc<ApiClient>,
    session: SessionStore,
    cache: QueryCache,
    /// Definitions of subscribed queries, used to refetch on invalidation
    defs: HashMap<CacheKey, QueryDef>,
    waiters: HashMap<CacheKey, Vec<oneshot::Sender<CacheEntry>>>,
    watchers: HashMap<CacheKey, watch::Sender<CacheEntry>>,
    events: broadcast::Sender<StoreEvent>,
    mailbox: mpsc::WeakUnboundedSender<Command>,
}

impl StoreTask {
    async fn run(mut self, mut mailbox: mpsc::UnboundedReceiver<Command>) {
        tracing::debug!("Store task started");
        while let Some(command) = mailbox.recv().await {
            self.handle(command);
        }
        tracing::debug!("Store task stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Dispatch { action, reply } => {
                let result = self.apply(action).map(|()| self.state());
                let _ = reply.send(result);
            }
            Command::Query { def, force, reply } => self.query(def, force, Some(reply)),
            Command::Settled {
                key,
                request,
                tags,
                outcome,
            } => self.settle(key, request, &tags, outcome),
            Command::Subscribe { def, reply } => self.subscribe(def, reply),
            Command::Unsubscribe(key) => {
                if self.cache.unsubscribe(&key) == 0 {
                    self.defs.remove(&key);
                    self.watchers.remove(&key);
                    tracing::debug!(key = %key, "Last subscriber left");
                }
            }
            Command::Session(reply) => {
                let _ = reply.send(self.session.session().clone());
            }
            Command::State(reply) => {
                let _ = reply.send(self.state());
            }
        }
    }

    fn state(&self) -> AppState {
        AppState {
            session: self.session.session().clone(),
            queries: self
                .cache
                .entries()
                .map(|entry| (entry.key.clone(), entry.clone()))
                .collect(),
        }
    }

    fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::SetCredentials { user, token } => {
                let switching = self
                    .session
                    .session()
                    .token()
                    .is_some_and(|current| current != token);
                self.session.set_credentials(user, token)?;
                if switching {
                    self.purge();
                }
                self.emit(StoreEvent::SessionChanged(self.session.session().clone()));
            }
            Action::Logout => {
                self.session.logout();
                self.purge();
                self.emit(StoreEvent::SessionChanged(self.session.session().clone()));
            }
            Action::Invalidate(tags) => self.invalidate(tags),
        }
        Ok(())
    }

    fn query(&mut self, def: QueryDef, force: bool, reply: Option<oneshot::Sender<CacheEntry>>) {
        let key = def.key();
        match self.cache.begin(&key, def.tags(), force) {
            Lookup::Fresh(entry) => {
                if let Some(reply) = reply {
                    let _ = reply.send(entry);
                }
            }
            Lookup::Pending => {
                tracing::trace!(key = %key, "Joining in-flight request");
                if let Some(reply) = reply {
                    self.waiters.entry(key).or_default().push(reply);
                }
            }
            Lookup::Fetch(request) => {
                if let Some(reply) = reply {
                    self.waiters.entry(key.clone()).or_default().push(reply);
                }
                self.publish(&key);
                self.spawn_fetch(def, key, request);
            }
        }
    }

    fn spawn_fetch(&self, def: QueryDef, key: CacheKey, request: RequestId) {
        let Some(mailbox) = self.mailbox.upgrade() else {
            return;
        };
        let api = Arc::clone(&self.api);
        let token = if def.is_authenticated() {
            self.session.session().token().map(str::to_owned)
        } else {
            None
        };

        tracing::debug!(key = %key, request, "Issuing query request");
        tokio::spawn(async move {
            let outcome = api
                .get(def.path(), def.query(), token.as_deref())
                .await
                .map(|value| def.apply(value))
                .map_err(|e| e.user_message());
            let _ = mailbox.send(Command::Settled {
                key,
                request,
                tags: def.tags().to_vec(),
                outcome,
            });
        });
    }

    fn settle(
        &mut self,
        key: CacheKey,
        request: RequestId,
        tags: &[Tag],
        outcome: std::result::Result<Value, String>,
    ) {
        let settled = match outcome {
            Ok(data) => self.cache.fulfill(&key, request, data, tags).cloned(),
            Err(message) => {
                tracing::warn!(key = %key, request, error = %message, "Query failed");
                self.cache.reject(&key, request, message).cloned()
            }
        };

        let Some(entry) = settled else {
            tracing::debug!(key = %key, request, "Discarding superseded response");
            return;
        };

        if let Some(waiters) = self.waiters.remove(&key) {
            for waiter in waiters {
                let _ = waiter.send(entry.clone());
            }
        }
        self.publish(&key);
    }

    fn subscribe(&mut self, def: QueryDef, reply: oneshot::Sender<watch::Receiver<CacheEntry>>) {
        let key = def.key();
        let count = self.cache.subscribe(&key);
        self.defs.insert(key.clone(), def.clone());

        let receiver = match self.watchers.get(&key) {
            Some(sender) => sender.subscribe(),
            None => {
                let (sender, receiver) = watch::channel(self.cache.snapshot(&key));
                self.watchers.insert(key.clone(), sender);
                receiver
            }
        };
        tracing::debug!(key = %key, subscribers = count, "Query subscribed");
        let _ = reply.send(receiver);

        self.query(def, false, None);
    }

    fn invalidate(&mut self, tags: Vec<Tag>) {
        let refetch = self.cache.invalidate(&tags);
        tracing::info!(tags = ?tags, refetch = refetch.len(), "Invalidated cache tags");
        self.emit(StoreEvent::Invalidated(tags));

        for key in refetch {
            if let Some(def) = self.defs.get(&key).cloned() {
                self.query(def, true, None);
            }
        }
    }

    /// Drop all cached data. Callers waiting on a request get the empty entry.
    fn purge(&mut self) {
        let purged = self.cache.clear();
        for (key, waiters) in self.waiters.drain() {
            let entry = CacheEntry::uninitialized(key);
            for waiter in waiters {
                let _ = waiter.send(entry.clone());
            }
        }
        for key in &purged {
            if let Some(sender) = self.watchers.get(key) {
                sender.send_replace(CacheEntry::uninitialized(key.clone()));
            }
        }
        tracing::info!(entries = purged.len(), "Query cache purged");
        self.emit(StoreEvent::CachePurged);

        // Live subscriptions follow the new account.
        if self.session.session().is_authenticated() {
            let defs: Vec<QueryDef> = self.defs.values().cloned().collect();
            for def in defs {
                self.query(def, true, None);
            }
        }
    }

    fn publish(&self, key: &CacheKey) {
        let entry = self.cache.snapshot(key);
        if let Some(sender) = self.watchers.get(key) {
            sender.send_replace(entry.clone());
        }
        self.emit(StoreEvent::QueryUpdated(entry));
    }

    fn emit(&self, event: StoreEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cache::QueryStatus;
    use crate::storage::MemoryStorage;
    use clinic_core::models::Role;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> (Store, MemoryStorage) {
        let storage = MemoryStorage::new();
        let session = SessionStore::restore(Arc::new(storage.clone()));
        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        (Store::spawn(api, session), storage)
    }

    fn patient() -> User {
        User {
            id: Some("u1".into()),
            email: "lina@example.com".into(),
            role: Role::Patient,
        }
    }

    fn doctors() -> QueryDef {
        QueryDef::new("doctors", "list", "doctors")
            .provides(&[Tag::Doctor])
            .authenticated()
    }

    #[tokio::test]
    async fn test_dispatch_credentials_and_logout() {
        let server = MockServer::start().await;
        let (store, storage) = store(&server);

        let state = store
            .dispatch(Action::SetCredentials {
                user: patient(),
                token: "tok-1".into(),
            })
            .await
            .unwrap();
        assert!(state.session.is_authenticated());
        assert_eq!(state.session.token(), Some("tok-1"));
        assert_eq!(storage.len(), 2);

        let state = store.dispatch(Action::Logout).await.unwrap();
        assert!(!state.session.is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_query_populates_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doctors"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        let (store, _) = store(&server);

        let entry = store.query(doctors()).await.unwrap();
        assert_eq!(entry.status, QueryStatus::Success);

        let state = store.state().await.unwrap();
        assert_eq!(state.slice("doctors").count(), 1);
        assert_eq!(state.slice("patients").count(), 0);
    }

    #[tokio::test]
    async fn test_events_report_invalidation() {
        let server = MockServer::start().await;
        let (store, _) = store(&server);
        let mut events = store.events();

        store
            .dispatch(Action::Invalidate(vec![Tag::Appointment]))
            .await
            .unwrap();
        match events.recv().await.unwrap() {
            StoreEvent::Invalidated(tags) => assert_eq!(tags, vec![Tag::Appointment]),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_logout_resolves_pending_waiters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doctors"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        let (store, _) = store(&server);

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.query(doctors()).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.dispatch(Action::Logout).await.unwrap();

        let entry = pending.await.unwrap().unwrap();
        assert_eq!(entry.status, QueryStatus::Uninitialized);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(store.state().await.unwrap().queries.is_empty());
    }
}
