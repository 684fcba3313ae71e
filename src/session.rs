// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Picks the backend for a session and owns the resulting store.
//!
//! A session is remote-synced only when it has both a user id and a remote
//! store and the initial subscription handshake succeeds. Anything else
//! falls back to a local, in-memory session. The choice never changes for
//! the lifetime of the session; a different identity needs a new session.

use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::backend::{LedgerBackend, LocalBackend, Mode, SyncedBackend};
use crate::catalog;
use crate::error::Result;
use crate::models::Category;
use crate::remote::RemoteStore;
use crate::store::LedgerStore;

pub struct Session {
    user_id: Option<String>,
    store: LedgerStore,
}

#[derive(Default)]
pub struct SessionBuilder {
    categories: Option<Vec<Category>>,
    user_id: Option<String>,
    remote: Option<Arc<dyn RemoteStore>>,
    demo: bool,
}

impl SessionBuilder {
    pub fn categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        if !user_id.trim().is_empty() {
            self.user_id = Some(user_id.trim().to_string());
        }
        self
    }

    pub fn remote(mut self, remote: Arc<dyn RemoteStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Seeds local sessions with the demo dataset.
    pub fn demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    pub async fn open(self) -> Result<Session> {
        let categories = self
            .categories
            .unwrap_or_else(catalog::default_categories);
        let (backend, user_id) = select_backend(self.user_id, self.remote).await;
        let mode = backend.mode();
        let mut store = LedgerStore::new(backend, categories);
        store.apply_pending();
        if mode == Mode::Local && self.demo {
            catalog::seed_demo(&mut store, Local::now().date_naive()).await?;
        }
        info!(%mode, user_id = user_id.as_deref().unwrap_or("-"), "session opened");
        Ok(Session { user_id, store })
    }
}

async fn select_backend(
    user_id: Option<String>,
    remote: Option<Arc<dyn RemoteStore>>,
) -> (Box<dyn LedgerBackend>, Option<String>) {
    let (Some(user_id), Some(remote)) = (user_id, remote) else {
        return (Box::new(LocalBackend::new()), None);
    };
    match SyncedBackend::connect(remote, &user_id).await {
        Ok(backend) => (Box::new(backend), Some(user_id)),
        Err(err) => {
            warn!(user_id, error = %err, "synced backend unavailable, falling back to local");
            (Box::new(LocalBackend::new()), None)
        }
    }
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn mode(&self) -> Mode {
        self.store.mode()
    }

    /// The identity the session is scoped to; `None` for local sessions.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn store(&mut self) -> &mut LedgerStore {
        &mut self.store
    }

    pub async fn close(mut self) {
        self.store.close().await;
        info!(mode = %self.store.mode(), "session closed");
    }
}
