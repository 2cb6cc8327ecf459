//! API state management for the REST server.

use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::config::{Config, SessionBackend};
use crate::evaluation::EvaluationTask;
use crate::render::{is_path_segment, BackLinkRenderer};
use crate::session::{FileSessionStore, MemorySessionStore, SessionStore, TaskSessions};
use crate::wizard::Step;

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    /// Session handle used to load and commit wizard tasks
    pub sessions: TaskSessions,
    /// Step list every new task starts with
    pub steps: Arc<Vec<Step>>,
    /// Prefix for redirect targets and rendered links
    pub site_root: Arc<str>,
    pub renderer: Arc<BackLinkRenderer>,
}

impl ApiState {
    /// Create new API state from config, opening the configured session store
    pub fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn SessionStore> = match config.session.backend {
            SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
            SessionBackend::File => Arc::new(FileSessionStore::new(config.sessions_path())),
        };
        tracing::info!(
            backend = store.name(),
            slot = %config.session.slot,
            "Opened session store"
        );
        Self::with_sessions(config, TaskSessions::new(store, config.session.slot.clone()))
    }

    /// Create API state over an existing session handle
    pub fn with_sessions(config: &Config, sessions: TaskSessions) -> Result<Self> {
        let renderer = BackLinkRenderer::new().context("Failed to register back link template")?;

        if let Some(step) = config.wizard.steps.iter().find(|s| !is_path_segment(&s.id)) {
            bail!("Step id '{}' cannot be used in a URL path", step.id);
        }

        if config.wizard.steps.is_empty() {
            tracing::warn!("No wizard steps configured; new tasks cannot be started");
        }

        Ok(Self {
            sessions,
            steps: Arc::new(config.wizard.steps.clone()),
            site_root: Arc::from(config.server.site_root.as_str()),
            renderer: Arc::new(renderer),
        })
    }

    /// A fresh task over the configured steps
    pub fn new_task(&self) -> EvaluationTask {
        EvaluationTask::new(self.steps.as_ref().clone())
    }
}
