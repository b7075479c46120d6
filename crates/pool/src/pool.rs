// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pool front end.
//!
//! A [`Pool`] ties the store, the scheduler, and the workers together
//! behind one handle. Callers submit query text, poll for the result by
//! job id, and remove it when done. The host drives [`Pool::tick`]
//! periodically to emit ready-result notifications and to restart the
//! scheduler if its task ever ends on its own.

use crate::config::PoolConfig;
use crate::manager::{self, Manager, ManagerContext};
use crate::stats::{PoolStats, StatsSnapshot};
use crate::store::JobStore;
use crate::worker::Worker;
use parking_lot::Mutex;
use qp_adapters::{Connector, ResultNotify};
use qp_core::{
    Clock, ConnectionDetails, JobId, JobResult, PoolSettings, QuerySettings, SystemClock,
    ValidationError,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// An embedded query-execution pool.
pub struct Pool<X: Connector, N: ResultNotify, C: Clock = SystemClock> {
    store: Arc<JobStore>,
    roster: Arc<Mutex<Vec<Worker>>>,
    stats: Arc<PoolStats>,
    settings: Arc<Mutex<PoolSettings>>,
    details: Arc<Mutex<ConnectionDetails>>,
    query_defaults: Mutex<QuerySettings>,
    next_worker_id: Arc<AtomicU64>,
    manager: Mutex<Option<Manager>>,
    started: AtomicBool,
    connector: X,
    notify: N,
    clock: C,
}

impl<X: Connector, N: ResultNotify> Pool<X, N> {
    /// Build a stopped pool. Fails if the pool settings are invalid.
    pub fn new(
        connector: X,
        notify: N,
        settings: PoolSettings,
        details: ConnectionDetails,
    ) -> Result<Self, ValidationError> {
        Self::with_clock(connector, notify, settings, details, SystemClock)
    }

    /// Build a stopped pool from a loaded configuration.
    pub fn from_config(config: PoolConfig, connector: X, notify: N) -> Result<Self, ValidationError> {
        let pool = Self::with_clock(
            connector,
            notify,
            config.pool,
            config.connection,
            SystemClock,
        )?;
        *pool.query_defaults.lock() = config.query;
        Ok(pool)
    }
}

impl<X: Connector, N: ResultNotify, C: Clock> Pool<X, N, C> {
    /// Build a stopped pool on an explicit time source.
    pub fn with_clock(
        connector: X,
        notify: N,
        settings: PoolSettings,
        details: ConnectionDetails,
        clock: C,
    ) -> Result<Self, ValidationError> {
        let settings = settings.validated()?;
        let stats = Arc::new(PoolStats::new());
        Ok(Self {
            store: Arc::new(JobStore::new(Arc::clone(&stats))),
            roster: Arc::new(Mutex::new(Vec::new())),
            stats,
            settings: Arc::new(Mutex::new(settings)),
            details: Arc::new(Mutex::new(details)),
            query_defaults: Mutex::new(QuerySettings::default()),
            next_worker_id: Arc::new(AtomicU64::new(1)),
            manager: Mutex::new(None),
            started: AtomicBool::new(false),
            connector,
            notify,
            clock,
        })
    }

    fn context(&self) -> ManagerContext<X, C> {
        ManagerContext {
            store: Arc::clone(&self.store),
            roster: Arc::clone(&self.roster),
            stats: Arc::clone(&self.stats),
            settings: Arc::clone(&self.settings),
            details: Arc::clone(&self.details),
            next_worker_id: Arc::clone(&self.next_worker_id),
            connector: self.connector.clone(),
            clock: self.clock.clone(),
        }
    }

    /// Spawn the minimum worker complement and the scheduler.
    /// Starting an already started pool is a no-op.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        let ctx = self.context();
        let min_size = ctx.settings.lock().min_size;
        {
            let mut roster = ctx.roster.lock();
            for _ in 0..min_size {
                roster.push(manager::spawn_worker(&ctx));
            }
        }
        *self.manager.lock() = Some(Manager::spawn(ctx));
        tracing::info!(workers = min_size, "pool started");
    }

    /// Stop the scheduler and all workers, then drop every job and result
    /// and reset the id counters. Stopping a stopped pool is a no-op.
    pub async fn stop(&self) {
        if !self.started.swap(false, Ordering::SeqCst) {
            return;
        }
        let manager = self.manager.lock().take();
        if let Some(manager) = manager {
            manager.shutdown();
            manager.join().await;
        }
        let workers = std::mem::take(&mut *self.roster.lock());
        for worker in &workers {
            worker.shutdown();
        }
        for worker in workers {
            worker.join().await;
        }
        self.store.clear();
        self.stats.reset();
        self.next_worker_id.store(1, Ordering::SeqCst);
        tracing::info!("pool stopped");
    }

    /// Queue a query with the pool's default settings.
    pub fn submit(&self, text: impl Into<String>) -> JobId {
        let settings = self.query_defaults.lock().clone();
        self.submit_with(text, settings)
    }

    /// Queue a query with explicit settings and return its job id.
    pub fn submit_with(&self, text: impl Into<String>, settings: QuerySettings) -> JobId {
        let id = self.store.enqueue(text, settings, self.clock.epoch_ms());
        if let Some(manager) = self.manager.lock().as_ref() {
            manager.wake();
        }
        id
    }

    /// Look up a finished result. The result stays until removed.
    pub fn fetch(&self, id: JobId) -> Option<JobResult> {
        self.store.fetch(id)
    }

    /// Discard a result. Unknown ids are ignored.
    pub fn remove(&self, id: JobId) {
        self.store.remove(id)
    }

    /// Emit notifications for newly finished results and revive the
    /// scheduler if its task ended on its own.
    ///
    /// Each result is advertised at most once, even if its notification
    /// fails.
    pub async fn tick(&self) {
        for id in self.store.take_advertisable() {
            if let Err(err) = self.notify.result_ready(id).await {
                tracing::warn!(job_id = %id, error = %err, "result notification failed");
            }
        }
        if self.started.load(Ordering::SeqCst) {
            let dead = self
                .manager
                .lock()
                .as_ref()
                .is_some_and(|m| m.is_dead() || m.is_shut_down());
            if dead {
                tracing::warn!("scheduler task ended unexpectedly, restarting");
                *self.manager.lock() = Some(Manager::spawn(self.context()));
            }
        }
    }

    /// Replace the pool sizing settings. Fails if they are invalid.
    /// Takes effect as the scheduler next sizes the pool.
    pub fn set_pool_settings(&self, settings: PoolSettings) -> Result<(), ValidationError> {
        *self.settings.lock() = settings.validated()?;
        Ok(())
    }

    /// Replace the connection details used for workers spawned from now on.
    /// Existing workers keep their current connection.
    pub fn set_connection_details(&self, details: ConnectionDetails) {
        *self.details.lock() = details;
    }

    /// Replace the settings applied by [`Pool::submit`].
    pub fn set_query_defaults(&self, settings: QuerySettings) {
        *self.query_defaults.lock() = settings;
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn worker_count(&self) -> usize {
        self.roster.lock().len()
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
