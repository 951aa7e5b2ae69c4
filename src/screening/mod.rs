// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asynchronous, lock-guarded AML address pre-screening.

pub mod lock;
pub mod runner;

pub use lock::{LockError, LockGuard, LockManager};
pub use runner::{
    QueueClosed, ScreeningJob, ScreeningOutcome, ScreeningQueue, ScreeningReport,
    ScreeningRunner, ScreeningTaskState,
};
