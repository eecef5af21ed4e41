// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Asynchronous task execution
//!
//! A submitted task is registered as `scheduled`, runs exactly once as a
//! detached background unit of work, and terminates by writing a `done`
//! or `failed` result back into the registry. Callers poll the registry
//! for progress; they are never blocked by execution.

pub mod executor;
pub mod registry;
pub mod types;

pub use executor::{TaskExecutor, SEARCH_CONTEXT_WINDOW};
pub use registry::TaskRegistry;
pub use types::{RegistryError, TaskKind, TaskPayload, TaskRecord, TaskStatus};
