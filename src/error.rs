// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use thiserror::Error;

use crate::models::{EntityKind, Side};

/// Failure talking to the backend collaborator.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error: {status} {detail}")]
    Status { status: u16, detail: String },
    #[error("malformed payload: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("request aborted before completion")]
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Patch,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Patch => "update payment of",
        })
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Cache slot untouched; the stale collection stays visible.
    #[error("could not load {kind}: {source}")]
    Load {
        kind: EntityKind,
        #[source]
        source: BackendError,
    },
    #[error("could not load {side} parameters: {source}")]
    ParamLoad {
        side: Side,
        #[source]
        source: BackendError,
    },
    #[error("could not {action} {}: {source}", .kind.singular())]
    Mutation {
        kind: EntityKind,
        action: Action,
        #[source]
        source: BackendError,
    },
    /// Some deletions of a batch failed; the successful ones were still resynced.
    #[error("{} of {total} {kind} could not be deleted", .failed.len())]
    PartialBatch {
        kind: EntityKind,
        failed: Vec<i64>,
        deleted: usize,
        total: usize,
    },
    #[error("{0}")]
    Selection(String),
}
