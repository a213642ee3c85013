// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

/// Errors raised while building a [`Descriptor`](crate::Descriptor).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// A level was reached twice while walking the `extends` chain.
    #[error("cyclic dependency detected in descriptor `extends` chain at depth {depth}")]
    CyclicExtends {
        /// Number of levels walked before the repeated level was reached.
        depth: usize,
    },
}

/// A slot was requested from a compound variant that declares nothing for it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("slot `{slot}` is not present in compound variant")]
pub struct MissingSlot {
    /// Canonical name of the requested slot.
    pub slot: &'static str,
}
