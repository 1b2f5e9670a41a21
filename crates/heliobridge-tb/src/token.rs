// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of HelioBridge.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Single-slot bearer token cache shared across request handlers

use parking_lot::RwLock;
use std::sync::Arc;

/// Process-wide cache for the platform bearer token.
///
/// There is no expiry tracking: staleness is discovered reactively when a
/// downstream call is rejected, at which point the slot is cleared and
/// refilled. Concurrent refreshes may race; tokens from the same account are
/// interchangeable, so the last writer wins.
#[derive(Clone, Default)]
pub struct TokenCache {
    slot: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("cached", &self.slot.read().is_some())
            .finish()
    }
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently cached token, if any.
    pub fn get(&self) -> Option<String> {
        self.slot.read().clone()
    }

    /// Replace the cached token.
    pub fn store(&self, token: impl Into<String>) {
        *self.slot.write() = Some(token.into());
    }

    /// Drop the cached token, forcing the next caller to re-authenticate.
    pub fn clear(&self) {
        *self.slot.write() = None;
    }
}
