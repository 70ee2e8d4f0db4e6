//! Authority cache
//!
//! Short-lived in-process cache of resolved authorities keyed by
//! `(program, user)`, using `DashMap` for concurrent access. A zero TTL
//! disables it: lookups always miss and inserts are dropped.
//!
//! Per-program generation counters keep a resolution that read storage
//! before a concurrent write from caching its stale result after that
//! write's invalidation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use authz_common::AuthorityCacheConfig;
use authz_core::{Authority, Invalidation, Snowflake};
use dashmap::DashMap;

struct CachedAuthority {
    authority: Authority,
    expires_at: Instant,
}

/// TTL cache of resolved authorities
pub struct AuthorityCache {
    ttl: Duration,
    /// Keyed by `(program_id, user_id)`
    entries: DashMap<(Snowflake, Snowflake), CachedAuthority>,
    /// Bumped on every invalidation touching the program. Never removed,
    /// so a counter cannot restart at a value a resolver already captured.
    generations: DashMap<Snowflake, Arc<AtomicU64>>,
}

impl AuthorityCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
            generations: DashMap::new(),
        }
    }

    /// A cache that never holds anything
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    #[must_use]
    pub fn from_config(config: &AuthorityCacheConfig) -> Self {
        Self::new(config.ttl())
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Fresh entry for `(program, user)`, if any
    ///
    /// Expired entries are evicted on access.
    pub fn get(&self, program_id: Snowflake, user_id: Snowflake) -> Option<Authority> {
        if !self.is_enabled() {
            return None;
        }
        let key = (program_id, user_id);
        if let Some(entry) = self.entries.get(&key) {
            if entry.expires_at > Instant::now() {
                return Some(entry.authority.clone());
            }
        }
        self.entries
            .remove_if(&key, |_, entry| entry.expires_at <= Instant::now());
        None
    }

    fn program_generation(&self, program_id: Snowflake) -> Arc<AtomicU64> {
        self.generations
            .entry(program_id)
            .or_insert_with(|| Arc::new(AtomicU64::new(0)))
            .clone()
    }

    /// Current generation of `program_id`
    ///
    /// Capture it before reading storage and hand it back to [`insert`](Self::insert).
    pub fn generation(&self, program_id: Snowflake) -> u64 {
        if !self.is_enabled() {
            return 0;
        }
        self.program_generation(program_id).load(Ordering::Acquire)
    }

    /// Cache `authority` unless its program was invalidated after `generation`
    /// was captured
    ///
    /// Returns whether the entry was stored.
    pub fn insert(&self, authority: &Authority, generation: u64) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let counter = self.program_generation(authority.program_id);

        // The entry's shard lock is held across the check, so an
        // invalidation's removal lands after this write.
        let entry = self.entries.entry((authority.program_id, authority.user_id));
        if counter.load(Ordering::Acquire) != generation {
            return false;
        }
        entry.insert(CachedAuthority {
            authority: authority.clone(),
            expires_at: Instant::now() + self.ttl,
        });
        true
    }

    fn bump(&self, program_id: Snowflake) {
        self.program_generation(program_id)
            .fetch_add(1, Ordering::Release);
    }

    /// Drop one user's entry in one program
    pub fn invalidate_member(&self, program_id: Snowflake, user_id: Snowflake) {
        if !self.is_enabled() {
            return;
        }
        self.bump(program_id);
        self.entries.remove(&(program_id, user_id));
    }

    /// Drop every entry in a program
    pub fn invalidate_program(&self, program_id: Snowflake) {
        if !self.is_enabled() {
            return;
        }
        self.bump(program_id);
        self.entries.retain(|(program, _), _| *program != program_id);
    }

    pub fn apply(&self, invalidation: Invalidation) {
        match invalidation {
            Invalidation::None => {}
            Invalidation::Member {
                program_id,
                user_id,
            } => self.invalidate_member(program_id, user_id),
            Invalidation::Program(program_id) => self.invalidate_program(program_id),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AuthorityCache {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for AuthorityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorityCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.len())
            .finish()
    }
}
