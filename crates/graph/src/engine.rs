use crate::ancestry::{AncestryCache, ParentLookup};
use crate::config::{LayerSettings, NavigationState};
use crate::fingerprint::ViolationSetKey;
use crate::grouping::group;
use crate::lifting::{lift, lifting_index};
use crate::present::present;
use crate::types::{DisplayGroup, Violation};
use serde::Serialize;
use std::sync::Arc;

/// Compute the display groups for a view in one pass
///
/// Builds a fresh ancestry cache, so the result is never stale.
pub fn compute_display_groups<L: ParentLookup + ?Sized>(
    raw_violations: &[Violation],
    navigation: &NavigationState,
    settings: &LayerSettings,
    lookup: &L,
) -> Vec<DisplayGroup> {
    let index = lifting_index(settings, navigation);
    let cache = if index > 0 {
        AncestryCache::build(raw_violations, lookup)
    } else {
        AncestryCache::new()
    };
    display_groups(raw_violations, index, &cache)
}

/// Lift, group and order violations against an existing cache
pub fn display_groups(
    violations: &[Violation],
    lifting_index: i64,
    cache: &AncestryCache,
) -> Vec<DisplayGroup> {
    present(group(&lift(violations, lifting_index, cache)))
}

/// When the engine rebuilds its ancestry cache after the violation set changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheRefresh {
    /// Rebuild inline before recomputing
    #[default]
    Synchronous,

    /// Recompute with the current cache and rebuild on the next `flush`
    Deferred,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub evaluations: u64,
    pub memo_hits: u64,
    pub cache_rebuilds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MemoKey {
    violations: ViolationSetKey,
    lifting_index: i64,
    generation: u64,
}

/// Memoizing engine for hosts that re-evaluate on every render
pub struct ViolationEngine {
    refresh: CacheRefresh,
    cache: AncestryCache,
    cache_stale: bool,

    /// Violation set waiting for a deferred rebuild
    pending: Option<(ViolationSetKey, Vec<Violation>)>,

    memo: Option<(MemoKey, Arc<[DisplayGroup]>)>,
    stats: EngineStats,
}

impl Default for ViolationEngine {
    fn default() -> Self {
        Self::new(CacheRefresh::default())
    }
}

impl ViolationEngine {
    pub fn new(refresh: CacheRefresh) -> Self {
        Self {
            refresh,
            cache: AncestryCache::new(),
            cache_stale: false,
            pending: None,
            memo: None,
            stats: EngineStats::default(),
        }
    }

    pub fn refresh_policy(&self) -> CacheRefresh {
        self.refresh
    }

    /// Display groups for the current inputs, reusing the last result when the
    /// violation set, lifting index and cache generation are unchanged
    pub fn evaluate<L: ParentLookup + ?Sized>(
        &mut self,
        violations: &[Violation],
        navigation: &NavigationState,
        settings: &LayerSettings,
        lookup: &L,
    ) -> Arc<[DisplayGroup]> {
        self.stats.evaluations += 1;

        let key = ViolationSetKey::of(violations);
        if self.cache_stale || self.cache.source_key() != Some(&key) {
            match self.refresh {
                CacheRefresh::Synchronous => self.rebuild(violations, lookup),
                CacheRefresh::Deferred => self.schedule(key, violations),
            }
        } else if let Some((outdated, _)) = self.pending.take() {
            // the cache already matches; a rebuild for an intermediate set would regress it
            log::debug!("Dropped ancestry rebuild for {outdated:?}");
        }

        let memo_key = MemoKey {
            violations: key,
            lifting_index: lifting_index(settings, navigation),
            generation: self.cache.generation(),
        };

        if let Some((cached_key, groups)) = &self.memo {
            if *cached_key == memo_key {
                self.stats.memo_hits += 1;
                log::trace!("Display groups reused for {:?}", memo_key.violations);
                return Arc::clone(groups);
            }
        }

        let groups: Arc<[DisplayGroup]> =
            display_groups(violations, memo_key.lifting_index, &self.cache).into();
        log::debug!(
            "Recomputed {} display groups (lifting index {}, generation {})",
            groups.len(),
            memo_key.lifting_index,
            memo_key.generation
        );
        self.memo = Some((memo_key, Arc::clone(&groups)));
        groups
    }

    /// Run a scheduled cache rebuild
    ///
    /// Returns `true` when a rebuild happened and the host should evaluate again.
    pub fn flush<L: ParentLookup + ?Sized>(&mut self, lookup: &L) -> bool {
        let Some((_, violations)) = self.pending.take() else {
            return false;
        };
        self.rebuild(&violations, lookup);
        true
    }

    /// Evaluate and flush until no rebuild is pending
    pub fn settle<L: ParentLookup + ?Sized>(
        &mut self,
        violations: &[Violation],
        navigation: &NavigationState,
        settings: &LayerSettings,
        lookup: &L,
    ) -> Arc<[DisplayGroup]> {
        let mut groups = self.evaluate(violations, navigation, settings, lookup);
        while self.flush(lookup) {
            groups = self.evaluate(violations, navigation, settings, lookup);
        }
        groups
    }

    /// Force a cache rebuild on the next evaluation (e.g. the hierarchy changed)
    pub fn invalidate(&mut self) {
        self.cache_stale = true;
        self.memo = None;
    }

    pub fn has_pending_rebuild(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cache(&self) -> &AncestryCache {
        &self.cache
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    fn schedule(&mut self, key: ViolationSetKey, violations: &[Violation]) {
        let already_scheduled = matches!(&self.pending, Some((pending, _)) if *pending == key);
        if !already_scheduled {
            log::debug!("Ancestry rebuild scheduled for {key:?}");
            self.pending = Some((key, violations.to_vec()));
        }
    }

    fn rebuild<L: ParentLookup + ?Sized>(&mut self, violations: &[Violation], lookup: &L) {
        self.cache.rebuild(violations, lookup);
        self.cache_stale = false;
        self.stats.cache_rebuilds += 1;
    }
}
