use actix_web::web::Bytes;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

/// Longest deadline an entry can get, so `Instant` arithmetic cannot overflow.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Namespaced cache key, rendered as `<resource>.<param1>.<param2>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    ValidatorList { chain_id: String },
    ExistingDelegations { chain_id: String, address: String },
    Zones,
    Apr,
    TotalSupply,
    CirculatingSupply,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidatorList { chain_id } => write!(f, "validatorList.{}", chain_id),
            Self::ExistingDelegations { chain_id, address } => {
                write!(f, "existingDelegations.{}.{}", chain_id, address)
            }
            Self::Zones => f.write_str("zones"),
            Self::Apr => f.write_str("apr"),
            Self::TotalSupply => f.write_str("total_supply"),
            Self::CirculatingSupply => f.write_str("circulating_supply"),
        }
    }
}

pub(crate) struct CacheEntry {
    value: Bytes,
    cost: i64,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Process-wide byte cache where every entry carries its own deadline.
///
/// Lookups are lock-free from the caller's point of view (sharded map). The
/// cache is approximate: an entry can disappear before its deadline when the
/// total cost goes over `max_cost`, so callers must always be able to resolve
/// a miss.
pub struct TtlCache {
    entries: DashMap<String, CacheEntry>,
    max_cost: i64,
    used_cost: AtomicI64,
}

impl TtlCache {
    pub fn new(max_cost: i64) -> Self {
        Self {
            entries: DashMap::new(),
            max_cost: max_cost.max(1),
            used_cost: AtomicI64::new(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        let now = Instant::now();

        match self.entries.get(key) {
            Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }

        // expired, drop it lazily
        if let Some((_, entry)) = self.entries.remove_if(key, |_, entry| !entry.is_live(now)) {
            self.used_cost.fetch_sub(entry.cost, Ordering::Relaxed);
        }

        None
    }

    pub fn set_with_ttl(&self, key: impl Into<String>, value: Bytes, cost: i64, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }

        let key = key.into();
        let entry = CacheEntry {
            value,
            cost,
            expires_at: Instant::now() + ttl.min(MAX_TTL),
        };

        self.used_cost.fetch_add(cost, Ordering::Relaxed);
        if let Some(previous) = self.entries.insert(key.clone(), entry) {
            self.used_cost.fetch_sub(previous.cost, Ordering::Relaxed);
        }

        if self.used_cost.load(Ordering::Relaxed) > self.max_cost {
            self.evict(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict(&self, keep: &str) {
        let now = Instant::now();
        let used_cost = &self.used_cost;

        self.entries.retain(|_, entry| {
            let live = entry.is_live(now);
            if !live {
                used_cost.fetch_sub(entry.cost, Ordering::Relaxed);
            }
            live
        });

        let overflow = self.used_cost.load(Ordering::Relaxed) - self.max_cost;
        if overflow <= 0 {
            return;
        }

        let mut candidates = self
            .entries
            .iter()
            .filter(|entry| entry.key() != keep)
            .map(|entry| (entry.key().clone(), entry.expires_at, entry.cost))
            .collect::<Vec<_>>();
        candidates.sort_by_key(|(_, expires_at, _)| *expires_at);

        let mut freed = 0;
        for (key, _, cost) in candidates {
            if freed >= overflow {
                break;
            }
            if let Some((_, entry)) = self.entries.remove(&key) {
                self.used_cost.fetch_sub(entry.cost, Ordering::Relaxed);
                freed += cost;
            }
        }

        tracing::debug!("evicted {} cost units from cache", freed);
    }
}
