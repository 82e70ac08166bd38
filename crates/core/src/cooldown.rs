use crate::player::{PlayerIdentity, PlayerSlot};
use chrono::{DateTime, Duration, Utc};
use rustc_hash::FxHashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownCheck {
    Allowed,
    Limited { remaining: Duration },
}

impl CooldownCheck {
    pub fn is_allowed(self) -> bool {
        matches!(self, CooldownCheck::Allowed)
    }
}

/// Cooldown expiries per player. Only the expiry is stored: an invocation is
/// allowed once `now` has reached it, and every allowed invocation pushes it
/// to `now + duration`.
#[derive(Debug, Default)]
pub struct CooldownStore {
    expiries: Mutex<FxHashMap<PlayerIdentity, DateTime<Utc>>>,
}

impl CooldownStore {
    pub fn new() -> CooldownStore {
        Default::default()
    }

    fn lock(&self) -> MutexGuard<'_, FxHashMap<PlayerIdentity, DateTime<Utc>>> {
        self.expiries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks the cooldown of `identity` and, if it has run out, starts a new
    /// one in the same critical section.
    pub fn try_acquire(
        &self,
        identity: PlayerIdentity,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> CooldownCheck {
        let mut expiries = self.lock();
        if let Some(&expiry) = expiries.get(&identity) {
            if now < expiry {
                return CooldownCheck::Limited {
                    remaining: expiry - now,
                };
            }
        }
        let expiry = now.checked_add_signed(duration).unwrap_or(DateTime::<Utc>::MAX_UTC);
        expiries.insert(identity, expiry);
        CooldownCheck::Allowed
    }

    pub fn expiry(&self, identity: PlayerIdentity) -> Option<DateTime<Utc>> {
        self.lock().get(&identity).copied()
    }

    /// Forgets every entry for `slot`, whoever held it, and returns the
    /// identities that were removed.
    pub fn clear_slot(&self, slot: PlayerSlot) -> Vec<PlayerIdentity> {
        let mut expiries = self.lock();
        let removed: Vec<PlayerIdentity> = expiries
            .keys()
            .filter(|identity| identity.slot == slot)
            .copied()
            .collect();
        for identity in &removed {
            expiries.remove(identity);
        }
        removed
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
