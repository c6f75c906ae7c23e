//! Link Statistics Cache
//!
//! Holds the most recent wireless-link measurement. The radio monitor thread
//! replaces the whole snapshot with [`LinkStatsCache::set`]; the telemetry
//! aggregator copies it out with [`LinkStatsCache::read`].
//!
//! Only the latest snapshot is kept. Intermediate snapshots written between two
//! reads are overwritten and never observed.
//!
//! # Reconnect policy
//!
//! The cache never merges or resets per-card counters on its own. Whatever the
//! writer reports for a card slot is what gets emitted, so a card that drops out
//! and comes back shows the writer's counters for the new session.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Number of radio card slots tracked per endpoint
pub const MAX_WIFI_CARDS: usize = 4;

/// Statistics for one radio card slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardStats {
    /// Card is active in this session; inactive slots are never emitted
    pub exists: bool,
    /// Received signal strength (dBm)
    pub rx_rssi: i8,
    /// Packets received on this card
    pub packets_received: u64,
    /// Packets injected (transmitted) on this card
    pub packets_injected: u64,
}

/// Totals across all cards and streams, monotonic for the process lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalStats {
    pub packets_received: u64,
    pub bytes_received: u64,
    pub packets_injected: u64,
    pub bytes_injected: u64,
}

impl TotalStats {
    /// Return true if no counter is smaller than in `previous`
    pub fn is_monotonic_from(&self, previous: &TotalStats) -> bool {
        self.packets_received >= previous.packets_received
            && self.bytes_received >= previous.bytes_received
            && self.packets_injected >= previous.packets_injected
            && self.bytes_injected >= previous.bytes_injected
    }
}

/// One complete link measurement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Card slots; the slot position is the card index
    pub cards: [CardStats; MAX_WIFI_CARDS],
    pub totals: TotalStats,
}

impl LinkStats {
    /// Iterate over active cards as `(card_index, stats)`
    ///
    /// This is the only path to card data used when building messages, so
    /// inactive slots cannot reach the wire.
    pub fn active_cards(&self) -> impl Iterator<Item = (u8, &CardStats)> + '_ {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.exists)
            .map(|(index, card)| (index as u8, card))
    }
}

/// Thread-safe holder of the latest [`LinkStats`] snapshot
#[derive(Default)]
pub struct LinkStatsCache {
    snapshot: Mutex<LinkStats>,
}

impl LinkStatsCache {
    /// Create a cache holding an all-inactive, zeroed snapshot
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LinkStats> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the held snapshot
    pub fn set(&self, stats: LinkStats) {
        let previous = core::mem::replace(&mut *self.lock(), stats);

        if !stats.totals.is_monotonic_from(&previous.totals) {
            crate::log_warn!(
                "Link totals went backwards (rx packets {} -> {})",
                previous.totals.packets_received,
                stats.totals.packets_received
            );
        }
    }

    /// Copy out the current snapshot
    pub fn read(&self) -> LinkStats {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Snapshot whose every field is derived from `n`
    fn generation(n: u64) -> LinkStats {
        let mut stats = LinkStats::default();
        for (i, card) in stats.cards.iter_mut().enumerate() {
            *card = CardStats {
                exists: n % 2 == 0,
                rx_rssi: -((n % 100) as i8),
                packets_received: n,
                packets_injected: n + i as u64,
            };
        }
        stats.totals = TotalStats {
            packets_received: n,
            bytes_received: n * 1000,
            packets_injected: n,
            bytes_injected: n * 1000,
        };
        stats
    }

    fn is_consistent(stats: &LinkStats) -> bool {
        let n = stats.totals.packets_received;
        *stats == generation(n)
    }

    #[test]
    fn test_default_snapshot_is_empty() {
        let cache = LinkStatsCache::new();
        let stats = cache.read();
        assert_eq!(stats.active_cards().count(), 0);
        assert_eq!(stats.totals, TotalStats::default());
    }

    #[test]
    fn test_set_replaces_wholesale() {
        let cache = LinkStatsCache::new();
        cache.set(generation(2));
        cache.set(generation(3));
        assert_eq!(cache.read(), generation(3));
    }

    #[test]
    fn test_active_cards_skips_inactive() {
        let mut stats = LinkStats::default();
        stats.cards[1].exists = true;
        stats.cards[1].rx_rssi = -42;
        stats.cards[3].exists = true;

        let active: Vec<u8> = stats.active_cards().map(|(i, _)| i).collect();
        assert_eq!(active, vec![1, 3]);
        assert_eq!(stats.active_cards().next().unwrap().1.rx_rssi, -42);
    }

    #[test]
    fn test_monotonic_check() {
        let older = generation(4).totals;
        let newer = generation(5).totals;
        assert!(newer.is_monotonic_from(&older));
        assert!(!older.is_monotonic_from(&newer));
    }

    #[test]
    fn test_backwards_totals_still_replace() {
        let cache = LinkStatsCache::new();
        cache.set(generation(10));
        cache.set(generation(1));
        assert_eq!(cache.read(), generation(1));
    }

    #[test]
    fn test_concurrent_set_read_never_tears() {
        let cache = Arc::new(LinkStatsCache::new());
        cache.set(generation(0));

        let writers: Vec<_> = (0..2)
            .map(|w| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for n in 0..5_000u64 {
                        cache.set(generation(n * 2 + w));
                    }
                })
            })
            .collect();

        let reader = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..10_000 {
                    let stats = cache.read();
                    assert!(is_consistent(&stats), "torn snapshot: {:?}", stats);
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        reader.join().unwrap();
        assert!(is_consistent(&cache.read()));
    }
}
