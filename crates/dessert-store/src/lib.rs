#![deny(warnings)]

//! Sale state for Dessert Clicker.
//!
//! The store owns the single [`SaleState`] of a game and advances it one sale
//! at a time. Presentation layers call [`SaleStateStore::sell`] on each tap
//! and read back the state to render; nothing here knows about them.

use dessert_core::{projected_revenue, resolve, Catalog, CatalogEntry};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Snapshot of a game in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleState {
    /// Total revenue in whole dollars.
    pub revenue: u64,
    /// Cumulative desserts sold.
    pub desserts_sold: u64,
    /// Dessert currently in production.
    pub active_entry: CatalogEntry,
}

impl SaleState {
    /// Fresh game: nothing sold, first dessert active.
    pub fn initial(catalog: &Catalog) -> Self {
        Self {
            revenue: 0,
            desserts_sold: 0,
            active_entry: catalog.first().clone(),
        }
    }
}

/// Apply one sale to `state`, returning the next state.
///
/// The sale is charged at the current dessert's price; the dessert shown next
/// is resolved from the incremented count, so crossing a threshold takes
/// effect in the returned state.
pub fn sell(state: &SaleState, catalog: &Catalog) -> SaleState {
    let revenue = state.revenue.saturating_add(state.active_entry.price);
    let desserts_sold = state.desserts_sold.saturating_add(1);
    let active_entry = resolve(catalog, desserts_sold).clone();
    SaleState {
        revenue,
        desserts_sold,
        active_entry,
    }
}

/// Errors returned when restoring a retained snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Snapshot references a dessert this catalog does not have.
    #[error("unknown dessert in snapshot: {0}")]
    UnknownEntry(String),
    /// Snapshot's active dessert disagrees with its sold count.
    #[error("active dessert {found} does not match sold count (expected {expected})")]
    TierMismatch { expected: String, found: String },
    /// Snapshot's revenue cannot be produced by this catalog.
    #[error("revenue {found} does not match sold count (expected {expected})")]
    RevenueMismatch { expected: u64, found: u64 },
}

/// Owner of the catalog and the current sale state.
#[derive(Clone, Debug)]
pub struct SaleStateStore {
    catalog: Catalog,
    state: SaleState,
}

impl SaleStateStore {
    pub fn new(catalog: Catalog) -> Self {
        let state = SaleState::initial(&catalog);
        Self { catalog, state }
    }

    /// Rebuild a store from a previously taken snapshot.
    ///
    /// The snapshot must be reachable from a fresh game on `catalog`: its
    /// active dessert must be the one resolved for its sold count, and its
    /// revenue must equal the revenue of that many sales.
    pub fn restore(catalog: Catalog, snapshot: SaleState) -> Result<Self, StoreError> {
        let stored = catalog
            .get(&snapshot.active_entry.id)
            .ok_or_else(|| StoreError::UnknownEntry(snapshot.active_entry.id.0.clone()))?;
        let expected = resolve(&catalog, snapshot.desserts_sold);
        if stored != expected || *stored != snapshot.active_entry {
            return Err(StoreError::TierMismatch {
                expected: expected.id.0.clone(),
                found: snapshot.active_entry.id.0.clone(),
            });
        }
        let expected_revenue = projected_revenue(&catalog, snapshot.desserts_sold);
        if snapshot.revenue != expected_revenue {
            return Err(StoreError::RevenueMismatch {
                expected: expected_revenue,
                found: snapshot.revenue,
            });
        }
        info!(
            sold = snapshot.desserts_sold,
            revenue = snapshot.revenue,
            "restored sale state"
        );
        Ok(Self {
            catalog,
            state: snapshot,
        })
    }

    /// Record one sale and return the updated state.
    pub fn sell(&mut self) -> &SaleState {
        let next = sell(&self.state, &self.catalog);
        debug!(
            sold = next.desserts_sold,
            revenue = next.revenue,
            price = self.state.active_entry.price,
            "dessert sold"
        );
        if next.active_entry.id != self.state.active_entry.id {
            info!(
                from = %self.state.active_entry.id,
                to = %next.active_entry.id,
                sold = next.desserts_sold,
                "new dessert unlocked"
            );
        }
        self.state = next;
        &self.state
    }

    pub fn state(&self) -> &SaleState {
        &self.state
    }

    /// Owned copy of the current state, e.g. for retention or rendering off-thread.
    pub fn snapshot(&self) -> SaleState {
        self.state.clone()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dessert_core::dessert_catalog;
    use proptest::prelude::*;

    fn three_tier() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::new("a", 5, "a.png", 0),
            CatalogEntry::new("b", 10, "b.png", 5),
            CatalogEntry::new("c", 15, "c.png", 10),
        ])
        .unwrap()
    }

    #[test]
    fn initial_state_uses_first_entry() {
        let store = SaleStateStore::new(three_tier());
        let s = store.state();
        assert_eq!(s.revenue, 0);
        assert_eq!(s.desserts_sold, 0);
        assert_eq!(s.active_entry.id.0, "a");
    }

    #[test]
    fn six_sales_cross_first_threshold() {
        let mut store = SaleStateStore::new(three_tier());
        for _ in 0..6 {
            store.sell();
        }
        let s = store.state();
        assert_eq!(s.desserts_sold, 6);
        assert_eq!(s.revenue, 35);
        assert_eq!(s.active_entry.price, 10);
    }

    #[test]
    fn single_entry_catalog_never_changes_tier() {
        let c = Catalog::new(vec![CatalogEntry::new("only", 3, "only.png", 0)]).unwrap();
        let mut store = SaleStateStore::new(c);
        let first = store.state().active_entry.clone();
        for _ in 0..4 {
            store.sell();
        }
        assert_eq!(store.state().revenue, 12);
        assert_eq!(store.state().desserts_sold, 4);
        assert_eq!(store.state().active_entry, first);
    }

    #[test]
    fn tier_switches_on_the_sale_that_reaches_threshold() {
        let c = three_tier();
        let mut s = SaleState::initial(&c);
        for _ in 0..4 {
            s = sell(&s, &c);
        }
        assert_eq!(s.active_entry.id.0, "a");
        s = sell(&s, &c);
        assert_eq!(s.desserts_sold, 5);
        assert_eq!(s.active_entry.id.0, "b");
        // The fifth sale itself was still charged at the old price.
        assert_eq!(s.revenue, 25);
    }

    #[test]
    fn pure_sell_leaves_input_untouched() {
        let c = three_tier();
        let s0 = SaleState::initial(&c);
        let s1 = sell(&s0, &c);
        assert_eq!(s0, SaleState::initial(&c));
        assert_eq!(s1.desserts_sold, 1);
    }

    #[test]
    fn snapshot_restore_roundtrip() {
        let mut store = SaleStateStore::new(dessert_catalog());
        for _ in 0..123 {
            store.sell();
        }
        let json = serde_json::to_string(&store.snapshot()).unwrap();
        let snap: SaleState = serde_json::from_str(&json).unwrap();
        let mut restored = SaleStateStore::restore(dessert_catalog(), snap).unwrap();
        assert_eq!(restored.state(), store.state());
        assert_eq!(restored.sell().desserts_sold, 124);
    }

    #[test]
    fn restore_rejects_inconsistent_snapshots() {
        let c = three_tier();
        let mut snap = SaleState::initial(&c);
        snap.desserts_sold = 7;
        snap.revenue = 45;
        let err = SaleStateStore::restore(c.clone(), snap.clone()).unwrap_err();
        assert_eq!(
            err,
            StoreError::TierMismatch {
                expected: "b".into(),
                found: "a".into()
            }
        );

        snap.active_entry = c.entries()[1].clone();
        snap.revenue = 1;
        let err = SaleStateStore::restore(c.clone(), snap.clone()).unwrap_err();
        assert_eq!(
            err,
            StoreError::RevenueMismatch {
                expected: 45,
                found: 1
            }
        );

        snap.active_entry = CatalogEntry::new("zz", 1, "zz.png", 0);
        let err = SaleStateStore::restore(c, snap).unwrap_err();
        assert_eq!(err, StoreError::UnknownEntry("zz".into()));
    }

    proptest! {
        #[test]
        fn counters_monotonic_and_tiers_forward(n in 1usize..400) {
            let mut store = SaleStateStore::new(dessert_catalog());
            let mut prev = store.snapshot();
            let mut charged: u64 = 0;
            for _ in 0..n {
                charged += prev.active_entry.price;
                let next = store.sell().clone();
                prop_assert!(next.revenue >= prev.revenue);
                prop_assert_eq!(next.desserts_sold, prev.desserts_sold + 1);
                prop_assert!(next.active_entry.threshold_sold >= prev.active_entry.threshold_sold);
                prev = next;
            }
            prop_assert_eq!(prev.desserts_sold, n as u64);
            prop_assert_eq!(prev.revenue, charged);
            prop_assert_eq!(prev.revenue, projected_revenue(store.catalog(), n as u64));
        }
    }
}
