#![deny(warnings)]

//! Core domain models and invariants for Dessert Clicker.
//!
//! This crate defines the dessert catalog, the validation that guards its
//! ordering invariants, and the tier resolver that maps a cumulative sales
//! count to the dessert currently in production.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

/// Unique identifier for a dessert, e.g. "cupcake", "kitkat".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DessertId(pub String);

impl std::fmt::Display for DessertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One tier of the catalog: a dessert, what it sells for, and when it unlocks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Dessert identifier.
    pub id: DessertId,
    /// Price of a single unit in whole dollars.
    pub price: u64,
    /// Reference to the image rendered for this dessert.
    pub image_ref: String,
    /// Minimum cumulative sales before this dessert goes into production.
    pub threshold_sold: u64,
}

impl CatalogEntry {
    pub fn new(id: &str, price: u64, image_ref: &str, threshold_sold: u64) -> Self {
        Self {
            id: DessertId(id.to_string()),
            price,
            image_ref: image_ref.to_string(),
            threshold_sold,
        }
    }
}

/// Validation errors for catalog invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A catalog needs at least one entry.
    #[error("catalog must contain at least one entry")]
    EmptyCatalog,
    /// The first dessert must be available from the start.
    #[error("first entry must unlock at 0 sold, found {0}")]
    FirstThresholdNotZero(u64),
    /// Thresholds must be strictly ascending.
    #[error("entry {id} has threshold {threshold} which does not follow the previous entry")]
    ThresholdsNotAscending { id: String, threshold: u64 },
    /// Dessert ids must be unique.
    #[error("duplicate dessert id: {0}")]
    DuplicateId(String),
    /// Required text field is empty.
    #[error("{0} must not be blank")]
    BlankField(&'static str),
}

/// Validate a single entry in isolation.
pub fn validate_entry(entry: &CatalogEntry) -> Result<(), ValidationError> {
    if entry.id.0.trim().is_empty() {
        return Err(ValidationError::BlankField("id"));
    }
    if entry.image_ref.trim().is_empty() {
        return Err(ValidationError::BlankField("image_ref"));
    }
    Ok(())
}

/// Validate an ordered list of entries as a whole.
pub fn validate_entries(entries: &[CatalogEntry]) -> Result<(), ValidationError> {
    let first = entries.first().ok_or(ValidationError::EmptyCatalog)?;
    if first.threshold_sold != 0 {
        return Err(ValidationError::FirstThresholdNotZero(first.threshold_sold));
    }
    let mut ids: BTreeSet<&DessertId> = BTreeSet::new();
    let mut prev: Option<u64> = None;
    for e in entries {
        validate_entry(e)?;
        if !ids.insert(&e.id) {
            return Err(ValidationError::DuplicateId(e.id.0.clone()));
        }
        if let Some(p) = prev {
            if e.threshold_sold <= p {
                return Err(ValidationError::ThresholdsNotAscending {
                    id: e.id.0.clone(),
                    threshold: e.threshold_sold,
                });
            }
        }
        prev = Some(e.threshold_sold);
    }
    Ok(())
}

/// Non-empty catalog sorted by ascending unlock threshold, starting at 0.
///
/// The only way to obtain one is through [`Catalog::new`] (or deserializing,
/// which goes through the same checks), so every `Catalog` upholds the
/// invariants the resolver relies on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CatalogEntry>", into = "Vec<CatalogEntry>")]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, ValidationError> {
        validate_entries(&entries)?;
        debug!(tiers = entries.len(), "catalog loaded");
        Ok(Self { entries })
    }

    /// The entry every new game starts with.
    pub fn first(&self) -> &CatalogEntry {
        &self.entries[0]
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept alongside `len` for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &DessertId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }
}

impl TryFrom<Vec<CatalogEntry>> for Catalog {
    type Error = ValidationError;

    fn try_from(entries: Vec<CatalogEntry>) -> Result<Self, Self::Error> {
        Catalog::new(entries)
    }
}

impl From<Catalog> for Vec<CatalogEntry> {
    fn from(c: Catalog) -> Self {
        c.entries
    }
}

/// Pick the dessert in production after `sold_count` sales.
///
/// Returns the entry with the largest `threshold_sold <= sold_count`. The
/// scan stops at the first locked entry since thresholds are ascending.
pub fn resolve(catalog: &Catalog, sold_count: u64) -> &CatalogEntry {
    let mut active = catalog.first();
    for entry in catalog.entries() {
        if entry.threshold_sold > sold_count {
            break;
        }
        active = entry;
    }
    active
}

/// Revenue accumulated by `sold_count` consecutive sales from a fresh start.
///
/// Sale number `k` (0-based) is charged at the price of `resolve(catalog, k)`,
/// so each tier contributes its price times the number of sales made while it
/// was active. Saturates at `u64::MAX`.
pub fn projected_revenue(catalog: &Catalog, sold_count: u64) -> u64 {
    let entries = catalog.entries();
    let mut total: u64 = 0;
    for (i, e) in entries.iter().enumerate() {
        if sold_count <= e.threshold_sold {
            break;
        }
        let end = entries
            .get(i + 1)
            .map_or(sold_count, |next| next.threshold_sold.min(sold_count));
        let units = end - e.threshold_sold;
        total = total.saturating_add(e.price.saturating_mul(units));
    }
    total
}

/// The stock bakery lineup, cheapest first.
pub fn dessert_catalog() -> Catalog {
    let entries = vec![
        CatalogEntry::new("cupcake", 5, "cupcake.png", 0),
        CatalogEntry::new("donut", 10, "donut.png", 5),
        CatalogEntry::new("eclair", 15, "eclair.png", 20),
        CatalogEntry::new("froyo", 30, "froyo.png", 50),
        CatalogEntry::new("gingerbread", 50, "gingerbread.png", 100),
        CatalogEntry::new("honeycomb", 100, "honeycomb.png", 200),
        CatalogEntry::new("icecreamsandwich", 500, "icecreamsandwich.png", 500),
        CatalogEntry::new("jellybean", 1000, "jellybean.png", 1000),
        CatalogEntry::new("kitkat", 2000, "kitkat.png", 2000),
        CatalogEntry::new("lollipop", 3000, "lollipop.png", 4000),
        CatalogEntry::new("marshmallow", 4000, "marshmallow.png", 8000),
        CatalogEntry::new("nougat", 5000, "nougat.png", 16000),
        CatalogEntry::new("oreo", 6000, "oreo.png", 20000),
    ];
    Catalog { entries }
}
