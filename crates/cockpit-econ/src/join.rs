//! Key lookups between inventory rows and master data.

use cockpit_core::{BomItem, DashboardData, InventoryRecord, Plant};
use std::collections::HashMap;

/// Lookup tables built once per loaded dataset.
///
/// When master data repeats a key the first row wins.
#[derive(Debug)]
pub struct DatasetIndex<'a> {
    bom_by_sku: HashMap<&'a str, &'a BomItem>,
    plant_by_id: HashMap<&'a str, &'a Plant>,
    inventory: &'a [InventoryRecord],
}

/// An inventory row with its (possibly unresolved) master data.
#[derive(Clone, Copy, Debug)]
pub struct JoinedInventory<'a> {
    pub record: &'a InventoryRecord,
    pub bom: Option<&'a BomItem>,
    pub plant: Option<&'a Plant>,
}

impl JoinedInventory<'_> {
    /// True only when the SKU resolves to a `Critical` component.
    pub fn is_critical(&self) -> bool {
        self.bom.is_some_and(BomItem::is_critical)
    }
}

impl<'a> DatasetIndex<'a> {
    pub fn new(data: &'a DashboardData) -> Self {
        let mut bom_by_sku = HashMap::with_capacity(data.bom.len());
        for b in &data.bom {
            bom_by_sku.entry(b.sku_code.as_str()).or_insert(b);
        }
        let mut plant_by_id = HashMap::with_capacity(data.plants.len());
        for p in &data.plants {
            plant_by_id.entry(p.plant_id.as_str()).or_insert(p);
        }
        Self {
            bom_by_sku,
            plant_by_id,
            inventory: &data.inventory,
        }
    }

    pub fn bom(&self, sku_code: &str) -> Option<&'a BomItem> {
        self.bom_by_sku.get(sku_code).copied()
    }

    pub fn plant(&self, plant_id: &str) -> Option<&'a Plant> {
        self.plant_by_id.get(plant_id).copied()
    }

    /// All inventory rows in input order, joined to BOM and plant.
    pub fn joined(&self) -> impl Iterator<Item = JoinedInventory<'a>> + '_ {
        self.inventory.iter().map(move |record| JoinedInventory {
            record,
            bom: self.bom(&record.sku_code),
            plant: self.plant(&record.plant_id),
        })
    }

    /// Inventory rows whose SKU resolves to a `Critical` component.
    pub fn critical_inventory(&self) -> impl Iterator<Item = JoinedInventory<'a>> + '_ {
        self.joined().filter(JoinedInventory::is_critical)
    }
}

/// Inventory rows whose SKU or plant does not resolve.
pub fn orphan_inventory<'a>(index: &DatasetIndex<'a>) -> Vec<JoinedInventory<'a>> {
    index
        .joined()
        .filter(|j| j.bom.is_none() || j.plant.is_none())
        .collect()
}
