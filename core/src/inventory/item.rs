use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub current_quantity: u32,
    pub capacity: u32,
}

impl InventoryItem {
    pub fn new(id: &str, name: &str, current_quantity: u32, capacity: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            current_quantity: current_quantity.min(capacity),
            capacity,
        }
    }

    /// Adds up to `quantity`, stopping at capacity. Returns the amount actually added.
    pub fn add(&mut self, quantity: u32) -> u32 {
        let room = self.capacity.saturating_sub(self.current_quantity);
        let applied = quantity.min(room);
        self.current_quantity += applied;
        applied
    }
}

/// Stock levels the dashboard starts with.
pub fn default_inventory() -> Vec<InventoryItem> {
    vec![
        InventoryItem::new("1", "Food Kits", 245, 500),
        InventoryItem::new("2", "Medical Kits", 89, 200),
        InventoryItem::new("3", "Rescue Boats", 12, 25),
        InventoryItem::new("4", "Blankets", 367, 600),
    ]
}

/// Result of one add-stock action, as handed to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockChange {
    pub item: String,
    pub requested: u32,
    /// `None` when no displayed item carries this name.
    pub applied: Option<u32>,
    pub current: Option<u32>,
}

impl StockChange {
    pub fn persisted_delta(&self) -> u32 {
        self.applied.unwrap_or(self.requested)
    }
}
