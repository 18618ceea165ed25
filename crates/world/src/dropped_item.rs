//! Dropped items: item payloads wrapped in a small physical body.

use sandcraft_core::Item;
use serde::{Deserialize, Serialize};

/// Ticks a dropped item survives before despawning.
pub const ITEM_DESPAWN_TICKS: u32 = 6000;

/// Full extent of a dropped item's square body, in pixels.
pub const DROPPED_ITEM_SIZE: f32 = 10.0;

/// An item lying in the world, waiting to be picked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedItem {
    item: Item,
    age: u32,
}

impl DroppedItem {
    /// Wrap an item for the world.
    pub fn new(item: Item) -> Self {
        Self { item, age: 0 }
    }

    /// The wrapped item.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Age in ticks.
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Advance one tick. Returns true once the item has expired.
    pub fn tick(&mut self) -> bool {
        self.age = self.age.saturating_add(1);
        self.age >= ITEM_DESPAWN_TICKS
    }

    /// Unwrap the item (pickup).
    pub fn into_item(self) -> Item {
        self.item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandcraft_core::{create_item, ItemKey};

    #[test]
    fn items_expire_after_their_lifetime() {
        let item = create_item(&ItemKey::simple("stone")).unwrap();
        let mut dropped = DroppedItem::new(item);
        assert_eq!(dropped.age(), 0);

        for _ in 0..ITEM_DESPAWN_TICKS - 1 {
            assert!(!dropped.tick());
        }
        assert!(dropped.tick());
        assert_eq!(dropped.age(), ITEM_DESPAWN_TICKS);
    }

    #[test]
    fn pickup_recovers_the_item() {
        let item = create_item(&ItemKey::simple("apple")).unwrap();
        let dropped = DroppedItem::new(item.clone());
        assert_eq!(dropped.into_item(), item);
    }
}
