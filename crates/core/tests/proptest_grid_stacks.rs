//! Property-based tests for stack and grid mechanics
//!
//! Validates the container invariants:
//! - Stack quantities never exceed max_stack_size
//! - Adding to a stack conserves total item count
//! - Grid add_item never duplicates or loses an item
//! - Different item ids never merge

use proptest::prelude::*;
use sandcraft_core::{create_item, Item, ItemGrid, ItemKey, Stack};

fn block_item(name: &str) -> Item {
    create_item(&ItemKey::simple(name)).unwrap()
}

proptest! {
    /// Property: adding to a stack conserves the total count.
    #[test]
    fn stack_add_conserves_count(
        start in 1u32..64,
        added in 0u32..128,
    ) {
        let mut stack = Stack::new(block_item("stone"), start);
        let leftover = stack.add(added);

        prop_assert!(stack.quantity() <= stack.item().max_stack_size());
        prop_assert_eq!(stack.quantity() + leftover, start + added);
    }

    /// Property: subtracting never removes more than was present.
    #[test]
    fn stack_subtract_is_bounded(
        start in 1u32..64,
        removed in 0u32..128,
    ) {
        let mut stack = Stack::new(block_item("dirt"), start);
        let taken = stack.subtract(removed);

        prop_assert!(taken <= start);
        prop_assert_eq!(stack.quantity() + taken, start);
    }

    /// Property: grid add_item neither duplicates nor loses items.
    ///
    /// After adding N single items of one kind, the total quantity held by
    /// the grid plus the number of rejected items equals N.
    #[test]
    fn grid_add_conserves_items(
        adds in 1usize..200,
        rows in 1usize..3,
        cols in 1usize..4,
    ) {
        let mut grid = ItemGrid::new(rows, cols);
        let mut rejected = 0usize;

        for _ in 0..adds {
            if grid.add_item(block_item("wood")).is_err() {
                rejected += 1;
            }
        }

        let held: u32 = grid.stacks().map(|(_, stack)| stack.quantity()).sum();
        prop_assert_eq!(held as usize + rejected, adds);

        for (_, stack) in grid.stacks() {
            prop_assert!(stack.quantity() <= stack.item().max_stack_size());
            prop_assert!(stack.quantity() > 0);
        }
    }

    /// Property: different item ids end up in different slots.
    #[test]
    fn grid_never_merges_different_ids(
        wood_adds in 1usize..32,
        stone_adds in 1usize..32,
    ) {
        let mut grid = ItemGrid::new(2, 2);

        for _ in 0..wood_adds {
            let _ = grid.add_item(block_item("wood"));
        }
        for _ in 0..stone_adds {
            let _ = grid.add_item(block_item("stone"));
        }

        for (_, stack) in grid.stacks() {
            let id = stack.item().id();
            prop_assert!(id == "wood" || id == "stone");
        }

        let wood_held: u32 = grid
            .stacks()
            .filter(|(_, s)| s.item().id() == "wood")
            .map(|(_, s)| s.quantity())
            .sum();
        prop_assert!(wood_held as usize <= wood_adds);
    }
}
