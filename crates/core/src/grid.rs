//! Item grids: fixed-size slot containers for stacks.
//!
//! A [`Stack`] is owned by exactly one grid slot at a time; transfers in
//! and out are move operations, never shared references.

use crate::item::Item;
use crate::stack::Stack;
use serde::{Deserialize, Serialize};

/// (row, column) slot address.
pub type SlotPos = (usize, usize);

/// A fixed rows x columns container of optional stacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemGrid {
    rows: usize,
    cols: usize,
    slots: Vec<Option<Stack>>,
}

impl ItemGrid {
    /// Create an empty grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            slots: vec![None; rows * cols],
        }
    }

    /// (rows, columns) dimensions.
    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn index(&self, (row, col): SlotPos) -> Option<usize> {
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    /// The stack at a slot, if any.
    pub fn get(&self, pos: SlotPos) -> Option<&Stack> {
        self.index(pos).and_then(|i| self.slots[i].as_ref())
    }

    /// Mutable access to the stack at a slot.
    pub fn get_mut(&mut self, pos: SlotPos) -> Option<&mut Stack> {
        self.index(pos).and_then(|i| self.slots[i].as_mut())
    }

    /// Put a stack into a slot, returning the previous occupant.
    ///
    /// Out-of-bounds positions return the stack unchanged as an `Err`.
    pub fn set(&mut self, pos: SlotPos, stack: Option<Stack>) -> Result<Option<Stack>, Option<Stack>> {
        match self.index(pos) {
            Some(i) => Ok(std::mem::replace(&mut self.slots[i], stack)),
            None => Err(stack),
        }
    }

    /// Take the stack out of a slot, leaving it empty.
    pub fn take(&mut self, pos: SlotPos) -> Option<Stack> {
        self.index(pos).and_then(|i| self.slots[i].take())
    }

    /// Whether a single item could be added somewhere in the grid.
    pub fn can_accept(&self, item: &Item) -> bool {
        self.slots.iter().any(|slot| match slot {
            Some(stack) => stack.accepts(item),
            None => true,
        })
    }

    /// Add one item, merging into a matching stack first and falling back
    /// to the first empty slot. Returns the item back if the grid is full.
    pub fn add_item(&mut self, item: Item) -> Result<(), Item> {
        for slot in self.slots.iter_mut().flatten() {
            if slot.accepts(&item) {
                slot.add(1);
                return Ok(());
            }
        }
        for slot in &mut self.slots {
            if slot.is_none() {
                *slot = Some(Stack::new(item, 1));
                return Ok(());
            }
        }
        Err(item)
    }

    /// Iterate `(position, stack)` over occupied slots.
    pub fn stacks(&self) -> impl Iterator<Item = (SlotPos, &Stack)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref()
                .map(|stack| ((i / self.cols, i % self.cols), stack))
        })
    }

    /// Iterate every slot position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = SlotPos> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| (row, col)))
    }

    /// Remove every stack.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Whether every slot is occupied by a full or unmergeable stack for
    /// the purposes of a single-item add.
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_some())
    }
}

/// An [`ItemGrid`] with a single tracked selection (the active hotbar slot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectableGrid {
    grid: ItemGrid,
    selected: Option<SlotPos>,
}

impl SelectableGrid {
    /// Create an empty selectable grid with nothing selected.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            grid: ItemGrid::new(rows, cols),
            selected: None,
        }
    }

    /// Select a slot. Out-of-bounds selections are ignored.
    pub fn select(&mut self, pos: SlotPos) {
        let (rows, cols) = self.grid.size();
        if pos.0 < rows && pos.1 < cols {
            self.selected = Some(pos);
        }
    }

    /// Select a slot, or clear the selection when it is already selected.
    pub fn toggle_selection(&mut self, pos: SlotPos) {
        if self.selected == Some(pos) {
            self.selected = None;
        } else {
            self.select(pos);
        }
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// The selected slot position, if any.
    pub fn selected(&self) -> Option<SlotPos> {
        self.selected
    }

    /// The stack in the selected slot, if any.
    pub fn selected_stack(&self) -> Option<&Stack> {
        self.selected.and_then(|pos| self.grid.get(pos))
    }

    /// Mutable access to the stack in the selected slot.
    pub fn selected_stack_mut(&mut self) -> Option<&mut Stack> {
        self.selected.and_then(|pos| self.grid.get_mut(pos))
    }

    /// Take the stack out of the selected slot.
    pub fn take_selected(&mut self) -> Option<Stack> {
        self.selected.and_then(|pos| self.grid.take(pos))
    }

    /// The underlying grid.
    pub fn grid(&self) -> &ItemGrid {
        &self.grid
    }

    /// Mutable access to the underlying grid.
    pub fn grid_mut(&mut self) -> &mut ItemGrid {
        &mut self.grid
    }
}

impl std::ops::Deref for SelectableGrid {
    type Target = ItemGrid;

    fn deref(&self) -> &ItemGrid {
        &self.grid
    }
}

impl std::ops::DerefMut for SelectableGrid {
    fn deref_mut(&mut self) -> &mut ItemGrid {
        &mut self.grid
    }
}
