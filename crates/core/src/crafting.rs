//! Crafting pattern matcher.
//!
//! A [`GridCrafter`] matches a player-populated NxN working grid against a
//! registered recipe table by exact, position-for-position equality. There
//! is no rotation or reflection invariance and no sub-pattern matching;
//! recipes are tried in registration order and the first exact match wins.
//!
//! Recipe tables are process-wide, immutable, and lazily initialized,
//! keyed by craft surface (`"basic"` for the 2x2 grid, `"crafting_table"`
//! for the 3x3 grid).

use crate::error::RegistryError;
use crate::grid::ItemGrid;
use crate::item::{create_item, ItemKey};
use crate::stack::Stack;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// The craft surface served by a bare 2x2 grid.
pub const SURFACE_BASIC: &str = "basic";

/// The craft surface served by a crafting table's 3x3 grid.
pub const SURFACE_CRAFTING_TABLE: &str = "crafting_table";

/// A fully-specified crafting pattern: one optional item id per cell,
/// row-major. Empty working-grid slots normalize to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    rows: usize,
    cols: usize,
    cells: Vec<Option<String>>,
}

impl Pattern {
    /// Build a pattern from row slices of optional item ids.
    pub fn from_rows(rows: &[&[Option<&str>]]) -> Self {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, |row| row.len());
        debug_assert!(rows.iter().all(|row| row.len() == col_count));

        let cells = rows
            .iter()
            .flat_map(|row| row.iter().map(|cell| cell.map(str::to_string)))
            .collect();
        Self {
            rows: row_count,
            cols: col_count,
            cells,
        }
    }

    /// (rows, columns) dimensions.
    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// One registered recipe: an exact pattern and the stack it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Pattern the working grid must equal cell-for-cell.
    pub pattern: Pattern,
    /// Item produced on a match.
    pub output: ItemKey,
    /// Quantity of the produced item.
    pub count: u32,
}

impl Recipe {
    /// Create a recipe.
    pub fn new(pattern: Pattern, output: ItemKey, count: u32) -> Self {
        Self {
            pattern,
            output,
            count,
        }
    }
}

/// Matches a working grid of stacks against a recipe table.
#[derive(Debug)]
pub struct GridCrafter {
    recipes: Vec<Recipe>,
    input: ItemGrid,
}

impl GridCrafter {
    /// Create a crafter over `recipes` with an empty rows x cols working
    /// grid. Recipes whose pattern dimensions differ from the grid can
    /// never match and are kept only to preserve registration order.
    pub fn new(recipes: Vec<Recipe>, rows: usize, cols: usize) -> Self {
        Self {
            recipes,
            input: ItemGrid::new(rows, cols),
        }
    }

    /// The working input grid.
    pub fn input(&self) -> &ItemGrid {
        &self.input
    }

    /// Mutable access to the working input grid.
    pub fn input_mut(&mut self) -> &mut ItemGrid {
        &mut self.input
    }

    /// Normalize the working grid to a pattern of item ids.
    pub fn current_pattern(&self) -> Pattern {
        let (rows, cols) = self.input.size();
        let cells = self
            .input
            .positions()
            .map(|pos| self.input.get(pos).map(|stack| stack.item().id().to_string()))
            .collect();
        Pattern { rows, cols, cells }
    }

    /// Find the first registered recipe the working grid matches exactly.
    pub fn find_match(&self) -> Option<&Recipe> {
        let current = self.current_pattern();
        self.recipes.iter().find(|recipe| recipe.pattern == current)
    }

    /// Materialize the match result as a stack, or `None` on no match.
    ///
    /// Recipe lookup is pure: the working grid is not consumed.
    pub fn craft(&self) -> Result<Option<Stack>, RegistryError> {
        match self.find_match() {
            Some(recipe) => {
                let item = create_item(&recipe.output)?;
                Ok(Some(Stack::new(item, recipe.count)))
            }
            None => Ok(None),
        }
    }
}

/// Recipe table and grid dimensions for one craft surface.
pub struct SurfaceSpec {
    /// Working grid rows.
    pub rows: usize,
    /// Working grid columns.
    pub cols: usize,
    /// Recipes in registration order.
    pub recipes: Vec<Recipe>,
}

fn basic_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new(
            Pattern::from_rows(&[&[None, Some("wood")], &[None, Some("wood")]]),
            ItemKey::simple("stick"),
            4,
        ),
        Recipe::new(
            Pattern::from_rows(&[&[Some("wood"), Some("wood")], &[Some("wood"), Some("wood")]]),
            ItemKey::simple("crafting_table"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[&[Some("dirt"), Some("dirt")], &[Some("dirt"), Some("dirt")]]),
            ItemKey::simple("wood"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[&[Some("stone"), Some("stone")], &[Some("stone"), Some("stone")]]),
            ItemKey::simple("diamond"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[&[Some("apple"), Some("apple")], &[Some("apple"), Some("apple")]]),
            ItemKey::simple("honey"),
            1,
        ),
    ]
}

fn table_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new(
            Pattern::from_rows(&[
                &[None, None, None],
                &[None, Some("wood"), None],
                &[None, Some("wood"), None],
            ]),
            ItemKey::simple("stick"),
            16,
        ),
        Recipe::new(
            Pattern::from_rows(&[
                &[Some("wood"), Some("wood"), Some("wood")],
                &[None, Some("stick"), None],
                &[None, Some("stick"), None],
            ]),
            ItemKey::tool("pickaxe", "wood"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[
                &[Some("stone"), Some("stone"), Some("stone")],
                &[None, Some("stick"), None],
                &[None, Some("stick"), None],
            ]),
            ItemKey::tool("pickaxe", "stone"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[
                &[Some("diamond"), Some("diamond"), Some("diamond")],
                &[None, Some("stick"), None],
                &[None, Some("stick"), None],
            ]),
            ItemKey::tool("pickaxe", "diamond"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[
                &[Some("wood"), Some("wood"), None],
                &[Some("wood"), Some("stick"), None],
                &[None, Some("stick"), None],
            ]),
            ItemKey::tool("axe", "wood"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[
                &[Some("stone"), Some("stone"), None],
                &[Some("wood"), Some("stick"), None],
                &[None, Some("stick"), None],
            ]),
            ItemKey::tool("axe", "stone"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[
                &[None, Some("wood"), None],
                &[None, Some("stick"), None],
                &[None, Some("stick"), None],
            ]),
            ItemKey::tool("shovel", "wood"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[
                &[None, Some("stone"), None],
                &[None, Some("stick"), None],
                &[None, Some("stick"), None],
            ]),
            ItemKey::tool("shovel", "stone"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[
                &[None, Some("wood"), None],
                &[None, Some("wood"), None],
                &[None, Some("stick"), None],
            ]),
            ItemKey::tool("sword", "wood"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[
                &[None, Some("stone"), None],
                &[None, Some("stone"), None],
                &[None, Some("stick"), None],
            ]),
            ItemKey::tool("sword", "stone"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[
                &[None, None, None],
                &[Some("wool"), Some("wool"), Some("wool")],
                &[Some("wood"), Some("wood"), Some("wood")],
            ]),
            ItemKey::simple("bed"),
            1,
        ),
        Recipe::new(
            Pattern::from_rows(&[
                &[Some("stone"), Some("stone"), Some("stone")],
                &[Some("stone"), None, Some("stone")],
                &[Some("stone"), Some("stone"), Some("stone")],
            ]),
            ItemKey::simple("furnace"),
            1,
        ),
    ]
}

fn builtin_surfaces() -> HashMap<String, SurfaceSpec> {
    let mut surfaces = HashMap::new();
    surfaces.insert(
        SURFACE_BASIC.to_string(),
        SurfaceSpec {
            rows: 2,
            cols: 2,
            recipes: basic_recipes(),
        },
    );
    surfaces.insert(
        SURFACE_CRAFTING_TABLE.to_string(),
        SurfaceSpec {
            rows: 3,
            cols: 3,
            recipes: table_recipes(),
        },
    );
    surfaces
}

static SURFACES: OnceLock<HashMap<String, SurfaceSpec>> = OnceLock::new();

/// Look up the recipe table for a craft surface.
pub fn surface_spec(surface: &str) -> Result<&'static SurfaceSpec, RegistryError> {
    SURFACES
        .get_or_init(builtin_surfaces)
        .get(surface)
        .ok_or_else(|| RegistryError::UnknownSurface(surface.to_string()))
}

/// Build a crafter (with an empty working grid) for a craft surface.
pub fn crafter_for_surface(surface: &str) -> Result<GridCrafter, RegistryError> {
    let spec = surface_spec(surface)?;
    Ok(GridCrafter::new(spec.recipes.clone(), spec.rows, spec.cols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    fn fill(crafter: &mut GridCrafter, cells: &[(usize, usize, &str)]) {
        for (row, col, name) in cells {
            let item = create_item(&ItemKey::simple(name)).unwrap();
            crafter
                .input_mut()
                .set((*row, *col), Some(Stack::new(item, 1)))
                .unwrap();
        }
    }

    #[test]
    fn exact_pattern_matches() {
        let mut crafter = crafter_for_surface(SURFACE_BASIC).unwrap();
        fill(&mut crafter, &[(0, 0, "wood"), (0, 1, "wood"), (1, 0, "wood"), (1, 1, "wood")]);

        let result = crafter.craft().unwrap().unwrap();
        assert_eq!(result.item().id(), "crafting_table");
        assert_eq!(result.quantity(), 1);
    }

    #[test]
    fn single_cell_deviation_is_no_match() {
        let mut crafter = crafter_for_surface(SURFACE_BASIC).unwrap();
        fill(&mut crafter, &[(0, 0, "wood"), (0, 1, "wood"), (1, 0, "wood")]);

        assert!(crafter.find_match().is_none());
        assert!(crafter.craft().unwrap().is_none());
    }

    #[test]
    fn position_matters() {
        // Two wood in the right column craft sticks...
        let mut crafter = crafter_for_surface(SURFACE_BASIC).unwrap();
        fill(&mut crafter, &[(0, 1, "wood"), (1, 1, "wood")]);
        assert_eq!(crafter.craft().unwrap().unwrap().item().id(), "stick");

        // ...but the same two wood in the left column do not.
        let mut crafter = crafter_for_surface(SURFACE_BASIC).unwrap();
        fill(&mut crafter, &[(0, 0, "wood"), (1, 0, "wood")]);
        assert!(crafter.craft().unwrap().is_none());
    }

    #[test]
    fn stack_quantities_do_not_scale_the_result() {
        let mut crafter = crafter_for_surface(SURFACE_BASIC).unwrap();
        for pos in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            let item = create_item(&ItemKey::simple("dirt")).unwrap();
            crafter.input_mut().set(pos, Some(Stack::new(item, 40))).unwrap();
        }

        let result = crafter.craft().unwrap().unwrap();
        assert_eq!(result.item().id(), "wood");
        assert_eq!(result.quantity(), 1);
    }

    #[test]
    fn table_surface_crafts_tools() {
        let mut crafter = crafter_for_surface(SURFACE_CRAFTING_TABLE).unwrap();
        fill(
            &mut crafter,
            &[
                (0, 0, "stone"),
                (0, 1, "stone"),
                (0, 2, "stone"),
                (1, 1, "stick"),
                (2, 1, "stick"),
            ],
        );

        let result = crafter.craft().unwrap().unwrap();
        assert_eq!(result.item().id(), "stone_pickaxe");
        assert_eq!(result.item().durability(), Some(132));
    }

    #[test]
    fn unknown_surface_is_a_lookup_error() {
        let err = crafter_for_surface("anvil").unwrap_err();
        assert_eq!(err, RegistryError::UnknownSurface("anvil".to_string()));
    }

    #[test]
    fn first_registered_match_wins() {
        // Two recipes with identical patterns: registration order decides.
        let pattern = Pattern::from_rows(&[&[Some("wood")]]);
        let recipes = vec![
            Recipe::new(pattern.clone(), ItemKey::simple("stick"), 2),
            Recipe::new(pattern, ItemKey::simple("apple"), 1),
        ];
        let mut crafter = GridCrafter::new(recipes, 1, 1);
        crafter
            .input_mut()
            .set((0, 0), Some(Stack::new(Item::new("wood", crate::item::ItemKind::Simple), 1)))
            .unwrap();

        assert_eq!(crafter.craft().unwrap().unwrap().item().id(), "stick");
    }

    #[test]
    fn crafting_is_pure_lookup() {
        let mut crafter = crafter_for_surface(SURFACE_BASIC).unwrap();
        fill(&mut crafter, &[(0, 1, "wood"), (1, 1, "wood")]);

        let first = crafter.craft().unwrap().unwrap();
        let second = crafter.craft().unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(crafter.input().get((0, 1)).unwrap().quantity(), 1);
    }
}
