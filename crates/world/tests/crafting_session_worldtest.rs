//! Crafting through the session layer: surface selection via effects and
//! block use, then pattern matching on the working grid.

use sandcraft_core::{create_item, BlockKey, ItemKey, Stack};
use sandcraft_world::{create_block, Player, Session};

fn put(session: &mut Session, pos: (usize, usize), name: &str) {
    let item = create_item(&ItemKey::simple(name)).unwrap();
    if let Some(crafter) = session.crafter_mut() {
        let _ = crafter.input_mut().set(pos, Some(Stack::new(item, 1)));
    }
}

#[test]
fn basic_surface_crafts_from_the_2x2_grid() {
    let mut session = Session::bare(1).unwrap();
    session.open_basic_crafting().unwrap();

    for pos in [(0, 0), (0, 1), (1, 0), (1, 1)] {
        put(&mut session, pos, "wood");
    }

    let result = session.crafter().unwrap().craft().unwrap().unwrap();
    assert_eq!(result.item().id(), "crafting_table");
    assert_eq!(result.quantity(), 1);
}

#[test]
fn using_a_crafting_table_unlocks_3x3_recipes() {
    let mut session = Session::bare(1).unwrap();
    let block = create_block(&BlockKey::new("crafting_table")).unwrap();
    session.world_mut().add_block_to_grid(block, (12, 9)).unwrap();
    let center = session.world().grid_to_xy_centre((12, 9));
    session
        .world_mut()
        .add_player(Player::new(), center.x, center.y - 64.0);

    session.right_click(center.x, center.y).unwrap();
    assert_eq!(session.crafter().unwrap().input().size(), (3, 3));

    // A stone sword: stone, stone, stick down the middle column.
    put(&mut session, (0, 1), "stone");
    put(&mut session, (1, 1), "stone");
    put(&mut session, (2, 1), "stick");

    let result = session.crafter().unwrap().craft().unwrap().unwrap();
    assert_eq!(result.item().id(), "stone_sword");
}

#[test]
fn a_single_cell_deviation_crafts_nothing() {
    let mut session = Session::bare(1).unwrap();
    session.open_basic_crafting().unwrap();

    for pos in [(0, 0), (0, 1), (1, 0)] {
        put(&mut session, pos, "wood");
    }

    assert!(session.crafter().unwrap().craft().unwrap().is_none());
}
