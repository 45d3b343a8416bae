//! Integration tests for tile queries and spike masks.

use mikoo::components::boxcollider::BoxCollider;
use mikoo::resources::tilemap::{
    MAP_HEIGHT, MAP_LEN, MAP_WIDTH, TILE_ANY_BIT, TileMap, TileMask, TileType, mask_hit,
    tile_code,
};

const BLOCK: u16 = tile_code(TileType::Block, TileMask::Full, 0);

/// Boxes spread over one tile, some hanging past its edges.
fn probe_boxes() -> Vec<BoxCollider> {
    let mut boxes = Vec::new();
    for left in (-4..32).step_by(3) {
        for width in [1, 4, 9, 20] {
            for bottom in (-4..32).step_by(5) {
                for height in [1, 6, 15] {
                    boxes.push(BoxCollider::new(left, bottom, left + width, bottom + height));
                }
            }
        }
    }
    boxes
}

fn mirror_x(b: BoxCollider) -> BoxCollider {
    BoxCollider::new(32 - b.right, b.bottom, 32 - b.left, b.top)
}

fn mirror_y(b: BoxCollider) -> BoxCollider {
    BoxCollider::new(b.left, 32 - b.top, b.right, 32 - b.bottom)
}

/// Swap the axes of the tile-local frame (x across, y down from the top).
fn transpose(b: BoxCollider) -> BoxCollider {
    BoxCollider::new(32 - b.top, 32 - b.right, 32 - b.bottom, 32 - b.left)
}

#[test]
fn test_up_spike_is_left_right_symmetric() {
    for b in probe_boxes() {
        assert_eq!(
            mask_hit(b, 0, 0, TileMask::UpSpike),
            mask_hit(mirror_x(b), 0, 0, TileMask::UpSpike),
            "{b:?}"
        );
    }
}

#[test]
fn test_spike_orientations_are_reflections() {
    for b in probe_boxes() {
        let up = mask_hit(b, 0, 0, TileMask::UpSpike);
        let down = mask_hit(b, 0, 0, TileMask::DownSpike);
        assert_eq!(mask_hit(mirror_y(b), 0, 0, TileMask::DownSpike), up, "{b:?}");
        assert_eq!(mask_hit(transpose(b), 0, 0, TileMask::LeftSpike), up, "{b:?}");
        assert_eq!(mask_hit(transpose(b), 0, 0, TileMask::RightSpike), down, "{b:?}");
    }
}

#[test]
fn test_spike_masks_hold_in_any_cell() {
    let mut map = TileMap::new();
    let killer = tile_code(TileType::Killer, TileMask::UpSpike, 0);
    map.set(10, 7, killer);

    // Tip of the spike: centre column near the top of the cell.
    let tip = BoxCollider::new(10 * 32 + 14, 7 * 32 + 28, 10 * 32 + 18, 7 * 32 + 40);
    assert!(map.query(tip, TileType::Killer, TILE_ANY_BIT).is_some());
    // Upper left corner of the cell, above the slope.
    let corner = BoxCollider::new(10 * 32, 7 * 32 + 20, 10 * 32 + 4, 7 * 32 + 40);
    assert!(map.query(corner, TileType::Killer, TILE_ANY_BIT).is_none());
    // Killer tiles never answer block queries.
    assert!(map.query(tip, TileType::Block, TILE_ANY_BIT).is_none());
}

#[test]
fn test_border_walls_are_found_from_every_side() {
    let mut map = TileMap::new();
    map.fill((0, MAP_WIDTH - 1), (0, 0), BLOCK);
    map.fill((0, 0), (0, MAP_HEIGHT - 1), BLOCK);
    map.fill((MAP_WIDTH - 1, MAP_WIDTH - 1), (0, MAP_HEIGHT - 1), BLOCK);
    assert_eq!(map.tiles().len(), MAP_LEN);

    let floor = map
        .query(BoxCollider::new(400, 20, 410, 40), TileType::Block, TILE_ANY_BIT)
        .unwrap();
    assert_eq!((floor.column(), floor.row()), (12, 0));

    let left = map
        .query(BoxCollider::new(25, 300, 40, 320), TileType::Block, TILE_ANY_BIT)
        .unwrap();
    assert_eq!((left.column(), left.row()), (0, 9));

    let right = map
        .query(BoxCollider::new(760, 300, 790, 320), TileType::Block, TILE_ANY_BIT)
        .unwrap();
    assert_eq!(right.column(), MAP_WIDTH - 1);

    assert!(map
        .query(BoxCollider::new(300, 300, 340, 340), TileType::Block, TILE_ANY_BIT)
        .is_none());
}

#[test]
fn test_query_has_no_hidden_state() {
    let mut map = TileMap::new();
    map.set(4, 4, BLOCK);
    map.set(5, 4, tile_code(TileType::Killer, TileMask::DownSpike, 0));
    let probe = BoxCollider::new(130, 130, 180, 150);

    let first = map.query(probe, TileType::Block, TILE_ANY_BIT);
    let killer = map.query(probe, TileType::Killer, TILE_ANY_BIT);
    assert_eq!(map.query(probe, TileType::Block, TILE_ANY_BIT), first);
    assert_eq!(map.query(probe, TileType::Killer, TILE_ANY_BIT), killer);
    assert_eq!(first.map(|h| h.index), Some(4 * MAP_WIDTH + 4));
}
