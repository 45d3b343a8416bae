//! Integration tests for the slot pool and the entity list built on it.

use mikoo::components::entity::{Entity, EntityKind};
use mikoo::resources::pool::{FixedPool, POOL_CAPACITY};
use mikoo::resources::registry::EntityRegistry;

#[test]
fn test_pool_fill_drain_and_reuse() {
    let mut pool: FixedPool<usize> = FixedPool::new(POOL_CAPACITY);
    let slots: Vec<_> = (0..POOL_CAPACITY)
        .map(|i| pool.acquire(i).unwrap())
        .collect();
    assert_eq!(pool.len(), POOL_CAPACITY);
    assert!(pool.acquire(999).is_err());

    let freed = slots[100];
    assert_eq!(pool.release(freed), Some(100));
    let reused = pool.acquire(1000).unwrap();
    assert_eq!(reused.index(), 100);
    assert_ne!(reused.generation(), freed.generation());
    assert!(pool.get(freed).is_none());
    assert_eq!(pool.get(reused), Some(&1000));

    for (i, slot) in slots.into_iter().enumerate() {
        if i != 100 {
            assert_eq!(pool.release(slot), Some(i));
        }
    }
    assert_eq!(pool.release(reused), Some(1000));
    assert!(pool.is_empty());
    // Every handle is stale now.
    assert!(pool.release(reused).is_none());
}

fn kinds_forward(registry: &EntityRegistry) -> Vec<EntityKind> {
    registry.iter().map(|(_, e)| e.kind()).collect()
}

fn kinds_backward(registry: &EntityRegistry) -> Vec<EntityKind> {
    registry.iter_rev().map(|(_, e)| e.kind()).collect()
}

#[test]
fn test_registry_walks_both_ways_after_removals() {
    let mut registry = EntityRegistry::default();
    let kinds = [
        EntityKind::Warp,
        EntityKind::Kid,
        EntityKind::SavePoint,
        EntityKind::Bullet,
        EntityKind::Thunder,
    ];
    let ids: Vec<_> = kinds
        .iter()
        .map(|&k| registry.insert_tail(Entity::new(k)).unwrap())
        .collect();
    assert_eq!(kinds_forward(&registry), kinds);

    registry.remove(ids[2]);
    assert_eq!(registry.next_of(ids[1]), Some(ids[3]));
    assert_eq!(registry.prev_of(ids[3]), Some(ids[1]));

    registry.remove(ids[0]);
    registry.remove(ids[4]);
    assert_eq!(registry.head(), Some(ids[1]));
    assert_eq!(registry.tail(), Some(ids[3]));
    assert_eq!(
        kinds_forward(&registry),
        vec![EntityKind::Kid, EntityKind::Bullet]
    );
    assert_eq!(
        kinds_backward(&registry),
        vec![EntityKind::Bullet, EntityKind::Kid]
    );

    let removed: Vec<_> = [ids[1], ids[3]]
        .into_iter()
        .filter_map(|id| registry.remove(id))
        .collect();
    assert_eq!(removed.len(), 2);
    assert!(registry.is_empty());
    assert_eq!(registry.head(), None);
    assert_eq!(registry.tail(), None);
}

#[test]
fn test_visit_survives_removing_neighbours() {
    let mut registry = EntityRegistry::default();
    let a = registry.insert_tail(Entity::new(EntityKind::Kid)).unwrap();
    let b = registry.insert_tail(Entity::new(EntityKind::Bullet)).unwrap();
    let c = registry.insert_tail(Entity::new(EntityKind::Warp)).unwrap();

    // While visiting `a`, it removes itself and then its successor.
    registry.begin_visit(a);
    registry.remove(a);
    registry.remove(b);
    assert_eq!(registry.end_visit(), Some(c));

    // Visiting the tail, removing it and appending: the walk reaches the new one.
    registry.begin_visit(c);
    registry.remove(c);
    let d = registry.insert_tail(Entity::new(EntityKind::Thunder)).unwrap();
    assert_eq!(registry.end_visit(), Some(d));
    assert_eq!(registry.ids(), vec![d]);
}
