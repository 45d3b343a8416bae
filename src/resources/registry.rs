//! Entity registry: an intrusive doubly linked list over pool slots.
//!
//! Entities live in a [`FixedPool`]; each slot also stores the ids of its
//! neighbours, so walking the list never allocates and insertion order is the
//! update order. New entities always go to the tail.
//!
//! The frame driver walks the list while behaviors destroy and spawn
//! entities. [`EntityRegistry::begin_visit`] / [`EntityRegistry::end_visit`]
//! bracket one entity's update; removing the visited entity (or the entity
//! it would have stepped to) during that window patches the successor so the
//! walk continues with a live entity.

use crate::components::boxcollider::BoxCollider;
use crate::components::entity::{Entity, EntityKind};
use crate::resources::pool::{FixedPool, POOL_CAPACITY, PoolExhausted, SlotId};

pub type EntityId = SlotId;

#[derive(Debug)]
struct Node {
    entity: Entity,
    prev: Option<EntityId>,
    next: Option<EntityId>,
}

#[derive(Debug)]
pub struct EntityRegistry {
    pool: FixedPool<Node>,
    head: Option<EntityId>,
    tail: Option<EntityId>,
    /// Entity whose update is running.
    visiting: Option<EntityId>,
    /// Successor to resume from once `visiting` has been removed.
    detached_next: Option<Option<EntityId>>,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(POOL_CAPACITY)
    }
}

impl EntityRegistry {
    pub fn new(capacity: usize) -> Self {
        EntityRegistry {
            pool: FixedPool::new(capacity),
            head: None,
            tail: None,
            visiting: None,
            detached_next: None,
        }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn head(&self) -> Option<EntityId> {
        self.head
    }

    pub fn tail(&self) -> Option<EntityId> {
        self.tail
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.pool.exists(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.pool.get(id).map(|n| &n.entity)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.pool.get_mut(id).map(|n| &mut n.entity)
    }

    /// Overwrite a live entity. Returns `false` if `id` is gone.
    pub fn put(&mut self, id: EntityId, entity: Entity) -> bool {
        match self.pool.get_mut(id) {
            Some(node) => {
                node.entity = entity;
                true
            }
            None => false,
        }
    }

    pub fn next_of(&self, id: EntityId) -> Option<EntityId> {
        self.pool.get(id).and_then(|n| n.next)
    }

    pub fn prev_of(&self, id: EntityId) -> Option<EntityId> {
        self.pool.get(id).and_then(|n| n.prev)
    }

    /// Append `entity` at the tail of the list.
    pub fn insert_tail(&mut self, entity: Entity) -> Result<EntityId, PoolExhausted> {
        let id = self.pool.acquire(Node {
            entity,
            prev: self.tail,
            next: None,
        })?;

        match self.tail.and_then(|t| self.pool.get_mut(t)) {
            Some(last) => last.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);

        // A walk that lost its entity at the old tail resumes here.
        if self.detached_next == Some(None) {
            self.detached_next = Some(Some(id));
        }

        Ok(id)
    }

    /// Unlink `id`, free its slot and hand the entity back. Stale ids are ignored.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let node = self.pool.release(id)?;

        match node.prev.and_then(|p| self.pool.get_mut(p)) {
            Some(prev) => prev.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|n| self.pool.get_mut(n)) {
            Some(next) => next.prev = node.prev,
            None => self.tail = node.prev,
        }

        if self.visiting == Some(id) {
            self.visiting = None;
            self.detached_next = Some(node.next);
        } else if self.detached_next == Some(Some(id)) {
            self.detached_next = Some(node.next);
        }

        Some(node.entity)
    }

    /// Mark `id` as the entity currently being updated.
    pub fn begin_visit(&mut self, id: EntityId) {
        self.visiting = Some(id);
        self.detached_next = None;
    }

    /// Finish the current update and return the entity to visit next.
    pub fn end_visit(&mut self) -> Option<EntityId> {
        let next = match (self.visiting.take(), self.detached_next.take()) {
            (Some(id), _) => self.next_of(id),
            (None, Some(resume)) => resume,
            (None, None) => None,
        };
        next.filter(|&id| self.contains(id))
    }

    /// Forward walk, head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            registry: self,
            cursor: self.head,
            forward: true,
        }
    }

    /// Backward walk, tail to head.
    pub fn iter_rev(&self) -> Iter<'_> {
        Iter {
            registry: self,
            cursor: self.tail,
            forward: false,
        }
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// First entity of `kind` in list order.
    pub fn first_of_kind(&self, kind: EntityKind) -> Option<EntityId> {
        self.iter()
            .find(|(_, e)| e.kind() == kind)
            .map(|(id, _)| id)
    }

    /// First entity of `kind`, other than `me`, whose hit box overlaps `hitbox`.
    ///
    /// Behaviors that work on a detached copy of their entity pass its
    /// current hit box here instead of the stale one in the list.
    pub fn first_hit(
        &self,
        me: EntityId,
        hitbox: BoxCollider,
        kind: EntityKind,
    ) -> Option<EntityId> {
        self.iter()
            .find(|&(id, e)| id != me && e.kind() == kind && hitbox.overlaps(&e.hitbox()))
            .map(|(id, _)| id)
    }
}

pub struct Iter<'a> {
    registry: &'a EntityRegistry,
    cursor: Option<EntityId>,
    forward: bool,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (EntityId, &'a Entity);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.registry.pool.get(id)?;
        self.cursor = if self.forward { node.next } else { node.prev };
        Some((id, &node.entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(reg: &mut EntityRegistry, kind: EntityKind) -> EntityId {
        reg.insert_tail(Entity::new(kind)).unwrap()
    }

    #[test]
    fn test_remove_patches_head_and_tail() {
        let mut reg = EntityRegistry::new(8);
        let a = spawn(&mut reg, EntityKind::Kid);
        let b = spawn(&mut reg, EntityKind::Warp);
        let c = spawn(&mut reg, EntityKind::SavePoint);

        reg.remove(a);
        assert_eq!(reg.head(), Some(b));
        assert_eq!(reg.prev_of(b), None);
        reg.remove(c);
        assert_eq!(reg.tail(), Some(b));
        assert_eq!(reg.ids(), vec![b]);
        reg.remove(b);
        assert!(reg.head().is_none() && reg.tail().is_none());
    }

    #[test]
    fn test_removing_visited_entity_resumes_at_successor() {
        let mut reg = EntityRegistry::new(8);
        let a = spawn(&mut reg, EntityKind::Kid);
        let b = spawn(&mut reg, EntityKind::Bullet);
        let c = spawn(&mut reg, EntityKind::Bullet);

        reg.begin_visit(a);
        reg.remove(a);
        reg.remove(b);
        assert_eq!(reg.end_visit(), Some(c));
    }

    #[test]
    fn test_entity_appended_during_visit_is_reached() {
        let mut reg = EntityRegistry::new(8);
        let a = spawn(&mut reg, EntityKind::Kid);

        reg.begin_visit(a);
        reg.remove(a);
        let g = spawn(&mut reg, EntityKind::GameOver);
        assert_eq!(reg.end_visit(), Some(g));

        reg.begin_visit(g);
        let h = spawn(&mut reg, EntityKind::BloodEmitter);
        assert_eq!(reg.end_visit(), Some(h));
    }

    #[test]
    fn test_first_hit_skips_self() {
        let mut reg = EntityRegistry::new(8);
        let a = spawn(&mut reg, EntityKind::SavePoint);
        let b = spawn(&mut reg, EntityKind::SavePoint);
        let hitbox = reg.get(a).unwrap().hitbox();
        assert_eq!(reg.first_hit(a, hitbox, EntityKind::SavePoint), Some(b));
        reg.remove(b);
        assert_eq!(reg.first_hit(a, hitbox, EntityKind::SavePoint), None);
    }
}
