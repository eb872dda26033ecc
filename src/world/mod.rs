//! World - owns the live object set, advances time, drives the tick protocol

mod view;

pub use view::{ObjectView, TickCtx};

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::agent::Agent;
use crate::core::error::{Result, SimError};
use crate::core::types::{ObjectId, Tick};
use crate::influence::InfluenceMap;
use crate::object::Object;
use crate::spatial::SpatialGrid;

/// Cell size for the snapshot spatial grid (world units)
const GRID_CELL_SIZE: f32 = 10.0;

/// An entry in the live collection: a passive object or an agent
pub enum Entity {
    Object(Object),
    Agent(Agent),
}

impl Entity {
    pub fn object(&self) -> &Object {
        match self {
            Entity::Object(object) => object,
            Entity::Agent(agent) => agent.object(),
        }
    }

    pub fn object_mut(&mut self) -> &mut Object {
        match self {
            Entity::Object(object) => object,
            Entity::Agent(agent) => agent.object_mut(),
        }
    }

    pub fn as_agent(&self) -> Option<&Agent> {
        match self {
            Entity::Agent(agent) => Some(agent),
            Entity::Object(_) => None,
        }
    }

    pub fn as_agent_mut(&mut self) -> Option<&mut Agent> {
        match self {
            Entity::Agent(agent) => Some(agent),
            Entity::Object(_) => None,
        }
    }

    pub fn is_agent(&self) -> bool {
        matches!(self, Entity::Agent(_))
    }

    /// Registered entries always carry an id
    pub fn id(&self) -> ObjectId {
        self.object()
            .id()
            .expect("registered entity always carries an id")
    }
}

/// Buffered structural mutation, applied FIFO at the end of a tick
pub(crate) enum PendingOp {
    AddObject(Object),
    AddAgent(Agent),
    Remove(ObjectId),
}

/// The environment that owns all objects and agents.
///
/// The live collection preserves insertion order, and `update` iterates it in
/// exactly that order: a load-bearing determinism guarantee that lets tests
/// assert exact cross-tick behaviour. Structural mutations requested during a
/// tick (through [`TickCtx`]) are queued and applied once, FIFO, after all
/// updates for that tick complete; mutations requested between ticks (through
/// the methods here) apply immediately.
pub struct World {
    entries: Vec<Entity>,
    index: AHashMap<ObjectId, usize>,
    next_id: u64,
    tick: Tick,
    elapsed: f32,
    pending: Vec<PendingOp>,
    rng: ChaCha8Rng,
    grid: SpatialGrid,
    influences: AHashMap<String, InfluenceMap>,
}

impl World {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// World with a deterministic RNG seed handed to behaviours each tick
    pub fn with_seed(seed: u64) -> Self {
        Self {
            entries: Vec::new(),
            index: AHashMap::new(),
            next_id: 1,
            tick: 0,
            elapsed: 0.0,
            pending: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            grid: SpatialGrid::new(GRID_CELL_SIZE),
            influences: AHashMap::new(),
        }
    }

    /// Register an object immediately. Mid-tick registration goes through
    /// [`TickCtx::spawn_object`] instead, which queues.
    pub fn add_object(&mut self, mut object: Object) -> Result<ObjectId> {
        if let Some(id) = object.id() {
            return Err(SimError::AlreadyRegistered(id));
        }
        let id = self.allocate_id();
        object.assign_id(id);
        self.index.insert(id, self.entries.len());
        self.entries.push(Entity::Object(object));
        tracing::debug!(?id, "object registered");
        Ok(id)
    }

    /// Register an agent immediately. Mid-tick registration goes through
    /// [`TickCtx::spawn_agent`] instead, which queues.
    pub fn add_agent(&mut self, mut agent: Agent) -> Result<ObjectId> {
        if let Some(id) = agent.object().id() {
            return Err(SimError::AlreadyRegistered(id));
        }
        let id = self.allocate_id();
        agent.object_mut().assign_id(id);
        self.index.insert(id, self.entries.len());
        self.entries.push(Entity::Agent(agent));
        tracing::debug!(?id, "agent registered");
        Ok(id)
    }

    /// Remove an entry immediately, returning it with its id cleared.
    ///
    /// Mid-tick removal goes through [`TickCtx::despawn`] instead, which
    /// queues and is idempotent.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<Entity> {
        let Some(idx) = self.index.remove(&id) else {
            return Err(SimError::NotRegistered(id));
        };
        let mut entity = self.entries.remove(idx);
        entity.object_mut().clear_id();
        self.reindex();
        tracing::debug!(?id, "object removed");
        Ok(entity)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&Entity> {
        self.index.get(&id).map(|&idx| &self.entries[idx])
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Entity> {
        let idx = *self.index.get(&id)?;
        Some(&mut self.entries[idx])
    }

    /// Mutable agent access for input collaborators, between ticks
    pub fn get_agent_mut(&mut self, id: ObjectId) -> Option<&mut Agent> {
        self.get_mut(id)?.as_agent_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// All live objects (agent bodies included), in insertion order
    pub fn all_objects(&self) -> impl Iterator<Item = &Object> {
        self.entries.iter().map(Entity::object)
    }

    /// Lazily yields live objects satisfying `predicate`, in insertion order
    pub fn objects_matching<'s, P>(&'s self, predicate: P) -> impl Iterator<Item = &'s Object>
    where
        P: Fn(&Object) -> bool + 's,
    {
        self.all_objects().filter(move |object| predicate(object))
    }

    /// Read-only snapshot of the live collection for renderers and the tick
    /// context
    pub fn snapshot(&self) -> Vec<ObjectView> {
        self.entries
            .iter()
            .map(|entity| {
                let object = entity.object();
                ObjectView {
                    id: entity.id(),
                    position: object.position,
                    heading: object.heading(),
                    tag: object.tag.clone(),
                    is_agent: entity.is_agent(),
                }
            })
            .collect()
    }

    /// Install a named influence layer
    pub fn add_influence_layer(&mut self, name: impl Into<String>, map: InfluenceMap) {
        self.influences.insert(name.into(), map);
    }

    pub fn influence_layer(&self, name: &str) -> Option<&InfluenceMap> {
        self.influences.get(name)
    }

    pub fn influence_layer_mut(&mut self, name: &str) -> Option<&mut InfluenceMap> {
        self.influences.get_mut(name)
    }

    /// Advance the simulation by one tick.
    ///
    /// 1. Snapshot the live collection order and poses.
    /// 2. In snapshot order: agents run perceive -> decide -> act, passive
    ///    objects run their per-tick hook.
    /// 3. Influence layers advance.
    /// 4. Queued mutations apply in FIFO request order.
    /// 5. Tick counter and elapsed time advance by `dt`.
    ///
    /// A behaviour failure aborts the tick: the error propagates, the tick
    /// counter does not advance, and requests already queued stay queued (no
    /// rollback guarantee across a tick).
    pub fn update(&mut self, dt: f32) -> Result<()> {
        let snapshot = self.snapshot();
        self.grid
            .rebuild(snapshot.iter().map(|view| (view.id, view.position)));

        let tick = self.tick;
        let elapsed = self.elapsed;
        {
            let Self {
                entries,
                pending,
                rng,
                next_id,
                grid,
                influences,
                ..
            } = &mut *self;
            let mut ctx = TickCtx::new(
                &snapshot, &*grid, &*influences, pending, rng, next_id, tick, elapsed,
            );

            for entity in entries.iter_mut() {
                match entity {
                    Entity::Agent(agent) => {
                        let id = agent
                            .object()
                            .id()
                            .expect("registered entity always carries an id");
                        agent
                            .update(&mut ctx, dt)
                            .map_err(|source| SimError::Behaviour { id, source })?;
                    }
                    Entity::Object(object) => object.step(dt),
                }
            }
        }

        for layer in self.influences.values_mut() {
            layer.step(dt);
        }

        self.apply_pending();
        self.tick += 1;
        self.elapsed += dt;
        tracing::trace!(tick = self.tick, entries = self.entries.len(), "tick complete");
        Ok(())
    }

    /// Clear all objects and reset simulated time. Influence layers and the
    /// RNG keep their state; id assignment continues from where it was.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.pending.clear();
        self.tick = 0;
        self.elapsed = 0.0;
        tracing::info!("world reset");
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    fn apply_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let ops = std::mem::take(&mut self.pending);
        for op in ops {
            match op {
                PendingOp::AddObject(object) => self.entries.push(Entity::Object(object)),
                PendingOp::AddAgent(agent) => self.entries.push(Entity::Agent(agent)),
                PendingOp::Remove(id) => {
                    // Idempotent: a stale or duplicate request finds nothing
                    if let Some(pos) = self.entries.iter().position(|e| e.id() == id) {
                        self.entries.remove(pos);
                    }
                }
            }
        }
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entity)| (entity.id(), idx))
            .collect();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::behaviour::Inert;
    use proptest::prelude::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut world = World::new();
        let a = world.add_object(Object::new(0.0, 0.0, 0.0)).unwrap();
        let b = world.add_object(Object::new(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(a, ObjectId(1));
        assert_eq!(b, ObjectId(2));
    }

    #[test]
    fn test_already_registered_rejected() {
        let mut world = World::new();
        let id = world.add_object(Object::new(0.0, 0.0, 0.0)).unwrap();
        let clone = world.get(id).unwrap().object().clone();
        assert!(matches!(
            world.add_object(clone),
            Err(SimError::AlreadyRegistered(_))
        ));
    }

    #[test]
    fn test_remove_unknown_id_rejected() {
        let mut world = World::new();
        assert!(matches!(
            world.remove_object(ObjectId(99)),
            Err(SimError::NotRegistered(ObjectId(99)))
        ));
    }

    #[test]
    fn test_removed_entity_comes_back_unregistered() {
        let mut world = World::new();
        let id = world.add_object(Object::new(2.0, 3.0, 0.0)).unwrap();
        let entity = world.remove_object(id).unwrap();
        assert!(entity.object().id().is_none());
        assert!(!world.contains(id));
        assert!(world.is_empty());
    }

    #[test]
    fn test_update_advances_time() {
        let mut world = World::new();
        world.update(0.5).unwrap();
        world.update(0.5).unwrap();
        assert_eq!(world.tick(), 2);
        assert!((world.elapsed() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_passive_object_hook_runs() {
        let mut world = World::new();
        let id = world
            .add_object(
                Object::new(0.0, 0.0, 0.0).with_kinematics(crate::object::Kinematics {
                    velocity: 1.0,
                    angular_velocity: 0.0,
                }),
            )
            .unwrap();
        world.update(1.0).unwrap();
        let x = world.get(id).unwrap().object().position.x;
        assert!((x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_objects_matching_by_tag() {
        let mut world = World::new();
        world
            .add_object(Object::new(0.0, 0.0, 0.0).with_tag("food"))
            .unwrap();
        world.add_object(Object::new(1.0, 0.0, 0.0)).unwrap();
        world
            .add_agent(Agent::new(
                Object::new(2.0, 0.0, 0.0).with_tag("food"),
                Box::new(Inert),
            ))
            .unwrap();
        let food: Vec<_> = world
            .objects_matching(|o| o.tag.as_deref() == Some("food"))
            .collect();
        assert_eq!(food.len(), 2);
    }

    #[test]
    fn test_reset_clears_objects_and_time() {
        let mut world = World::new();
        world.add_object(Object::new(0.0, 0.0, 0.0)).unwrap();
        world.update(1.0).unwrap();
        world.reset();
        assert!(world.is_empty());
        assert_eq!(world.tick(), 0);
        assert_eq!(world.elapsed(), 0.0);
        // Ids keep counting up after a reset
        let id = world.add_object(Object::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(id, ObjectId(2));
    }

    proptest! {
        /// Between ticks, every add/remove applies immediately: after each
        /// call the live collection equals the net effect so far.
        #[test]
        fn prop_between_tick_mutations_apply_immediately(ops in prop::collection::vec(any::<bool>(), 1..40)) {
            let mut world = World::new();
            let mut model: Vec<ObjectId> = Vec::new();

            for add in ops {
                if add || model.is_empty() {
                    let id = world.add_object(Object::new(0.0, 0.0, 0.0)).unwrap();
                    model.push(id);
                } else {
                    let id = model.remove(0);
                    world.remove_object(id).unwrap();
                }
                let live: Vec<ObjectId> = world
                    .all_objects()
                    .map(|o| o.id().unwrap())
                    .collect();
                prop_assert_eq!(&live, &model);
            }
        }
    }
}
