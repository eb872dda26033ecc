//! Read-mostly tick context handed to every behaviour decision

use ahash::{AHashMap, AHashSet};
use rand_chacha::ChaCha8Rng;

use crate::agent::Agent;
use crate::behaviour::BehaviourError;
use crate::core::types::{ObjectId, Tick, Vec2};
use crate::influence::InfluenceMap;
use crate::object::Object;
use crate::spatial::SpatialGrid;
use crate::world::PendingOp;

/// Snapshot of one object's render-relevant state, taken at tick start
#[derive(Debug, Clone)]
pub struct ObjectView {
    pub id: ObjectId,
    pub position: Vec2,
    pub heading: f32,
    pub tag: Option<String>,
    pub is_agent: bool,
}

impl ObjectView {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }
}

/// The world as a behaviour sees it during a tick.
///
/// Queries answer from the start-of-tick snapshot: mid-tick spawn and despawn
/// requests are queued, never visible until the end-of-tick flush. The
/// context is the only mutation channel a behaviour gets; the live collection
/// itself is never touched from here.
pub struct TickCtx<'a> {
    snapshot: &'a [ObjectView],
    grid: &'a SpatialGrid,
    influences: &'a AHashMap<String, InfluenceMap>,
    pending: &'a mut Vec<PendingOp>,
    rng: &'a mut ChaCha8Rng,
    next_id: &'a mut u64,
    tick: Tick,
    elapsed: f32,
}

impl<'a> TickCtx<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        snapshot: &'a [ObjectView],
        grid: &'a SpatialGrid,
        influences: &'a AHashMap<String, InfluenceMap>,
        pending: &'a mut Vec<PendingOp>,
        rng: &'a mut ChaCha8Rng,
        next_id: &'a mut u64,
        tick: Tick,
        elapsed: f32,
    ) -> Self {
        Self {
            snapshot,
            grid,
            influences,
            pending,
            rng,
            next_id,
            tick,
            elapsed,
        }
    }

    /// Tick counter at the start of the current tick
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Simulated seconds elapsed before this tick
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// All objects as of the start of this tick, in insertion order
    pub fn all_objects(&self) -> impl Iterator<Item = &ObjectView> {
        self.snapshot.iter()
    }

    /// Lazily yields snapshot objects satisfying `predicate`, in insertion
    /// order
    pub fn objects_matching<'s, P>(&'s self, predicate: P) -> impl Iterator<Item = &'s ObjectView>
    where
        P: Fn(&ObjectView) -> bool + 's,
    {
        self.snapshot.iter().filter(move |view| predicate(view))
    }

    pub fn find(&self, id: ObjectId) -> Option<&ObjectView> {
        self.snapshot.iter().find(|view| view.id == id)
    }

    /// Objects within `radius` of `center`, grid-accelerated, in insertion
    /// order
    pub fn objects_within(&self, center: Vec2, radius: f32) -> Vec<&ObjectView> {
        let hits: AHashSet<ObjectId> = self.grid.query_radius(center, radius).into_iter().collect();
        self.snapshot
            .iter()
            .filter(|view| hits.contains(&view.id))
            .collect()
    }

    /// Nearest object carrying `tag`, excluding the position itself
    pub fn nearest_tagged(&self, from: Vec2, tag: &str) -> Option<&ObjectView> {
        self.snapshot
            .iter()
            .filter(|view| view.has_tag(tag) && view.position != from)
            .min_by(|a, b| {
                let da = from.distance(&a.position);
                let db = from.distance(&b.position);
                da.total_cmp(&db)
            })
    }

    /// Sample a named influence layer; an unknown layer reads as zero
    pub fn influence(&self, layer: &str, at: Vec2) -> f32 {
        self.influences.get(layer).map_or(0.0, |map| map.sample(at))
    }

    /// The world's deterministic RNG
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        self.rng
    }

    /// Queue a new object for registration at the end of this tick.
    ///
    /// The id is assigned now and returned, but the object joins the live
    /// collection only at the flush.
    pub fn spawn_object(&mut self, mut object: Object) -> Result<ObjectId, BehaviourError> {
        if let Some(id) = object.id() {
            return Err(BehaviourError::new(format!(
                "cannot spawn object already registered as {id:?}"
            )));
        }
        let id = self.allocate_id();
        object.assign_id(id);
        self.pending.push(PendingOp::AddObject(object));
        Ok(id)
    }

    /// Queue a new agent for registration at the end of this tick
    pub fn spawn_agent(&mut self, mut agent: Agent) -> Result<ObjectId, BehaviourError> {
        if let Some(id) = agent.object().id() {
            return Err(BehaviourError::new(format!(
                "cannot spawn agent already registered as {id:?}"
            )));
        }
        let id = self.allocate_id();
        agent.object_mut().assign_id(id);
        self.pending.push(PendingOp::AddAgent(agent));
        Ok(id)
    }

    /// Queue a removal for the end of this tick. Idempotent: duplicate or
    /// stale requests are no-ops at the flush.
    pub fn despawn(&mut self, id: ObjectId) {
        self.pending.push(PendingOp::Remove(id));
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(*self.next_id);
        *self.next_id += 1;
        id
    }
}
