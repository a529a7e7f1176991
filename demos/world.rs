//! A tiny game world: every entity owns a transform
//!
//! Entities and transforms live in two tables with different resource types.
//! Both are created and removed together, so an entity and its transform
//! always share index and generation; one id converts into the other by
//! swapping the type tag.
//!
//! Run with `RUST_LOG=resource_table=trace` to see the table's events.

use resource_table::{Resource, ResourceHandle, ResourceTable, ResourceType};
use tracing::info;
use tracing_subscriber::EnvFilter;

const ENTITY: ResourceType = 1;
const TRANSFORM: ResourceType = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Entity(Resource<ENTITY>);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Transform(Resource<TRANSFORM>);

impl Entity {
    fn transform(self) -> Transform {
        Transform(Resource::new(self.0.id().with_resource_type(TRANSFORM)))
    }
}

impl Transform {
    fn entity(self) -> Entity {
        Entity(Resource::new(self.0.id().with_resource_type(ENTITY)))
    }
}

#[derive(Debug)]
struct EntityData {
    name: &'static str,
}

#[derive(Debug, Clone, Copy)]
struct TransformData {
    position: [f32; 3],
    scale: [f32; 3],
}

impl Default for TransformData {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

struct World {
    entities: ResourceTable<EntityData>,
    transforms: ResourceTable<TransformData>,
}

impl World {
    fn new(capacity: usize) -> Self {
        Self {
            entities: ResourceTable::new(ENTITY, capacity),
            transforms: ResourceTable::new(TRANSFORM, capacity),
        }
    }

    fn spawn(&mut self, name: &'static str, transform: TransformData) -> Entity {
        let entity = Entity(Resource::new(self.entities.insert(EntityData { name })));
        let transform_id = self.transforms.insert(transform);
        debug_assert_eq!(transform_id, entity.transform().0.id());
        entity
    }

    fn despawn(&mut self, entity: Entity) -> usize {
        let removed = self.entities.erase(entity.0.id());
        if removed == 1 {
            self.transforms.erase(entity.transform().0.id());
        }
        removed
    }

    fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains(entity.0.id())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut world = World::new(2);

    let player = world.spawn(
        "player",
        TransformData {
            position: [0.0, 1.0, 0.0],
            ..Default::default()
        },
    );
    let crate_box = world.spawn("crate", TransformData::default());
    // Third spawn grows both tables by one slot
    let tree = world.spawn(
        "tree",
        TransformData {
            position: [4.0, 0.0, -2.0],
            scale: [1.0, 3.0, 1.0],
        },
    );

    for entity in [player, crate_box, tree] {
        let transform = entity.transform();
        info!(
            entity = %entity.0.id(),
            transform = %transform.0.id(),
            name = world.entities[entity.0.id()].name,
            position = ?world.transforms[transform.0.id()].position,
            scale = ?world.transforms[transform.0.id()].scale,
            "spawned"
        );
        assert_eq!(transform.entity(), entity);
    }

    world.transforms[player.transform().0.id()].position[2] += 5.0;

    world.despawn(crate_box);
    info!(alive = world.is_alive(crate_box), "crate despawned");

    let rock = world.spawn("rock", TransformData::default());
    info!(
        reused_index = rock.0.id().index() == crate_box.0.id().index(),
        generation = rock.0.id().generation(),
        "rock spawned"
    );

    // A stale id and a transform id are both rejected by the entity table
    let stale: ResourceHandle = crate_box.0.into();
    info!(
        stale = world.entities.try_get(stale).is_err(),
        foreign = !world.entities.contains(rock.transform().0.id()),
        "lookup checks"
    );

    world.transforms.defragment(|a, b| a.position[0] < b.position[0]);
    for (id, data) in world.transforms.iter() {
        info!(transform = %id, position = ?data.position, "transform");
    }

    println!(
        "{} entities alive, player at {:?}",
        world.entities.len(),
        world.transforms[player.transform().0.id()].position
    );
}
