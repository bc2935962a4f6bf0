use cellvox_core::{EntityKind, GeometryTemplate, ModelLibrary, Position, WorldConfig};
use cellvox_world::behavior::open_moves;
use cellvox_world::World;
use proptest::prelude::*;

fn conway_world(length: i32, width: i32, live: &[(i32, i32)]) -> World {
    let mut world = World::new(&WorldConfig::new(length, width, 1), 42).unwrap();
    let height_map = vec![vec![1; width as usize]; length as usize];
    world
        .set_terrain_with_height_map(EntityKind::ConwayCube, &height_map)
        .unwrap();
    for &(x, y) in live {
        world.get_cell_mut(x, y, 0).unwrap().unwrap().set_alive();
    }
    world
}

fn live_cells(world: &World) -> Vec<Position> {
    world
        .snapshot()
        .occupied()
        .filter(|(_, _, cell)| cell.is_alive())
        .map(|(pos, _, _)| pos)
        .collect()
}

fn rabbit_world(length: i32, width: i32, height: i32, seed: u64) -> World {
    let library = ModelLibrary::new().with_template(
        EntityKind::Rabbit,
        GeometryTemplate::external(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 1.0]],
            vec![[0, 1, 2]],
            None,
        ),
    );
    World::with_assets(
        &WorldConfig::new(length, width, height),
        seed,
        Box::new(library),
    )
    .unwrap()
}

fn find_rabbit(world: &World) -> Position {
    world
        .snapshot()
        .occupied()
        .find(|(_, _, cell)| cell.kind == EntityKind::Rabbit)
        .map(|(pos, _, _)| pos)
        .expect("rabbit should still be in the world")
}

#[test]
fn block_is_a_still_life() {
    let block = [(2, 2), (2, 3), (3, 2), (3, 3)];
    let mut world = conway_world(6, 6, &block);
    let before = live_cells(&world);

    for _ in 0..20 {
        world.advance_generation().unwrap();
        assert_eq!(live_cells(&world), before);
    }
}

#[test]
fn isolated_cell_dies() {
    let mut world = conway_world(5, 5, &[(2, 2)]);
    world.advance_generation().unwrap();
    assert!(live_cells(&world).is_empty());

    let mut pair = conway_world(5, 5, &[(0, 0), (0, 1)]);
    pair.advance_generation().unwrap();
    assert!(live_cells(&pair).is_empty());
}

#[test]
fn blinker_oscillates() {
    let vertical = [(2, 1), (2, 2), (2, 3)];
    let horizontal = vec![
        Position::new(1, 2, 0),
        Position::new(2, 2, 0),
        Position::new(3, 2, 0),
    ];
    let mut world = conway_world(5, 5, &vertical);
    let start = live_cells(&world);

    world.advance_generation().unwrap();
    assert_eq!(live_cells(&world), horizontal);

    world.advance_generation().unwrap();
    assert_eq!(live_cells(&world), start);
}

#[test]
fn life_layers_evolve_independently() {
    let mut world = World::new(&WorldConfig::new(5, 5, 2), 42).unwrap();
    world
        .set_terrain_with_height_map(EntityKind::ConwayCube, &vec![vec![2; 5]; 5])
        .unwrap();
    // Lonely cell on layer 0 directly below a row of three on layer 1
    world.get_cell_mut(2, 2, 0).unwrap().unwrap().set_alive();
    for y in 1..4 {
        world.get_cell_mut(2, y, 1).unwrap().unwrap().set_alive();
    }

    world.advance_generation().unwrap();

    let live = live_cells(&world);
    assert!(live.iter().all(|pos| pos.z == 1));
    assert_eq!(live.len(), 3);
}

#[test]
fn generation_stats_report_activity() {
    let mut world = conway_world(5, 5, &[(2, 1), (2, 2), (2, 3)]);
    let stats = world.advance_generation().unwrap();

    assert_eq!(stats.generation, 1);
    assert_eq!(stats.occupied, 25);
    assert_eq!(stats.live_cells, 3);
    // Two deaths and two births
    assert_eq!(stats.placements, 4);
    assert_eq!(stats.count(EntityKind::ConwayCube), 25);
}

#[test]
fn boxed_in_rabbit_stays() {
    let mut world = rabbit_world(3, 3, 3, 1);
    world
        .set_terrain_with_height_map(EntityKind::Terrain, &vec![vec![3; 3]; 3])
        .unwrap();
    world.set_entity(EntityKind::Rabbit, 1, 1, 1).unwrap();

    world.advance_generation().unwrap();
    assert_eq!(find_rabbit(&world), Position::new(1, 1, 1));
}

#[test]
fn rabbit_keeps_coordinates_in_sync() {
    let mut world = rabbit_world(4, 4, 4, 9);
    world
        .set_terrain_with_height_map(EntityKind::Terrain, &vec![vec![1; 4]; 4])
        .unwrap();
    let start = world.place_entity(EntityKind::Rabbit, 2, 2).unwrap();
    assert_eq!(start, Position::new(2, 2, 1));

    let mut previous = start;
    for _ in 0..30 {
        let stats = world.advance_generation().unwrap();
        assert_eq!(stats.relocations, 1);

        let current = find_rabbit(&world);
        let cell = world
            .get_cell(current.x, current.y, current.z)
            .unwrap()
            .unwrap();
        assert_eq!(cell.position, current);
        assert_eq!(previous.manhattan_distance(&current), 1);
        assert!(world.get_cell(previous.x, previous.y, previous.z).unwrap().is_none());
        previous = current;
    }
}

proptest! {
    #[test]
    fn empty_world_stays_empty(
        length in 1i32..8,
        width in 1i32..8,
        height in 1i32..5,
        seed in any::<u64>(),
    ) {
        let mut world = World::new(&WorldConfig::new(length, width, height), seed).unwrap();
        for _ in 0..3 {
            let stats = world.advance_generation().unwrap();
            prop_assert_eq!(stats.occupied, 0);
        }
        prop_assert!(world.grid().is_empty());
    }

    #[test]
    fn flat_height_map_round_trip(length in 1i32..10, width in 1i32..10, height in 1i32..4) {
        let mut world = World::new(&WorldConfig::new(length, width, height), 0).unwrap();
        let height_map = vec![vec![1; width as usize]; length as usize];
        world.set_terrain_with_height_map(EntityKind::Terrain, &height_map).unwrap();

        for x in 0..length {
            for y in 0..width {
                let floor = world.get_cell(x, y, 0).unwrap();
                prop_assert_eq!(floor.map(|cell| cell.kind), Some(EntityKind::Terrain));
                for z in 1..height {
                    prop_assert!(world.get_cell(x, y, z).unwrap().is_none());
                }
            }
        }
    }

    #[test]
    fn rabbit_moves_one_unit_or_is_boxed_in(
        heights in proptest::collection::vec(0i32..=3, 9),
        x in 0i32..3,
        y in 0i32..3,
        seed in any::<u64>(),
    ) {
        let mut world = rabbit_world(3, 3, 4, seed);
        let height_map: Vec<Vec<i32>> = heights.chunks(3).map(|row| row.to_vec()).collect();
        world.set_terrain_with_height_map(EntityKind::Terrain, &height_map).unwrap();
        let start = world.place_entity(EntityKind::Rabbit, x, y).unwrap();

        let could_move = !open_moves(start, &world.snapshot()).is_empty();
        world.advance_generation().unwrap();
        let end = find_rabbit(&world);

        if could_move {
            prop_assert_eq!(start.manhattan_distance(&end), 1);
        } else {
            prop_assert_eq!(start, end);
        }
        world.check_invariants().unwrap();
    }

    #[test]
    fn magic_terrain_keeps_invariants(
        heights in proptest::collection::vec(1i32..=4, 16),
        seed in any::<u64>(),
    ) {
        let mut world = World::new(&WorldConfig::new(4, 4, 4), seed).unwrap();
        let height_map: Vec<Vec<i32>> = heights.chunks(4).map(|row| row.to_vec()).collect();
        world.set_terrain_with_height_map(EntityKind::MagicTerrain, &height_map).unwrap();

        for _ in 0..10 {
            let stats = world.advance_generation().unwrap();
            prop_assert_eq!(stats.occupied, world.grid().occupied_count());
            prop_assert_eq!(world.cells().len(), world.grid().occupied_count());
            world.check_invariants().unwrap();
        }
    }
}
