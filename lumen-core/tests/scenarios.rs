#![allow(clippy::unwrap_used)]

use lumen_core::{LightType, LightWorld, LightingConfig, MemoryGrid, VoxelGrid};
use lumen_utils::{BlockPos, ChunkPos};

fn init_and_load(world: &mut LightWorld, grid: &MemoryGrid, chunks: &[ChunkPos]) {
    for pos in chunks {
        world.on_chunk_init(grid, *pos);
    }
    for pos in chunks {
        world.on_chunk_load(grid, *pos);
    }
}

fn square(min: i32, max: i32) -> Vec<ChunkPos> {
    (min..=max)
        .flat_map(|x| (min..=max).map(move |z| ChunkPos::new(x, z)))
        .collect()
}

#[test]
fn test_source_forms_diamond_and_clears() {
    let chunks = square(-1, 2);
    let mut grid = MemoryGrid::new();
    for pos in &chunks {
        grid.insert_chunk(*pos);
    }
    // an opaque floor under a 32x32x32 room
    grid.fill(BlockPos::new(0, 0, 0), BlockPos::new(31, 0, 31), 15, 0);
    let mut world = LightWorld::new("no_sky", false, LightingConfig::default());
    init_and_load(&mut world, &grid, &chunks);

    let source = BlockPos::new(16, 16, 16);
    grid.set_block(source, 0, 15);
    world.on_block_change(&grid, source);
    world.process_light_updates(&grid);

    for x in 1..32 {
        for y in 1..32 {
            for z in 1..32 {
                let pos = BlockPos::new(x, y, z);
                let distance = (x - 16).abs() + (y - 16).abs() + (z - 16).abs();
                let expected = u8::try_from((15 - distance).max(0)).unwrap();
                assert_eq!(world.light(&grid, LightType::Block, pos), expected, "at {pos}");
            }
        }
    }
    assert_eq!(world.light(&grid, LightType::Block, BlockPos::new(16, 0, 16)), 0);

    grid.set_block(source, 0, 0);
    world.on_block_change(&grid, source);
    world.process_light_updates(&grid);
    for x in 0..32 {
        for y in 0..32 {
            for z in 0..32 {
                assert_eq!(world.light(&grid, LightType::Block, BlockPos::new(x, y, z)), 0);
            }
        }
    }
}

#[test]
fn test_opaque_block_shades_open_sky() {
    let chunks = square(-1, 1);
    let mut grid = MemoryGrid::new();
    for pos in &chunks {
        grid.insert_chunk(*pos);
    }
    let mut world = LightWorld::new("overworld", true, LightingConfig::default());
    init_and_load(&mut world, &grid, &chunks);

    let block = BlockPos::new(8, 64, 8);
    grid.set_block(block, 15, 0);
    world.on_block_change(&grid, block);
    world.process_light_updates(&grid);

    assert_eq!(world.sky_light_height(8, 8), Some(65));
    assert_eq!(world.light(&grid, LightType::Sky, BlockPos::new(8, 65, 8)), 15);
    assert_eq!(world.light(&grid, LightType::Sky, block), 0);
    // lit again from the open columns next to it
    assert_eq!(world.light(&grid, LightType::Sky, BlockPos::new(8, 63, 8)), 14);
    assert_eq!(world.light(&grid, LightType::Sky, BlockPos::new(8, 10, 8)), 14);
    assert_eq!(world.light(&grid, LightType::Sky, BlockPos::new(9, 63, 8)), 15);
}

/// Voxel pairs facing each other across the edge between chunk columns `x = 0` and `x = 1`.
fn edge_pairs() -> impl Iterator<Item = (BlockPos, BlockPos)> {
    (0..32).flat_map(|y| {
        (-16..32).map(move |z| (BlockPos::new(15, y, z), BlockPos::new(16, y, z)))
    })
}

#[test]
fn test_deferred_edge_matches_eager_load() {
    let west: Vec<ChunkPos> = (-1..=1)
        .flat_map(|z| [ChunkPos::new(-1, z), ChunkPos::new(0, z)])
        .collect();
    let east: Vec<ChunkPos> = (-1..=1).map(|z| ChunkPos::new(1, z)).collect();
    let torch = BlockPos::new(14, 10, 8);

    let mut grid = MemoryGrid::new();
    for pos in west.iter().chain(&east) {
        grid.insert_chunk(*pos);
    }
    grid.fill(BlockPos::new(-16, 0, -16), BlockPos::new(31, 0, 31), 15, 0);

    // the eastern strip loads only after the torch has been lit
    let mut deferred = LightWorld::new("deferred", false, LightingConfig::default());
    init_and_load(&mut deferred, &grid, &west);
    grid.set_block(torch, 0, 15);
    deferred.on_block_change(&grid, torch);
    deferred.process_light_updates(&grid);
    assert_eq!(deferred.light(&grid, LightType::Block, BlockPos::new(15, 10, 8)), 14);
    assert_eq!(deferred.light(&grid, LightType::Block, BlockPos::new(16, 10, 8)), 0);
    let west_edge = deferred.chunk(ChunkPos::new(0, 0)).unwrap();
    assert!(!west_edge.light_checks.is_empty());

    init_and_load(&mut deferred, &grid, &east);
    deferred.process_light_updates(&grid);

    let mut eager = LightWorld::new("eager", false, LightingConfig::default());
    let all: Vec<ChunkPos> = west.iter().chain(&east).copied().collect();
    init_and_load(&mut eager, &grid, &all);
    eager.on_block_change(&grid, torch);
    eager.process_light_updates(&grid);

    assert_eq!(deferred.light(&grid, LightType::Block, BlockPos::new(16, 10, 8)), 13);
    assert_eq!(deferred.light(&grid, LightType::Block, BlockPos::new(20, 12, 3)), 2);
    for x in 0..32 {
        for y in 0..32 {
            for z in -16..32 {
                let pos = BlockPos::new(x, y, z);
                assert_eq!(
                    deferred.light_uncached(&grid, LightType::Block, pos),
                    eager.light_uncached(&grid, LightType::Block, pos),
                    "at {pos}"
                );
            }
        }
    }

    // light never drops by more than one step across the shared edge of empty air
    for (west_pos, east_pos) in edge_pairs().filter(|(pos, _)| pos.y() > 0) {
        let a = deferred.light_uncached(&grid, LightType::Block, west_pos);
        let b = deferred.light_uncached(&grid, LightType::Block, east_pos);
        assert!(a.abs_diff(b) <= 1, "{west_pos} {a} vs {east_pos} {b}");
    }
    assert!(deferred.chunk(ChunkPos::new(0, 0)).unwrap().light_checks.is_empty());
}

/// Sky light `pos` must hold given its neighbours.
fn expected_sky_light(world: &LightWorld, grid: &MemoryGrid, pos: BlockPos) -> u8 {
    if world.can_see_sky(pos) {
        return 15;
    }
    let attenuation = grid.block_opacity(pos).clamp(1, 15);
    [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)]
        .into_iter()
        .map(|(dx, dy, dz)| pos.offset(dx, dy, dz))
        .filter(|neighbor| (0..=255).contains(&neighbor.y()))
        .map(|neighbor| {
            world
                .light_uncached(grid, LightType::Sky, neighbor)
                .saturating_sub(attenuation)
        })
        .max()
        .unwrap_or(0)
}

/// Grid chunks `x -1..=2`, `z -1..=1` with a stone floor and a roof over the west half of chunk (0, 0).
fn roofed_strip() -> MemoryGrid {
    let mut grid = MemoryGrid::new();
    for x in -1..=2 {
        for z in -1..=1 {
            grid.insert_chunk(ChunkPos::new(x, z));
        }
    }
    grid.fill(BlockPos::new(-16, 0, -16), BlockPos::new(47, 0, 31), 15, 0);
    grid
}

fn place_roof(world: &mut LightWorld, grid: &mut MemoryGrid) {
    for z in 0..16 {
        for x in 8..16 {
            let pos = BlockPos::new(x, 30, z);
            grid.set_block(pos, 15, 0);
            world.on_block_change(&*grid, pos);
        }
    }
    world.process_light_updates(&*grid);
}

#[test]
fn test_loading_open_chunk_relights_shaded_edge() {
    let west: Vec<ChunkPos> = (-1..=1)
        .flat_map(|z| [ChunkPos::new(-1, z), ChunkPos::new(0, z)])
        .collect();
    let east: Vec<ChunkPos> = (-1..=1).map(|z| ChunkPos::new(1, z)).collect();

    let mut grid = roofed_strip();
    let mut deferred = LightWorld::new("deferred", true, LightingConfig::default());
    init_and_load(&mut deferred, &grid, &west);
    place_roof(&mut deferred, &mut grid);
    init_and_load(&mut deferred, &grid, &east);
    deferred.process_light_updates(&grid);

    let mut eager = LightWorld::new("eager", true, LightingConfig::default());
    let open_grid = roofed_strip();
    let all: Vec<ChunkPos> = west.iter().chain(&east).copied().collect();
    init_and_load(&mut eager, &open_grid, &all);
    let mut eager_grid = open_grid;
    place_roof(&mut eager, &mut eager_grid);

    // lit sideways from the open chunk that loaded last
    assert_eq!(deferred.light(&grid, LightType::Sky, BlockPos::new(15, 1, 5)), 14);
    for x in 0..32 {
        for y in 1..=40 {
            for z in -16..32 {
                let pos = BlockPos::new(x, y, z);
                assert_eq!(
                    deferred.light_uncached(&grid, LightType::Sky, pos),
                    eager.light_uncached(&eager_grid, LightType::Sky, pos),
                    "at {pos}"
                );
            }
        }
    }
    for (west_pos, east_pos) in edge_pairs().filter(|(pos, _)| pos.y() > 0 && pos.y() != 30) {
        let a = deferred.light_uncached(&grid, LightType::Sky, west_pos);
        let b = deferred.light_uncached(&grid, LightType::Sky, east_pos);
        assert!(a.abs_diff(b) <= 1, "{west_pos} {a} vs {east_pos} {b}");
    }
}

#[test]
fn test_initial_lighting_reaches_under_existing_roof() {
    let mut grid = MemoryGrid::new();
    for x in -2..=2 {
        for z in -2..=2 {
            grid.insert_chunk(ChunkPos::new(x, z));
        }
    }
    grid.fill(BlockPos::new(-32, 0, -32), BlockPos::new(47, 0, 47), 15, 0);
    // spans chunks (0, 0) and (1, 0) before either is lit
    grid.fill(BlockPos::new(8, 30, 4), BlockPos::new(23, 30, 11), 15, 0);

    let mut world = LightWorld::new("overworld", true, LightingConfig::default());
    init_and_load(&mut world, &grid, &square(-2, 2));
    for pos in square(-1, 1) {
        assert!(world.init_chunk_lighting(&grid, pos));
    }
    world.process_light_updates(&grid);

    assert_eq!(world.sky_light_height(16, 8), Some(31));
    assert_eq!(world.light(&grid, LightType::Sky, BlockPos::new(8, 29, 8)), 14);
    assert_eq!(world.light(&grid, LightType::Sky, BlockPos::new(23, 29, 8)), 14);
    assert_eq!(world.light(&grid, LightType::Sky, BlockPos::new(16, 20, 8)), 11);
    for x in -16..32 {
        for y in 1..=40 {
            for z in -16..32 {
                let pos = BlockPos::new(x, y, z);
                assert_eq!(
                    world.light_uncached(&grid, LightType::Sky, pos),
                    expected_sky_light(&world, &grid, pos),
                    "at {pos}"
                );
            }
        }
    }
}
