use glam::Vec3;
use msph_core::grid::UniformGrid;

const H: f32 = 4.0;

fn grid_for(fluid_count: usize) -> UniformGrid {
    UniformGrid::new(Vec3::new(50.0, 50.0, 50.0), 6.0, H, 64, 64, fluid_count)
}

#[test]
fn test_cutoff_selects_neighbors() {
    // Particles at 0.5h, 1.0h and 1.2h from particle 0; the cutoff is 1.1h.
    let positions = vec![
        Vec3::new(25.0, 25.0, 25.0),
        Vec3::new(25.0 + 0.5 * H, 25.0, 25.0),
        Vec3::new(25.0 + 1.0 * H, 25.0, 25.0),
        Vec3::new(25.0 + 1.2 * H, 25.0, 25.0),
    ];
    let mut grid = grid_for(4);
    let report = grid.build(&positions, 4);
    assert!(!report.overflowed());

    let nei: Vec<u32> = grid.neighbors(0).to_vec();
    assert!(nei.contains(&1), "0.5h neighbor missing");
    assert!(nei.contains(&2), "1.0h neighbor missing");
    assert!(!nei.contains(&3), "1.2h particle must be outside the cutoff");
    assert_eq!(grid.neighbor_count(0), 2);
}

#[test]
fn test_self_excluded_and_no_duplicates() {
    let positions = vec![
        Vec3::new(10.0, 10.0, 10.0),
        Vec3::new(11.0, 10.0, 10.0),
        Vec3::new(10.0, 11.0, 10.0),
    ];
    let mut grid = grid_for(3);
    grid.build(&positions, 3);

    for i in 0..3 {
        let nei = grid.neighbors(i);
        assert!(!nei.contains(&(i as u32)), "particle {i} lists itself");
        let mut sorted: Vec<u32> = nei.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), nei.len(), "particle {i} has duplicate neighbors");
    }
}

#[test]
fn test_completeness_against_brute_force() {
    // Deterministic scatter across several cells, including the box edges.
    let mut positions = Vec::new();
    for i in 0..120 {
        let t = i as f32;
        positions.push(Vec3::new(
            1.0 + (t * 0.37).sin().abs() * 47.0,
            1.0 + (t * 0.61).cos().abs() * 47.0,
            1.0 + (t * 0.23).sin().abs() * 47.0,
        ));
    }
    let count = positions.len();
    let mut grid = grid_for(count);
    let report = grid.build(&positions, count);
    assert!(!report.overflowed());

    let cutoff = 1.1 * H;
    for i in 0..count {
        let nei = grid.neighbors(i);
        for j in 0..count {
            if i == j {
                continue;
            }
            let within = (positions[i] - positions[j]).length() < cutoff;
            let listed = nei.contains(&(j as u32));
            assert_eq!(
                within, listed,
                "particle {i} / candidate {j}: within={within} listed={listed}"
            );
        }
    }
}

#[test]
fn test_wall_suffix_appears_in_fluid_neighborhoods() {
    // Two fluid particles plus a wall particle (index >= fluid_count) close
    // to fluid particle 0. Neighbor lists exist for the fluid prefix only.
    let positions = vec![
        Vec3::new(20.0, 20.0, 20.0),
        Vec3::new(40.0, 40.0, 40.0),
        Vec3::new(20.0, 20.0, 21.0), // wall
    ];
    let mut grid = grid_for(2);
    grid.build(&positions, 2);

    assert!(grid.neighbors(0).contains(&2), "wall neighbor missing");
    assert_eq!(grid.neighbor_count(1), 0);
}

#[test]
fn test_cell_bucket_overflow_reported() {
    let positions = vec![Vec3::new(10.0, 10.0, 10.0); 5];
    let mut grid = UniformGrid::new(Vec3::splat(50.0), 6.0, H, 2, 64, 5);
    let report = grid.build(&positions, 5);
    assert!(report.cell_overflow, "five particles in a capacity-2 bucket");
    assert!(report.overflowed());
}

#[test]
fn test_neighbor_bucket_overflow_reported() {
    let mut positions = vec![Vec3::new(10.0, 10.0, 10.0)];
    for k in 0..4 {
        positions.push(Vec3::new(10.0 + 0.2 * (k + 1) as f32, 10.0, 10.0));
    }
    let mut grid = UniformGrid::new(Vec3::splat(50.0), 6.0, H, 64, 2, 5);
    let report = grid.build(&positions, 5);
    assert!(report.neighbor_overflow, "four in-range neighbors, capacity 2");
    // The list is truncated at capacity, not corrupted.
    assert_eq!(grid.neighbor_count(0), 2);
}

#[test]
fn test_rebuild_follows_positions() {
    let mut positions = vec![Vec3::new(10.0, 10.0, 10.0), Vec3::new(40.0, 40.0, 40.0)];
    let mut grid = grid_for(2);
    grid.build(&positions, 2);
    assert_eq!(grid.neighbor_count(0), 0);

    positions[1] = Vec3::new(11.0, 10.0, 10.0);
    grid.build(&positions, 2);
    assert_eq!(grid.neighbor_count(0), 1);
    assert_eq!(grid.neighbors(0), &[1]);
}

#[test]
fn test_positions_outside_box_are_clamped_into_grid() {
    // A particle that has not been boundary-corrected yet must still be
    // indexed, not dropped or out of bounds.
    let positions = vec![Vec3::new(-1.0, -1.0, -1.0), Vec3::new(0.5, 0.5, 0.5)];
    let mut grid = grid_for(2);
    let report = grid.build(&positions, 2);
    assert!(!report.overflowed());
    assert!(grid.neighbors(0).contains(&1));
    assert!(grid.neighbors(1).contains(&0));
}
