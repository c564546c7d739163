//! Serde round trips of the public value types.

use alphasurf::prelude::*;

#[test]
fn test_point_json() {
    let p = Point::new([1.5, -2.0, 0.25]);
    let json = serde_json::to_string(&p).unwrap();
    let back: Point = serde_json::from_str(&json).unwrap();
    assert_eq!(back, p);

    let wp = weighted_point!([0.0, 1.0, 2.0], 2.25);
    let back: WeightedPoint = serde_json::from_str(&serde_json::to_string(&wp).unwrap()).unwrap();
    assert_eq!(back, wp);
}

#[test]
fn test_options_json() {
    let options = TriangulationOptionsBuilder::default()
        .bounding_scale(1e6)
        .max_walk_steps(50)
        .build()
        .unwrap();
    let json = serde_json::to_string(&options).unwrap();
    let back: TriangulationOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}

#[test]
fn test_simplices_json() {
    let points = vec![
        Point::new([0.0, 0.0, 0.0]),
        Point::new([1.0, 0.0, 0.0]),
        Point::new([0.0, 1.0, 0.0]),
        Point::new([0.0, 0.0, 1.0]),
    ];
    let tri = Triangulation::new(&points).unwrap();

    let tets: Vec<Tetrahedron> = tri.tetrahedra().to_vec();
    let json = serde_json::to_string(&tets).unwrap();
    let back: Vec<Tetrahedron> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tets);

    let counts = tri.f_vector();
    let back: FVector = serde_json::from_str(&serde_json::to_string(&counts).unwrap()).unwrap();
    assert_eq!(back, counts);
}

#[test]
fn test_surface_type_json() {
    for surface_type in [
        SurfaceType::VanDerWaals,
        SurfaceType::SolventAccessible,
        SurfaceType::SolventExcluded,
    ] {
        let json = serde_json::to_string(&surface_type).unwrap();
        let back: SurfaceType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, surface_type);
    }
    assert_eq!(
        serde_json::to_string(&SurfaceType::SolventAccessible).unwrap(),
        "\"SolventAccessible\""
    );
}

#[test]
fn test_coordinate_set_json() {
    let mut z = InternalCoordinates::new(3);
    z.set_coordinates(1, 1.1, 0.0, 0.0).unwrap();
    z.set_connections(2, 1, 0, 0).unwrap();
    z.set_coordinates(2, 1.3, 104.5, 0.0).unwrap();
    let set = CoordinateSet::Internal(z);

    let json = serde_json::to_string(&set).unwrap();
    let back: CoordinateSet = serde_json::from_str(&json).unwrap();
    assert_eq!(back, set);
    assert_eq!(back.len(), 3);
}
