//! Typed polygon rings parsed from GeoJSON coordinates.

use serde_json::Value;

use crate::data::Geometry;

/// Closed ring of `[lon, lat]` points.
pub type Ring = Vec<[f64; 2]>;
/// Outer ring first, holes after.
pub type Polygon = Vec<Ring>;
pub type MultiPolygon = Vec<Polygon>;

/// Parses `Polygon` and `MultiPolygon` geometries. Malformed points are
/// skipped, empty rings and polygons dropped, other geometry types ignored.
pub fn parse_geometry(geometry: &Geometry) -> MultiPolygon {
    match geometry.kind.as_str() {
        "Polygon" => {
            let polygon = parse_polygon(&geometry.coordinates);
            if polygon.is_empty() { Vec::new() } else { vec![polygon] }
        }
        "MultiPolygon" => geometry.coordinates
            .as_array()
            .map(|polygons| {
                polygons.iter()
                    .map(parse_polygon)
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn parse_polygon(value: &Value) -> Polygon {
    value.as_array()
        .map(|rings| rings.iter().map(parse_ring).filter(|r| !r.is_empty()).collect())
        .unwrap_or_default()
}

fn parse_ring(value: &Value) -> Ring {
    value.as_array()
        .map(|points| points.iter().filter_map(parse_point).collect())
        .unwrap_or_default()
}

fn parse_point(value: &Value) -> Option<[f64; 2]> {
    let point = value.as_array()?;
    if point.len() < 2 {
        return None;
    }
    Some([point[0].as_f64()?, point[1].as_f64()?])
}

/// Shoelace area in squared degrees; zero for fewer than three points.
pub fn ring_area(ring: &[[f64; 2]]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let twice: f64 = ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| a[0] * b[1] - b[0] * a[1])
        .sum();
    twice.abs() / 2.0
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounding box over every ring of every polygon, `None` without points.
    pub fn of(polygons: &[Polygon]) -> Option<Self> {
        let mut points = polygons.iter().flatten().flatten();
        let first = points.next()?;
        let init = Self { min_x: first[0], max_x: first[0], min_y: first[1], max_y: first[1] };
        Some(points.fold(init, |b, p| Self {
            min_x: b.min_x.min(p[0]),
            max_x: b.max_x.max(p[0]),
            min_y: b.min_y.min(p[1]),
            max_y: b.max_y.max(p[1]),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// Splits off the polygon with the largest outer ring as the main shape;
/// every other polygon is a detached island.
pub fn split_main(multi: &[Polygon]) -> Option<(&Polygon, Vec<&Polygon>)> {
    let main_index = multi.iter()
        .enumerate()
        .map(|(i, p)| (i, p.first().map_or(0.0, |ring| ring_area(ring))))
        .fold(None, |best: Option<(usize, f64)>, (i, area)| match best {
            Some((_, best_area)) if best_area >= area => best,
            _ => Some((i, area)),
        })?
        .0;
    let islands = multi.iter()
        .enumerate()
        .filter(|(i, _)| *i != main_index)
        .map(|(_, p)| p)
        .collect();
    Some((&multi[main_index], islands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn geometry(kind: &str, coordinates: Value) -> Geometry {
        Geometry { kind: kind.to_string(), coordinates }
    }

    #[test]
    fn parses_polygon_and_multipolygon() {
        let polygon = geometry("Polygon", json!([[[0, 0], [2, 0], [2, 2], [0, 0]]]));
        let multi = geometry("MultiPolygon", json!([
            [[[0, 0], [1, 0], [1, 1], [0, 0]]],
            [[[5, 5], [6, 5], [6, 6], [5, 5]]]
        ]));

        let parsed = parse_geometry(&polygon);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0][0][1], [2.0, 0.0]);
        assert_eq!(parse_geometry(&multi).len(), 2);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let messy = geometry("MultiPolygon", json!([
            [[[0, 0], [1], "x", [1.5, 2.5, 100.0], [3, 3]]],
            [],
            "not a polygon",
            [[]]
        ]));

        let parsed = parse_geometry(&messy);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0][0], vec![[0.0, 0.0], [1.5, 2.5], [3.0, 3.0]]);
    }

    #[test]
    fn unsupported_types_yield_nothing() {
        assert!(parse_geometry(&geometry("Point", json!([1, 2]))).is_empty());
        assert!(parse_geometry(&geometry("Polygon", json!("garbage"))).is_empty());
    }

    #[test]
    fn shoelace_area() {
        let square = vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]];
        let clockwise: Ring = square.iter().rev().copied().collect();

        assert_eq!(ring_area(&square), 16.0);
        assert_eq!(ring_area(&clockwise), 16.0);
        assert_eq!(ring_area(&[[0.0, 0.0], [1.0, 1.0]]), 0.0);
    }

    #[test]
    fn bounds_cover_all_rings() {
        let polygons = vec![
            vec![vec![[-3.0, 1.0], [2.0, 5.0]]],
            vec![vec![[10.0, -4.0]]],
        ];

        let bounds = Bounds::of(&polygons).unwrap();
        assert_eq!(bounds, Bounds { min_x: -3.0, max_x: 10.0, min_y: -4.0, max_y: 5.0 });
        assert!(Bounds::of(&[]).is_none());
        assert!(Bounds::of(&[vec![vec![[1.0, 1.0]]]]).unwrap().is_degenerate());
    }

    #[test]
    fn largest_polygon_is_main_shape() {
        let small = vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]];
        let large = vec![vec![[5.0, 5.0], [9.0, 5.0], [9.0, 9.0], [5.0, 9.0], [5.0, 5.0]]];
        let multi = vec![small.clone(), large.clone()];

        let (main, islands) = split_main(&multi).unwrap();
        assert_eq!(main, &large);
        assert_eq!(islands, vec![&small]);
        assert!(split_main(&[]).is_none());
    }
}
