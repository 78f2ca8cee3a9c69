//! World geometry decoding.
//!
//! Accepts a TopoJSON topology (as published by world-atlas, with quantized
//! delta-encoded arcs) or a plain GeoJSON feature collection.

use crate::codes::normalize_numeric;
use crate::data::parse_json;
use crate::error::{AtlasError, Result};
use crate::geo::{GeoFeature, Polygon, Ring};
use geojson::{feature::Id, GeoJson, Geometry, Value};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize)]
struct Sniff {
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Deserialize)]
struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    objects: HashMap<String, TopoGeometry>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
}

#[derive(Deserialize, Clone, Copy)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Deserialize)]
struct TopoGeometry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    properties: Option<Properties>,
    #[serde(default)]
    arcs: Option<ArcRefs>,
    #[serde(default)]
    geometries: Vec<TopoGeometry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(f64),
}

#[derive(Deserialize, Default)]
struct Properties {
    #[serde(default)]
    name: Option<String>,
}

/// Arc index lists; the nesting depth depends on the geometry type
#[derive(Deserialize)]
#[serde(untagged)]
enum ArcRefs {
    Multi(Vec<Vec<Vec<i64>>>),
    Single(Vec<Vec<i64>>),
    Line(Vec<i64>),
}

/// Decode world geometry from either supported format
pub fn decode_world(bytes: Vec<u8>) -> Result<Vec<GeoFeature>> {
    let sniff: Sniff = parse_json(bytes.clone())?;
    if sniff.kind == "Topology" {
        let topology: Topology = parse_json(bytes)?;
        decode_topology(topology)
    } else {
        let text = String::from_utf8(bytes).map_err(|e| AtlasError::Topology {
            message: format!("geometry is not UTF-8: {}", e),
        })?;
        let geojson: GeoJson = text.parse()?;
        Ok(features_from_geojson(&geojson))
    }
}

fn decode_topology(topology: Topology) -> Result<Vec<GeoFeature>> {
    let arcs = decode_arcs(&topology.arcs, topology.transform);

    // Prefer the conventional "countries" object, else the first by name
    let mut objects = topology.objects;
    let root = match objects.remove("countries") {
        Some(root) => root,
        None => {
            let first = objects.keys().min().cloned().ok_or_else(|| AtlasError::Topology {
                message: "topology has no objects".into(),
            })?;
            objects.remove(&first).ok_or_else(|| AtlasError::Topology {
                message: format!("object {} vanished", first),
            })?
        }
    };

    let geometries = if root.kind.as_deref() == Some("GeometryCollection") {
        root.geometries
    } else {
        vec![root]
    };

    geometries
        .into_iter()
        .map(|geometry| topo_feature(geometry, &arcs))
        .collect()
}

/// Undo quantization and delta encoding
fn decode_arcs(raw: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Vec<Vec<(f64, f64)>> {
    raw.iter()
        .map(|arc| match transform {
            Some(t) => {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| {
                        x += p[0];
                        y += p[1];
                        (x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1])
                    })
                    .collect()
            }
            None => arc.iter().filter(|p| p.len() >= 2).map(|p| (p[0], p[1])).collect(),
        })
        .collect()
}

fn topo_feature(geometry: TopoGeometry, arcs: &[Vec<(f64, f64)>]) -> Result<GeoFeature> {
    let id = geometry.id.map(|raw| match raw {
        RawId::Text(text) => normalize_numeric(&text).unwrap_or(text),
        RawId::Number(n) => {
            let raw = format!("{}", n as i64);
            normalize_numeric(&raw).unwrap_or(raw)
        }
    });
    let name = geometry.properties.unwrap_or_default().name;

    let polygons = match (geometry.kind.as_deref(), geometry.arcs) {
        (Some("Polygon"), Some(ArcRefs::Single(rings))) => vec![stitch_polygon(&rings, arcs)?],
        (Some("MultiPolygon"), Some(ArcRefs::Multi(polys))) => polys
            .iter()
            .map(|rings| stitch_polygon(rings, arcs))
            .collect::<Result<Vec<_>>>()?,
        _ => Vec::new(),
    };

    Ok(GeoFeature { id, name, polygons })
}

fn stitch_polygon(rings: &[Vec<i64>], arcs: &[Vec<(f64, f64)>]) -> Result<Polygon> {
    rings.iter().map(|refs| stitch_ring(refs, arcs)).collect()
}

/// Concatenate arcs into a ring; shared endpoints appear once
fn stitch_ring(refs: &[i64], arcs: &[Vec<(f64, f64)>]) -> Result<Ring> {
    let mut ring: Ring = Vec::new();
    for &arc_ref in refs {
        let (index, reversed) = if arc_ref < 0 { (!arc_ref, true) } else { (arc_ref, false) };
        let arc = usize::try_from(index)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or_else(|| AtlasError::Topology {
                message: format!("arc reference {} out of range", arc_ref),
            })?;

        let skip = usize::from(!ring.is_empty());
        if reversed {
            ring.extend(arc.iter().rev().skip(skip));
        } else {
            ring.extend(arc.iter().skip(skip));
        }
    }
    Ok(ring)
}

/// Convert a GeoJSON document into features, keeping shapes without polygons
pub fn features_from_geojson(geojson: &GeoJson) -> Vec<GeoFeature> {
    match geojson {
        GeoJson::FeatureCollection(fc) => fc
            .features
            .iter()
            .map(|feature| {
                let id = feature.id.as_ref().map(|id| match id {
                    Id::String(s) => normalize_numeric(s).unwrap_or_else(|| s.clone()),
                    Id::Number(n) => {
                        let raw = n.to_string();
                        normalize_numeric(&raw).unwrap_or(raw)
                    }
                });
                let name = feature
                    .properties
                    .as_ref()
                    .and_then(|p| p.get("name"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                let mut polygons = Vec::new();
                if let Some(ref geometry) = feature.geometry {
                    collect_polygons(geometry, &mut polygons);
                }
                GeoFeature { id, name, polygons }
            })
            .collect(),
        GeoJson::Feature(f) => {
            let collection = geojson::FeatureCollection {
                bbox: None,
                features: vec![f.clone()],
                foreign_members: None,
            };
            features_from_geojson(&GeoJson::FeatureCollection(collection))
        }
        GeoJson::Geometry(geometry) => {
            let mut polygons = Vec::new();
            collect_polygons(geometry, &mut polygons);
            vec![GeoFeature { id: None, name: None, polygons }]
        }
    }
}

fn collect_polygons(geometry: &Geometry, out: &mut Vec<Polygon>) {
    let to_ring = |coords: &Vec<Vec<f64>>| -> Ring { coords.iter().map(|c| (c[0], c[1])).collect() };
    match &geometry.value {
        Value::Polygon(rings) => out.push(rings.iter().map(to_ring).collect()),
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                out.push(rings.iter().map(to_ring).collect());
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_polygons(g, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPO: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [1, 1], "translate": [0, 0]},
        "objects": {"countries": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "id": "250", "properties": {"name": "France"}, "arcs": [[0, 1]]},
            {"type": "MultiPolygon", "id": 4, "arcs": [[[-2]]]},
            {"type": "Polygon", "id": "999", "arcs": [[0]]},
            {"type": null, "id": "010"}
        ]}},
        "arcs": [
            [[0, 0], [10, 0], [0, 10]],
            [[10, 10], [-10, 0], [0, -10]]
        ]
    }"#;

    #[test]
    fn test_topology_decodes_every_geometry() {
        let features = decode_world(TOPO.as_bytes().to_vec()).unwrap();
        assert_eq!(features.len(), 4);
        assert_eq!(features[0].id.as_deref(), Some("250"));
        assert_eq!(features[0].name.as_deref(), Some("France"));
        assert_eq!(features[1].id.as_deref(), Some("004"));
        assert!(features[3].polygons.is_empty());
    }

    #[test]
    fn test_arcs_are_delta_decoded_and_stitched() {
        let features = decode_world(TOPO.as_bytes().to_vec()).unwrap();
        let ring = &features[0].polygons[0][0];
        // Arc 0: (0,0) (10,0) (10,10); arc 1 continues without repeating (10,10)
        assert_eq!(
            ring,
            &vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]
        );
    }

    #[test]
    fn test_negative_refs_reverse_arcs() {
        let features = decode_world(TOPO.as_bytes().to_vec()).unwrap();
        let ring = &features[1].polygons[0][0];
        assert_eq!(ring, &vec![(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
    }

    #[test]
    fn test_out_of_range_arc_is_an_error() {
        let bad = r#"{"type":"Topology","objects":{"countries":{"type":"GeometryCollection",
            "geometries":[{"type":"Polygon","id":"1","arcs":[[5]]}]}},"arcs":[]}"#;
        let err = decode_world(bad.as_bytes().to_vec()).unwrap_err();
        assert!(matches!(err, AtlasError::Topology { .. }));
    }

    #[test]
    fn test_geojson_collection() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","id":"36","properties":{"name":"Australia"},
             "geometry":{"type":"Polygon","coordinates":[[[113,-22],[153,-28],[145,-38],[113,-22]]]}},
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[0,0]}}
        ]}"#;
        let features = decode_world(json.as_bytes().to_vec()).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id.as_deref(), Some("036"));
        assert_eq!(features[0].polygons[0][0].len(), 4);
        assert!(features[1].polygons.is_empty());
    }
}
