//! Best-effort measurements over [`CadObject`] capabilities.
//!
//! Every function here swallows [`ProbeError`]s: a missing or failing
//! capability yields the neutral answer ("manifold", "no open edges",
//! `None`) so that callers never fail on something they could not measure.

use print_types::BoundingBox;
use tracing::{debug, warn};

use crate::traits::CadObject;
use crate::types::ProbeError;

/// Default build direction (+Z).
pub const BUILD_DIRECTION: [f64; 3] = [0.0, 0.0, 1.0];

/// Intersections at or below this volume are treated as touching contacts.
pub const NULL_VOLUME_EPSILON: f64 = 1e-9;

fn log_probe_error(what: &str, label: &str, err: &ProbeError) {
    if err.is_unsupported() {
        debug!(object = label, "{what}: {err}");
    } else {
        warn!(object = label, "{what}: {err}");
    }
}

/// Live bounding box: the resolve-then-measure variant first, then the
/// direct one.
pub fn bounding_box(obj: &dyn CadObject) -> Option<BoundingBox> {
    let provider = obj.bounds_provider()?;
    match provider.resolved_bounding_box() {
        Ok(bb) => return Some(bb),
        Err(e) => log_probe_error("resolved bounding box", &obj.label(), &e),
    }
    match provider.bounding_box() {
        Ok(bb) => Some(bb),
        Err(e) => {
            log_probe_error("bounding box", &obj.label(), &e);
            None
        }
    }
}

/// False only when a validity or closedness probe explicitly says so.
pub fn is_manifold(obj: &dyn CadObject) -> bool {
    let Some(probe) = obj.manifoldness_probe() else {
        return true;
    };
    match probe.is_valid() {
        Ok(false) => return false,
        Ok(true) => {}
        Err(e) => log_probe_error("is_valid", &obj.label(), &e),
    }
    match probe.is_closed() {
        Ok(false) => false,
        Ok(true) => true,
        Err(e) => {
            log_probe_error("is_closed", &obj.label(), &e);
            true
        }
    }
}

pub fn has_open_edges(obj: &dyn CadObject) -> bool {
    let Some(probe) = obj.open_edge_probe() else {
        return false;
    };
    match probe.open_edges() {
        Ok(edges) => edges.any(),
        Err(e) => {
            log_probe_error("open edges", &obj.label(), &e);
            false
        }
    }
}

/// Solids of an assembly: `solids()` when it answers, otherwise the
/// children accepted by `keep`.
fn enumerate_solids<'a>(
    obj: &'a dyn CadObject,
    keep: fn(&dyn CadObject) -> bool,
) -> Vec<&'a dyn CadObject> {
    let Some(assembly) = obj.solid_enumerator() else {
        return Vec::new();
    };
    match assembly.solids() {
        Ok(solids) => return solids,
        Err(e) => log_probe_error("solids", &obj.label(), &e),
    }
    match assembly.children() {
        Ok(children) => children.into_iter().filter(|c| keep(*c)).collect(),
        Err(e) => {
            log_probe_error("children", &obj.label(), &e);
            Vec::new()
        }
    }
}

/// True when any two distinct solids overlap with non-null volume.
pub fn has_intersections(obj: &dyn CadObject) -> bool {
    has_intersections_with_epsilon(obj, NULL_VOLUME_EPSILON)
}

pub fn has_intersections_with_epsilon(obj: &dyn CadObject, epsilon: f64) -> bool {
    let solids = enumerate_solids(obj, |c| c.intersection_probe().is_some());
    for (i, a) in solids.iter().enumerate() {
        let Some(probe) = a.intersection_probe() else {
            continue;
        };
        for b in &solids[i + 1..] {
            match probe.intersect(*b) {
                Ok(Some(common)) if !common.is_null(epsilon) => {
                    debug!(
                        first = a.label(),
                        second = b.label(),
                        volume = common.volume,
                        "solids intersect"
                    );
                    return true;
                }
                Ok(_) => {}
                Err(e) => log_probe_error("intersect", &a.label(), &e),
            }
        }
    }
    false
}

/// Smallest distance between any two distinct solids, trying both
/// directions of each pair.
pub fn minimum_clearance(obj: &dyn CadObject) -> Option<f64> {
    let solids = enumerate_solids(obj, |c| c.distance_probe().is_some());
    let mut best: Option<f64> = None;
    for (i, a) in solids.iter().enumerate() {
        for b in &solids[i + 1..] {
            for (from, to) in [(*a, *b), (*b, *a)] {
                let Some(probe) = from.distance_probe() else {
                    continue;
                };
                match probe.distance_to(to) {
                    Ok(d) if d.is_finite() => {
                        best = Some(best.map_or(d, |m| m.min(d)));
                    }
                    Ok(d) => debug!(object = from.label(), distance = d, "ignoring non-finite distance"),
                    Err(e) => log_probe_error("distance", &from.label(), &e),
                }
            }
        }
    }
    best
}

fn normalized(v: [f64; 3]) -> Option<[f64; 3]> {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if !(len > 0.0) || !len.is_finite() {
        return None;
    }
    Some([v[0] / len, v[1] / len, v[2] / len])
}

/// Angle in degrees between a face normal and the build axis, ignoring
/// orientation. `None` for zero-length input.
pub fn overhang_angle_deg(normal: [f64; 3], build_direction: [f64; 3]) -> Option<f64> {
    let n = normalized(normal)?;
    let d = normalized(build_direction)?;
    let dot = (n[0] * d[0] + n[1] * d[1] + n[2] * d[2]).abs().clamp(0.0, 1.0);
    Some(dot.acos().to_degrees())
}

/// Largest overhang angle over all faces that yield a normal.
pub fn max_overhang_angle(obj: &dyn CadObject, build_direction: [f64; 3]) -> Option<f64> {
    let provider = obj.face_provider()?;
    let faces = match provider.faces() {
        Ok(faces) => faces,
        Err(e) => {
            log_probe_error("faces", &obj.label(), &e);
            return None;
        }
    };

    let mut max: Option<f64> = None;
    for face in &faces {
        let normal = match face.normal_at() {
            Ok(n) => Some(n),
            Err(e) if e.is_unsupported() => face.stored_normal(),
            Err(e) => {
                log_probe_error("normal_at", &obj.label(), &e);
                None
            }
        };
        let Some(angle) = normal.and_then(|n| overhang_angle_deg(n, build_direction)) else {
            continue;
        };
        max = Some(max.map_or(angle, |m| m.max(angle)));
    }
    max
}
