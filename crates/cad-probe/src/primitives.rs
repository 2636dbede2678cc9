//! Primitive builders on top of truck's sweep API.
//!
//! truck has no built-in box or cylinder; everything is successive sweeps.

use std::f64::consts::PI;
use truck_modeling::builder;
use truck_modeling::topology::Solid;
use truck_modeling::{Point3, Rad, Vector3};

use crate::types::GeometryError;

/// Box solid with its minimum corner at `origin`, extending by (w, h, d).
pub fn make_box_at(origin: [f64; 3], w: f64, h: f64, d: f64) -> Solid {
    let v = builder::vertex(Point3::new(origin[0], origin[1], origin[2]));
    let edge = builder::tsweep(&v, Vector3::new(w, 0.0, 0.0));
    let face = builder::tsweep(&edge, Vector3::new(0.0, h, 0.0));
    builder::tsweep(&face, Vector3::new(0.0, 0.0, d))
}

/// Box solid from (0,0,0) to (w,h,d).
pub fn make_box(w: f64, h: f64, d: f64) -> Solid {
    make_box_at([0.0; 3], w, h, d)
}

/// Cylinder with its base centered at `center` in the XY plane, along +Z.
pub fn make_cylinder_at(center: [f64; 3], radius: f64, height: f64) -> Result<Solid, GeometryError> {
    let c = Point3::new(center[0], center[1], center[2]);
    let v = builder::vertex(Point3::new(center[0] + radius, center[1], center[2]));
    let wire = builder::rsweep(&v, c, Vector3::unit_z(), Rad(2.0 * PI));
    let face = builder::try_attach_plane(&[wire]).map_err(|e| GeometryError::Construction {
        shape: "cylinder",
        reason: e.to_string(),
    })?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, 0.0, height)))
}
