use std::any::Any;

use print_types::{BoundingBox, ObjectId};

use crate::types::{Intersection, OpenEdges, ProbeError};

/// A CAD object handed to an exporter.
///
/// Every capability is optional. An accessor returning `None` means the
/// object does not offer that capability at all; a capability method
/// returning [`ProbeError::Unsupported`] means the specific variant of the
/// query is missing (for example a bounding box without the resolve step).
pub trait CadObject: Any {
    fn object_id(&self) -> ObjectId;

    fn label(&self) -> String {
        format!("object#{}", self.object_id().0)
    }

    fn as_any(&self) -> &dyn Any;

    fn bounds_provider(&self) -> Option<&dyn BoundsProvider> {
        None
    }

    fn manifoldness_probe(&self) -> Option<&dyn ManifoldnessProbe> {
        None
    }

    fn open_edge_probe(&self) -> Option<&dyn OpenEdgeProbe> {
        None
    }

    fn solid_enumerator(&self) -> Option<&dyn SolidEnumerator> {
        None
    }

    fn intersection_probe(&self) -> Option<&dyn IntersectionProbe> {
        None
    }

    fn distance_probe(&self) -> Option<&dyn DistanceProbe> {
        None
    }

    fn face_provider(&self) -> Option<&dyn FaceProvider> {
        None
    }
}

/// Axis-aligned bounds, either after resolving the object to concrete
/// geometry or read directly.
pub trait BoundsProvider {
    fn resolved_bounding_box(&self) -> Result<BoundingBox, ProbeError> {
        Err(ProbeError::unsupported("resolved_bounding_box"))
    }

    fn bounding_box(&self) -> Result<BoundingBox, ProbeError>;
}

pub trait ManifoldnessProbe {
    fn is_valid(&self) -> Result<bool, ProbeError> {
        Err(ProbeError::unsupported("is_valid"))
    }

    fn is_closed(&self) -> Result<bool, ProbeError> {
        Err(ProbeError::unsupported("is_closed"))
    }
}

pub trait OpenEdgeProbe {
    fn open_edges(&self) -> Result<OpenEdges, ProbeError>;
}

/// Enumerates the solids of an assembly-like object.
pub trait SolidEnumerator {
    fn solids(&self) -> Result<Vec<&dyn CadObject>, ProbeError> {
        Err(ProbeError::unsupported("solids"))
    }

    fn children(&self) -> Result<Vec<&dyn CadObject>, ProbeError> {
        Err(ProbeError::unsupported("children"))
    }
}

pub trait IntersectionProbe {
    /// `Ok(None)` when the kernel reports no common region.
    fn intersect(&self, other: &dyn CadObject) -> Result<Option<Intersection>, ProbeError>;
}

pub trait DistanceProbe {
    fn distance_to(&self, other: &dyn CadObject) -> Result<f64, ProbeError>;
}

pub trait FaceProvider {
    fn faces(&self) -> Result<Vec<Box<dyn FaceNormal + '_>>, ProbeError>;
}

/// A face normal, either computed on demand or stored on the face.
pub trait FaceNormal {
    fn normal_at(&self) -> Result<[f64; 3], ProbeError> {
        Err(ProbeError::unsupported("normal_at"))
    }

    fn stored_normal(&self) -> Option<[f64; 3]> {
        None
    }
}
