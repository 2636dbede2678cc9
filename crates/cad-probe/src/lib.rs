//! Capability probing over CAD objects.
//!
//! The CAD kernel is consumed through narrow capability traits
//! ([`BoundsProvider`], [`ManifoldnessProbe`], [`DistanceProbe`], ...). A
//! [`CadObject`] exposes each one optionally; [`probes`] turns them into
//! best-effort measurements that degrade to "unavailable" instead of failing.
//!
//! Two adapters ship with the crate:
//!
//! - [`MockPart`] / [`MockAssembly`]: deterministic axis-aligned test doubles
//! - [`TruckPart`] / [`TruckAssembly`]: B-rep geometry backed by `truck`

pub mod mock_part;
pub mod primitives;
pub mod probes;
pub mod tessellation;
pub mod traits;
pub mod truck_part;
pub mod types;

pub use mock_part::{Capability, MockAssembly, MockFace, MockPart};
pub use probes::{BUILD_DIRECTION, NULL_VOLUME_EPSILON};
pub use traits::*;
pub use truck_part::{TruckAssembly, TruckPart};
pub use types::*;
