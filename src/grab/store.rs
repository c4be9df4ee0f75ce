use slotmap::SlotMap;

use crate::error::GrabError;
use crate::math::{Point3, Vector3};

use super::query::{GrabNotify, LayerMask, SpatialQuery, SphereCast};
use super::ControllerId;

slotmap::new_key_type! {
    /// Unique identifier for a grabbable object.
    pub struct GrabbableId;
}

/// A sphere-shaped object a hand can pick up.
#[derive(Debug, Clone, PartialEq)]
pub struct GrabbableData {
    /// World-space centre.
    pub center: Point3,
    /// Collision radius.
    pub radius: f64,
    /// Layers the object belongs to.
    pub layer: LayerMask,
    owner: Option<ControllerId>,
}

impl GrabbableData {
    /// Creates a free object on the grabbable layer.
    #[must_use]
    pub fn new(center: Point3, radius: f64) -> Self {
        Self {
            center,
            radius,
            layer: LayerMask::GRABBABLE,
            owner: None,
        }
    }

    /// Moves the object to another layer set.
    #[must_use]
    pub fn with_layer(mut self, layer: LayerMask) -> Self {
        self.layer = layer;
        self
    }

    /// Controller currently holding the object, if any.
    #[must_use]
    pub fn owner(&self) -> Option<ControllerId> {
        self.owner
    }

    /// Returns `true` while no controller holds the object.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }
}

/// Arena of grabbable objects and the single-owner grab protocol.
///
/// Implements [`SpatialQuery`] by sweeping spheres against the stored objects
/// and [`GrabNotify`] by tracking which controller owns each object.
#[derive(Debug, Default)]
pub struct GrabbableStore {
    objects: SlotMap<GrabbableId, GrabbableData>,
}

impl GrabbableStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an object and returns its ID.
    pub fn add(&mut self, data: GrabbableData) -> GrabbableId {
        self.objects.insert(data)
    }

    /// Removes an object, returning its data.
    pub fn remove(&mut self, id: GrabbableId) -> Option<GrabbableData> {
        self.objects.remove(id)
    }

    /// Returns a reference to the object data.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not in the store.
    pub fn get(&self, id: GrabbableId) -> Result<&GrabbableData, GrabError> {
        self.objects.get(id).ok_or(GrabError::UnknownObject)
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates over all objects.
    pub fn iter(&self) -> impl Iterator<Item = (GrabbableId, &GrabbableData)> {
        self.objects.iter()
    }

    /// Moves a held object to `target` on behalf of its owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is unknown or `controller` does not
    /// hold it.
    pub fn steer(
        &mut self,
        id: GrabbableId,
        controller: ControllerId,
        target: Point3,
    ) -> Result<(), GrabError> {
        let object = self.objects.get_mut(id).ok_or(GrabError::UnknownObject)?;
        if object.owner != Some(controller) {
            return Err(GrabError::NotHeldBy { controller });
        }
        object.center = target;
        Ok(())
    }

    /// Repositions a free object.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is unknown or currently held.
    pub fn place(&mut self, id: GrabbableId, center: Point3) -> Result<(), GrabError> {
        let object = self.objects.get_mut(id).ok_or(GrabError::UnknownObject)?;
        if let Some(owner) = object.owner {
            return Err(GrabError::AlreadyHeld { owner });
        }
        object.center = center;
        Ok(())
    }
}

impl SpatialQuery for GrabbableStore {
    fn sphere_cast(&self, cast: &SphereCast) -> Option<GrabbableId> {
        let max = cast.max_distance.unwrap_or(f64::INFINITY);
        self.objects
            .iter()
            .filter(|(_, obj)| obj.layer.intersects(cast.layer))
            .filter_map(|(id, obj)| {
                sweep_sphere(&cast.origin, &cast.direction, cast.radius + obj.radius, &obj.center)
                    .filter(|&t| t <= max)
                    .map(|t| (id, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

impl GrabNotify for GrabbableStore {
    fn notify_grabbed(
        &mut self,
        object: GrabbableId,
        grabbed: bool,
        controller: ControllerId,
    ) -> Result<(), GrabError> {
        let data = self.objects.get_mut(object).ok_or(GrabError::UnknownObject)?;
        match (grabbed, data.owner) {
            (true, None) => {
                data.owner = Some(controller);
                Ok(())
            }
            (true, Some(owner)) if owner == controller => Ok(()),
            (true, Some(owner)) => Err(GrabError::AlreadyHeld { owner }),
            (false, Some(owner)) if owner == controller => {
                data.owner = None;
                Ok(())
            }
            (false, _) => Err(GrabError::NotHeldBy { controller }),
        }
    }
}

/// Distance along `dir` at which a point moving from `origin` first comes
/// within `reach` of `center`. Starting inside counts as a hit at `0.0`.
fn sweep_sphere(origin: &Point3, dir: &Vector3, reach: f64, center: &Point3) -> Option<f64> {
    let m = origin - center;
    let c = m.norm_squared() - reach * reach;
    if c <= 0.0 {
        return Some(0.0);
    }
    let b = m.dot(dir);
    if b >= 0.0 {
        // Outside and moving away (or not moving at all).
        return None;
    }
    let disc = b * b - dir.norm_squared() * c;
    if disc < 0.0 {
        return None;
    }
    Some((-b - disc.sqrt()) / dir.norm_squared())
}
