//! Node transformation data as it is laid out in packed node records.
//!
//! Only the decomposed translation/rotation/scale form is carried. A node
//! that was authored with a matrix keeps the identity transform.

use cgmath::{One, Zero};

use crate::data_structures::scene::Node;

/// Per-node translation, rotation (as quaternion) and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    pub translation: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl NodeTransform {
    /// Identity transformation: no move, rotate or scale.
    pub fn new() -> Self {
        Self {
            translation: cgmath::Vector3::zero(),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /**
     * Fills every component the node leaves unset with the interchange
     * format's default: translation (0, 0, 0), rotation (0, 0, 0, 1) and
     * scale (1, 1, 1).
     */
    pub fn from_node(node: &Node) -> Self {
        let mut transform = Self::new();
        if let Some(translation) = node.translation {
            transform.translation = translation.into();
        }
        if let Some([x, y, z, w]) = node.rotation {
            transform.rotation = cgmath::Quaternion::new(w, x, y, z);
        }
        if let Some(scale) = node.scale {
            transform.scale = scale.into();
        }
        transform
    }

    /// Rotation in the wire order x, y, z, w.
    pub fn rotation_xyzw(&self) -> [f32; 4] {
        [
            self.rotation.v.x,
            self.rotation.v.y,
            self.rotation.v.z,
            self.rotation.s,
        ]
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::new()
    }
}
