use glam::{Mat3, Mat4};
use serde::{Deserialize, Serialize};

/// The kind of base geometry an instance refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeshClass {
    Branch,
    Flower,
    Leaf,
}

impl MeshClass {
    pub const ALL: [MeshClass; 3] = [MeshClass::Branch, MeshClass::Flower, MeshClass::Leaf];

    /// The tag written into the first channel of the color buffer.
    ///
    /// This is a class encoding for the shader, not an RGBA value.
    pub fn color_tag(self) -> f32 {
        match self {
            Self::Branch => 1.0,
            Self::Flower => 2.0,
            Self::Leaf => 3.0,
        }
    }

    /// Whether instances of this class get a random per-instance size factor.
    pub fn is_jittered(self) -> bool {
        matches!(self, Self::Flower | Self::Leaf)
    }
}

/// A placement of one base mesh, captured when the turtle emitted it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryInstance {
    pub class: MeshClass,
    /// Local to world placement.
    pub model: Mat4,
    /// Inverse-transpose of the model's upper-left 3x3, embedded in a 4x4 with no
    /// translation. Applied to normals with `w = 0`.
    pub normal: Mat4,
}

impl GeometryInstance {
    pub fn new(class: MeshClass, model: Mat4) -> Self {
        let normal = Mat3::from_mat4(model).inverse().transpose();
        Self {
            class,
            model,
            normal: Mat4::from_mat3(normal),
        }
    }
}

/// Per-class instance tally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub branches: usize,
    pub flowers: usize,
    pub leaves: usize,
}

impl InstanceSummary {
    pub fn from_instances(instances: &[GeometryInstance]) -> Self {
        instances
            .iter()
            .fold(Self::default(), |mut summary, instance| {
                match instance.class {
                    MeshClass::Branch => summary.branches += 1,
                    MeshClass::Flower => summary.flowers += 1,
                    MeshClass::Leaf => summary.leaves += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.branches + self.flowers + self.leaves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    #[test]
    fn normal_matrix_of_rigid_transform_is_its_rotation() {
        let model = Mat4::from_rotation_z(0.7) * Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let instance = GeometryInstance::new(MeshClass::Leaf, model);
        let n = instance.normal * Vec4::new(1.0, 0.0, 0.0, 0.0);
        let expected = Mat4::from_rotation_z(0.7) * Vec4::X;
        assert!(n.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn normal_matrix_corrects_anisotropic_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let instance = GeometryInstance::new(MeshClass::Branch, model);
        // Scaling positions by 2 in X scales normals by 1/2 in X.
        let n = instance.normal * Vec4::new(1.0, 1.0, 0.0, 0.0);
        assert!(n.abs_diff_eq(Vec4::new(0.5, 1.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn summary_counts_each_class() {
        let instances = [
            GeometryInstance::new(MeshClass::Branch, Mat4::IDENTITY),
            GeometryInstance::new(MeshClass::Leaf, Mat4::IDENTITY),
            GeometryInstance::new(MeshClass::Branch, Mat4::IDENTITY),
        ];
        let summary = InstanceSummary::from_instances(&instances);
        assert_eq!(summary.branches, 2);
        assert_eq!(summary.leaves, 1);
        assert_eq!(summary.flowers, 0);
        assert_eq!(summary.total(), 3);
    }
}
