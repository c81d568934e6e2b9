//! Base mesh input and merged buffer output.

use crate::error::{FloraError, Result};
use crate::instance::MeshClass;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One read-only base mesh as handed over by a model loader.
///
/// Positions and normals have stride 3, UVs stride 2, indices form a triangle list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseMesh {
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
}

impl BaseMesh {
    /// Validates and wraps flat loader arrays.
    ///
    /// Besides the stride checks, the highest index must reference the last vertex: the
    /// merger advances its index offset by `max index + 1`, which then equals the vertex
    /// count of the mesh.
    pub fn new(
        class: MeshClass,
        positions: Vec<f32>,
        normals: Vec<f32>,
        uvs: Vec<f32>,
        indices: Vec<u32>,
    ) -> Result<Self> {
        let invalid = |reason: String| FloraError::InvalidMesh { class, reason };

        if positions.is_empty() || positions.len() % 3 != 0 {
            return Err(invalid(format!(
                "position array length {} is not a positive multiple of 3",
                positions.len()
            )));
        }
        let vertex_count = positions.len() / 3;
        if normals.len() != positions.len() {
            return Err(invalid(format!(
                "expected {} normal components, got {}",
                positions.len(),
                normals.len()
            )));
        }
        if uvs.len() != vertex_count * 2 {
            return Err(invalid(format!(
                "expected {} uv components, got {}",
                vertex_count * 2,
                uvs.len()
            )));
        }
        if indices.is_empty() || indices.len() % 3 != 0 {
            return Err(invalid(format!(
                "index array length {} is not a positive multiple of 3",
                indices.len()
            )));
        }
        let max_index = indices.iter().copied().max().unwrap_or(0) as usize;
        if max_index + 1 != vertex_count {
            return Err(invalid(format!(
                "highest index {max_index} does not address the last of {vertex_count} vertices"
            )));
        }

        Ok(Self {
            positions,
            normals,
            uvs,
            indices,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

/// The base meshes available to the instancer, one per [`MeshClass`].
#[derive(Clone, Debug, Default)]
pub struct MeshLibrary {
    meshes: HashMap<MeshClass, BaseMesh>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a complete library from the three loader meshes.
    pub fn with_meshes(branch: BaseMesh, flower: BaseMesh, leaf: BaseMesh) -> Self {
        let mut library = Self::new();
        library.insert(MeshClass::Branch, branch);
        library.insert(MeshClass::Flower, flower);
        library.insert(MeshClass::Leaf, leaf);
        library
    }

    /// Registers `mesh` for `class`, returning the mesh it replaces.
    pub fn insert(&mut self, class: MeshClass, mesh: BaseMesh) -> Option<BaseMesh> {
        self.meshes.insert(class, mesh)
    }

    pub fn get(&self, class: MeshClass) -> Result<&BaseMesh> {
        self.meshes
            .get(&class)
            .ok_or(FloraError::UnknownMeshClass(class))
    }
}

/// Per-class size scalars.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeScales {
    pub branch: f32,
    pub flower: f32,
    pub leaf: f32,
}

impl Default for SizeScales {
    fn default() -> Self {
        Self {
            branch: 1.0,
            flower: 1.0,
            leaf: 1.0,
        }
    }
}

impl SizeScales {
    pub fn get(&self, class: MeshClass) -> f32 {
        match class {
            MeshClass::Branch => self.branch,
            MeshClass::Flower => self.flower,
            MeshClass::Leaf => self.leaf,
        }
    }

    /// Every scalar must be finite and not negative.
    pub fn validate(&self) -> Result<()> {
        for class in MeshClass::ALL {
            let size = self.get(class);
            if !size.is_finite() || size < 0.0 {
                return Err(FloraError::InvalidConfig(format!(
                    "{class:?} size must be a finite, non-negative number, got {size}"
                )));
            }
        }
        Ok(())
    }
}

/// All instances concatenated into one indexed triangle mesh, ready for upload.
///
/// Positions, normals and colors have stride 4, UVs stride 2.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedBuffers {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    /// `[class tag, 0, 1, 0]` per vertex. See [`MeshClass::color_tag`].
    pub colors: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MergedBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_parts() -> (Vec<f32>, Vec<f32>, Vec<f32>, Vec<u32>) {
        (
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn accepts_well_formed_mesh() {
        let (p, n, uv, i) = triangle_parts();
        let mesh = BaseMesh::new(MeshClass::Leaf, p, n, uv, i).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn rejects_bad_strides() {
        let (p, n, uv, i) = triangle_parts();
        let err = BaseMesh::new(MeshClass::Leaf, p[..8].to_vec(), n, uv, i).unwrap_err();
        assert!(matches!(
            err,
            FloraError::InvalidMesh {
                class: MeshClass::Leaf,
                ..
            }
        ));

        let (p, n, uv, i) = triangle_parts();
        assert!(BaseMesh::new(MeshClass::Branch, p, n, uv[..4].to_vec(), i).is_err());
    }

    #[test]
    fn rejects_out_of_range_and_unreferenced_tail() {
        let (p, n, uv, _) = triangle_parts();
        assert!(BaseMesh::new(MeshClass::Flower, p.clone(), n.clone(), uv.clone(), vec![0, 1, 3]).is_err());
        assert!(BaseMesh::new(MeshClass::Flower, p, n, uv, vec![0, 1, 1]).is_err());
    }

    #[test]
    fn missing_class_is_reported() {
        let library = MeshLibrary::new();
        assert_eq!(
            library.get(MeshClass::Flower).unwrap_err(),
            FloraError::UnknownMeshClass(MeshClass::Flower)
        );
    }

    #[test]
    fn negative_size_is_rejected() {
        let sizes = SizeScales {
            leaf: -1.0,
            ..Default::default()
        };
        assert!(sizes.validate().is_err());
        assert!(SizeScales::default().validate().is_ok());
    }
}
