#![allow(dead_code)]

use symbios_flora::{BaseMesh, MeshClass, MeshLibrary};

#[path = "../../src/test_support.rs"]
mod test_support;

pub(crate) use test_support::ConstRng;

/// A unit quad in the XY plane: 4 vertices, 2 triangles.
pub fn quad(class: MeshClass) -> BaseMesh {
    BaseMesh::new(
        class,
        vec![
            -0.5, 0.0, 0.0, //
            0.5, 0.0, 0.0, //
            0.5, 1.0, 0.0, //
            -0.5, 1.0, 0.0,
        ],
        vec![
            0.0, 0.0, 1.0, //
            0.0, 0.0, 1.0, //
            0.0, 0.0, 1.0, //
            0.0, 0.0, 1.0,
        ],
        vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0],
        vec![0, 1, 2, 0, 2, 3],
    )
    .unwrap()
}

pub fn quad_library() -> MeshLibrary {
    MeshLibrary::with_meshes(
        quad(MeshClass::Branch),
        quad(MeshClass::Flower),
        quad(MeshClass::Leaf),
    )
}
