//! Flattens instance records into one indexed mesh.

use crate::error::{FloraError, Result};
use crate::instance::GeometryInstance;
use crate::mesh::{MergedBuffers, MeshLibrary, SizeScales};
use glam::{Vec3, Vec4};
use rand::Rng;
use tracing::{debug, instrument};

const JITTER_MIN: f32 = 0.5;
const JITTER_MAX: f32 = 0.8;
const JITTER_FACTOR: f32 = 0.6;

/// Largest f32 below 0.48, the exclusive upper end of the jitter range.
const JITTER_CEILING: f32 = f32::from_bits(0.48f32.to_bits() - 1);

/// Maps one uniform draw in `[0, 1)` onto the size jitter range `[0.3, 0.48)`.
///
/// Draws close to 1.0 would round onto the upper bound in f32, so the result is clamped
/// to stay strictly below it.
pub fn jitter_from_draw(u: f64) -> f32 {
    let u = u as f32;
    ((u * (JITTER_MAX - JITTER_MIN) + JITTER_MIN) * JITTER_FACTOR).min(JITTER_CEILING)
}

/// Concatenates the base mesh of every instance, in emission order.
///
/// One jitter value is drawn per instance, whatever its class, and applied only to
/// flowers and leaves. Indices are shifted by a running offset that grows by
/// `max index + 1` after each instance, so no instance references another's vertices.
///
/// Fails with [`UnknownMeshClass`](crate::FloraError::UnknownMeshClass) before writing
/// anything if the library lacks a class that an instance needs.
#[instrument(skip_all, fields(instances = instances.len()))]
pub fn merge<R: Rng + ?Sized>(
    instances: &[GeometryInstance],
    library: &MeshLibrary,
    sizes: &SizeScales,
    rng: &mut R,
) -> Result<MergedBuffers> {
    let (vertex_total, index_total) = instances.iter().try_fold((0, 0), |(v, i), instance| {
        let mesh = library.get(instance.class)?;
        Ok::<_, FloraError>((v + mesh.vertex_count(), i + mesh.indices().len()))
    })?;

    let mut out = MergedBuffers {
        positions: Vec::with_capacity(vertex_total * 4),
        normals: Vec::with_capacity(vertex_total * 4),
        colors: Vec::with_capacity(vertex_total * 4),
        uvs: Vec::with_capacity(vertex_total * 2),
        indices: Vec::with_capacity(index_total),
    };

    let mut offset: u32 = 0;
    for instance in instances {
        let mesh = library.get(instance.class)?;
        let jitter = jitter_from_draw(rng.random());
        let scale = if instance.class.is_jittered() {
            sizes.get(instance.class) * jitter
        } else {
            sizes.get(instance.class)
        };
        let tag = instance.class.color_tag();

        for p in mesh.positions().chunks_exact(3) {
            let local = Vec3::from_slice(p) * scale;
            let world = instance.model * local.extend(1.0);
            out.positions.extend_from_slice(&world.to_array());
            out.colors.extend_from_slice(&[tag, 0.0, 1.0, 0.0]);
        }

        for n in mesh.normals().chunks_exact(3) {
            let world = instance.normal * Vec4::new(n[0], n[1], n[2], 0.0);
            out.normals.extend_from_slice(&world.to_array());
        }

        out.uvs.extend_from_slice(mesh.uvs());

        let mut max = 0;
        for &index in mesh.indices() {
            max = max.max(index);
            out.indices.push(index + offset);
        }
        offset += max + 1;
    }

    debug!(
        vertices = out.vertex_count(),
        indices = out.index_count(),
        "merged instance buffers"
    );
    Ok(out)
}
