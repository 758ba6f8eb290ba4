//! Render assembly: turns a painting into a [`DisplayList`].
//!
//! Idle paintings draw their authored static list under the painting
//! transform. Rippling paintings regenerate the ripple mesh, then stream it
//! region by region: each region loads its image, uploads its triangles in
//! batches of [`TRIS_PER_GROUP`], and draws any remainder one triangle at a
//! time. The decay step runs after the regions, so this frame shows the
//! ripple as it was before decaying.

use glam::{Mat4, Vec3};
use log::trace;

use crate::commands::{BuiltinList, Command, DisplayList, ListRef, TexelFormat};
use crate::context::RippleContext;
use crate::deform::{generate_mesh, RippleVertex};
use crate::mesh::MeshTables;
use crate::normals::reconstruct_normals;
use crate::painting::{Painting, RippleState};
use crate::textures::{TextureKind, TextureMap};
use crate::trigger::update_ripple_state;
use crate::vertex::{PaintingVertex, TRIS_PER_GROUP};
use crate::PAINTING_SIZE;

/// The painting transform: translate, pitch, yaw, then scale the unit mesh
/// up to the painting's size.
pub fn painting_transform(painting: &Painting) -> [Command; 4] {
    let [pitch, yaw] = painting.rotation;
    [
        Command::Matrix { matrix: Mat4::from_translation(painting.position), push: true },
        Command::Matrix { matrix: Mat4::from_rotation_x(pitch.to_radians()), push: false },
        Command::Matrix { matrix: Mat4::from_rotation_y(yaw.to_radians()), push: false },
        Command::Matrix {
            matrix: Mat4::from_scale(Vec3::splat(painting.size / PAINTING_SIZE)),
            push: false,
        },
    ]
}

fn push_transform(list: &mut DisplayList, painting: &Painting) {
    for command in painting_transform(painting) {
        list.push(command);
    }
}

/// The idle painting: transform and the authored static list.
pub fn display_static(painting: &Painting) -> DisplayList {
    let mut list = DisplayList::new();
    push_transform(&mut list, painting);
    list.call(ListRef::Authored(painting.normal_list.clone()));
    list.push(Command::PopMatrix);
    list.end();
    list
}

/// Stream one texture region of the ripple mesh into `list`.
pub fn render_region(
    list: &mut DisplayList,
    painting: &Painting,
    verts: &[RippleVertex],
    map: &TextureMap,
    image: usize,
) {
    if let Some(texture) = painting.textures.get(image) {
        list.push(Command::LoadBlockTexture {
            image,
            width: texture.width,
            height: texture.height,
            format: TexelFormat::Rgba16,
        });
    }

    // triangles naming a mapping or vertex this mesh lacks are skipped
    let vertex_for = |mapping: u16| {
        let mapping = map.mappings.get(mapping as usize)?;
        let vertex = verts.get(mapping.mesh_vertex as usize)?;
        Some(PaintingVertex::new(vertex, mapping, painting.alpha))
    };
    let triangles: Vec<[PaintingVertex; 3]> = map
        .triangles
        .iter()
        .filter_map(|&[m0, m1, m2]| Some([vertex_for(m0)?, vertex_for(m1)?, vertex_for(m2)?]))
        .collect();

    let mut groups = triangles.chunks_exact(TRIS_PER_GROUP);
    for group in groups.by_ref() {
        let vertices = group.iter().flatten().copied().collect();
        list.push(Command::Vertices { start: 0, vertices });
        list.call_builtin(BuiltinList::DrawRipples);
    }

    let remainder = groups.remainder();
    if remainder.is_empty() {
        return;
    }
    let vertices = remainder.iter().flatten().copied().collect();
    list.push(Command::Vertices { start: 0, vertices });
    for k in 0..remainder.len() as u8 {
        list.push(Command::Triangle([3 * k, 3 * k + 1, 3 * k + 2]));
    }
}

/// The rippling painting. Also runs the decay step.
pub fn display_rippling(painting: &mut Painting, tables: &MeshTables, ctx: &mut RippleContext) -> DisplayList {
    let mut verts = generate_mesh(painting, &tables.mesh);
    reconstruct_normals(&tables.mesh, &tables.neighbors, &mut verts);

    let (begin, end, regions) = match painting.texture_kind {
        TextureKind::Image => (BuiltinList::RipplingBegin, BuiltinList::RipplingEnd, painting.texture_maps.len()),
        TextureKind::EnvMap => (BuiltinList::EnvMappedBegin, BuiltinList::EnvMappedEnd, 1),
    };

    let mut list = DisplayList::new();
    push_transform(&mut list, painting);
    list.call_builtin(begin);
    list.call(ListRef::Authored(painting.ripple_list.clone()));

    for (image, map) in painting.texture_maps.iter().enumerate().take(regions) {
        render_region(&mut list, painting, &verts, map, image);
    }

    update_ripple_state(painting, ctx);

    list.push(Command::PopMatrix);
    list.call_builtin(end);
    list.end();

    trace!(
        "painting {} rippling: {} commands, {} triangles",
        painting.id,
        list.len(),
        list.triangle_count()
    );
    list
}

/// Draw `painting` on whichever path its state selects.
pub fn display_painting(painting: &mut Painting, tables: &MeshTables, ctx: &mut RippleContext) -> DisplayList {
    match painting.state {
        RippleState::Idle => display_static(painting),
        RippleState::Ripple | RippleState::Entered => display_rippling(painting, tables, ctx),
    }
}
