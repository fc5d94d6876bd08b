use glam::{Vec2, Vec3};
use log::debug;

use super::{ExtentReader, skip_unknown, write_extent};
use crate::block::{Item, whole_number};
use crate::error::{MdlError, Result};
use crate::geometry::{Extent, vec2, vec3};
use crate::writer::{MdlWriter, format_int_list, format_vector};

/// A skinned vertex
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// Texture coordinate exactly as stored in the file
    pub uv: Vec2,
    /// Index into the geoset's matrix groups
    pub group: usize,
}

/// A mesh partition sharing one material
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geoset {
    pub vertices: Vec<Vertex>,
    /// Vertex indices, three per triangle
    pub triangles: Vec<u32>,
    /// Each group lists node indices whose transforms are averaged
    pub matrix_groups: Vec<Vec<usize>>,
    /// Index into the document's materials
    pub material: usize,
    pub extent: Extent,
    /// One extent per sequence, in sequence order
    pub sequence_extents: Vec<Extent>,
    pub selection_group: u32,
    pub unselectable: bool,
}

impl Geoset {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Extent of the vertex positions
    pub fn compute_extent(&self) -> Extent {
        Extent::from_points(self.vertices.iter().map(|v| &v.position))
    }

    /// Nodes referenced by any matrix group
    pub fn referenced_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.matrix_groups.iter().flatten().copied()
    }

    /// Decode a `Geoset { ... }` block. Matrix group entries are left as the
    /// object ids found in the file.
    pub fn parse(item: &Item) -> Result<Self> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Option<Vec<[f32; 3]>> = None;
        let mut uvs: Option<Vec<[f32; 2]>> = None;
        let mut groups: Option<(Vec<f64>, &Item)> = None;
        let mut geoset = Self::default();
        let mut extent = ExtentReader::default();

        for child in item.children()? {
            if extent.read(child)? {
                continue;
            }
            match child.keyword() {
                Some("Vertices") => positions = counted_vectors::<3>(child)?,
                Some("Normals") => normals = Some(counted_vectors::<3>(child)?),
                Some("TVertices") => uvs = Some(counted_vectors::<2>(child)?),
                Some("VertexGroup") => groups = Some((child.flat_numbers()?, child)),
                Some("Faces") => geoset.triangles = parse_faces(child)?,
                Some("Groups") => geoset.matrix_groups = parse_groups(child)?,
                Some("Anim") => {
                    let mut anim_extent = ExtentReader::default();
                    for entry in child.children()? {
                        if !anim_extent.read(entry)? {
                            skip_unknown("Geoset Anim", entry);
                        }
                    }
                    geoset
                        .sequence_extents
                        .push(anim_extent.finish().unwrap_or_default());
                }
                Some("MaterialID") => geoset.material = child.arg_usize(0)?,
                Some("SelectionGroup") => geoset.selection_group = child.arg_u32(0)?,
                Some("Unselectable") => geoset.unselectable = true,
                _ => skip_unknown("Geoset", child),
            }
        }

        let count = positions.len();
        let normals = normals.unwrap_or_else(|| vec![[0.0; 3]; count]);
        let uvs = uvs.unwrap_or_else(|| vec![[0.0; 2]; count]);
        let groups = match groups {
            Some((values, at)) => {
                if values.len() != count {
                    return Err(MdlError::count_mismatch(at.pos, "VertexGroup", count, values.len()));
                }
                values
                    .into_iter()
                    .map(|g| whole_number(at.pos, "VertexGroup", g).map(|g| g as usize))
                    .collect::<Result<Vec<_>>>()?
            }
            None => vec![0; count],
        };
        for (name, len) in [("Normals", normals.len()), ("TVertices", uvs.len())] {
            if len != count {
                return Err(MdlError::count_mismatch(item.pos, name, count, len));
            }
        }

        geoset.vertices = positions
            .into_iter()
            .zip(normals)
            .zip(uvs)
            .zip(groups)
            .map(|(((p, n), uv), group)| Vertex {
                position: vec3(p),
                normal: vec3(n),
                uv: vec2(uv),
                group,
            })
            .collect();

        geoset.extent = match extent.finish() {
            Some(e) => e,
            None => geoset.compute_extent(),
        };

        debug!(
            "Geoset: {} vertices, {} triangles, {} matrix groups, material {}",
            geoset.vertices.len(),
            geoset.triangle_count(),
            geoset.matrix_groups.len(),
            geoset.material
        );
        Ok(geoset)
    }

    /// Encode with matrix group entries mapped through `object_ids`
    /// (node index to object id).
    pub fn write(&self, w: &mut MdlWriter, sequence_count: usize, object_ids: &[usize]) {
        let count = self.vertices.len();
        w.open("Geoset");

        w.open(format!("Vertices {count}"));
        for v in &self.vertices {
            w.field(format_vector(&v.position.to_array()));
        }
        w.close();

        w.open(format!("Normals {count}"));
        for v in &self.vertices {
            w.field(format_vector(&v.normal.to_array()));
        }
        w.close();

        w.open(format!("TVertices {count}"));
        for v in &self.vertices {
            w.field(format_vector(&v.uv.to_array()));
        }
        w.close();

        w.open("VertexGroup");
        for v in &self.vertices {
            w.field(v.group.to_string());
        }
        w.close();

        w.open(format!("Faces 1 {}", self.triangles.len()));
        w.open("Triangles");
        w.field(format_int_list(&self.triangles));
        w.close();
        w.close();

        let total: usize = self.matrix_groups.iter().map(Vec::len).sum();
        w.open(format!("Groups {} {}", self.matrix_groups.len(), total));
        for group in &self.matrix_groups {
            let ids: Vec<usize> = group
                .iter()
                .map(|&node| object_ids.get(node).copied().unwrap_or(node))
                .collect();
            w.keyed("Matrices", format_int_list(&ids));
        }
        w.close();

        write_extent(w, &self.extent);
        for index in 0..sequence_count {
            let extent = if self.sequence_extents.len() == sequence_count {
                &self.sequence_extents[index]
            } else {
                &self.extent
            };
            w.open("Anim");
            write_extent(w, extent);
            w.close();
        }

        w.int("MaterialID", self.material);
        w.int("SelectionGroup", self.selection_group);
        w.flag("Unselectable", self.unselectable);
        w.close();
    }
}

/// `Keyword N { {..}, {..} }` with the count checked
fn counted_vectors<const N: usize>(item: &Item) -> Result<Vec<[f32; N]>> {
    let declared = item.arg_usize(0)?;
    let vectors = item.vector_children::<N>()?;
    if vectors.len() != declared {
        return Err(MdlError::count_mismatch(
            item.pos,
            item.label(),
            declared,
            vectors.len(),
        ));
    }
    Ok(vectors)
}

/// `Faces <groups> <indices> { Triangles { {i, j, k, ...} } }`
fn parse_faces(item: &Item) -> Result<Vec<u32>> {
    let declared = item.arg_usize(1)?;
    let mut indices = Vec::with_capacity(declared);
    for child in item.children_or_empty() {
        if !child.is("Triangles") {
            skip_unknown("Faces", child);
            continue;
        }
        for index in child.flat_numbers()? {
            indices.push(whole_number(child.pos, "Triangles", index)?);
        }
    }
    if indices.len() != declared {
        return Err(MdlError::count_mismatch(
            item.pos,
            "Faces",
            declared,
            indices.len(),
        ));
    }
    Ok(indices)
}

/// `Groups <groups> <entries> { Matrices { a, b }, ... }`
fn parse_groups(item: &Item) -> Result<Vec<Vec<usize>>> {
    let total = item.arg_usize(1)?;
    let mut groups = Vec::new();
    for matrices in item.declared_children("Matrices")? {
        let group = matrices
            .flat_numbers()?
            .into_iter()
            .map(|id| whole_number(matrices.pos, "Matrices", id).map(|id| id as usize))
            .collect::<Result<Vec<_>>>()?;
        groups.push(group);
    }
    let found: usize = groups.iter().map(Vec::len).sum();
    if found != total {
        return Err(MdlError::count_mismatch(item.pos, "Groups entries", total, found));
    }
    Ok(groups)
}
