use crate::csg::csg_types::CsgMesh;
use csgrs::traits::CSG;
use std::fmt;
use std::rc::Rc;

/// Signed volume of a closed mesh via the divergence theorem: each face
/// is fan-triangulated and contributes one sixth of the scalar triple
/// product per triangle. The absolute value makes the result independent
/// of global winding.
pub fn mesh_volume(mesh: &CsgMesh) -> f64 {
    let mut total = 0.0;
    for polygon in &mesh.polygons {
        let verts = &polygon.vertices;
        if verts.len() < 3 {
            continue;
        }
        let a = verts[0].pos.coords;
        for pair in verts[1..].windows(2) {
            let b = pair[0].pos.coords;
            let c = pair[1].pos.coords;
            total += a.dot(&b.cross(&c));
        }
    }
    (total / 6.0).abs()
}

/// Result of evaluating a zone's boolean algebra. Shared by handle so a
/// cached value and its consumers see the same mesh; `ptr_eq` lets
/// callers check that a recompute was served from cache.
#[derive(Clone)]
pub struct DerivedSolid {
    mesh: Rc<CsgMesh>,
}

impl DerivedSolid {
    pub fn empty() -> Self {
        Self {
            mesh: Rc::new(CsgMesh::new()),
        }
    }

    pub fn from_mesh(mesh: CsgMesh) -> Self {
        Self {
            mesh: Rc::new(mesh),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.polygons.is_empty()
    }

    pub fn volume(&self) -> f64 {
        mesh_volume(&self.mesh)
    }

    pub fn mesh(&self) -> &CsgMesh {
        &self.mesh
    }

    pub fn ptr_eq(&self, other: &DerivedSolid) -> bool {
        Rc::ptr_eq(&self.mesh, &other.mesh)
    }
}

impl fmt::Debug for DerivedSolid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedSolid")
            .field("polygons", &self.mesh.polygons.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_solid_has_zero_volume() {
        let solid = DerivedSolid::empty();
        assert!(solid.is_empty());
        assert_eq!(solid.volume(), 0.0);
    }

    #[test]
    fn unit_cube_volume() {
        let mesh = CsgMesh::cuboid(1.0, 1.0, 1.0, None);
        assert!((mesh_volume(&mesh) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clones_share_the_mesh() {
        let solid = DerivedSolid::from_mesh(CsgMesh::cuboid(1.0, 1.0, 1.0, None));
        let copy = solid.clone();
        assert!(solid.ptr_eq(&copy));
        assert!(!solid.ptr_eq(&DerivedSolid::empty()));
    }
}
