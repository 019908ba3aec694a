use crate::csg::csg_types::CsgMesh;
use crate::csg::csg_utils::dmat4_to_matrix4;
use crate::scene::node::PrimitiveShape;
use crate::scene::transform::Transform;
use crate::zone::algebra::Operator;
use csgrs::traits::CSG;

const CYLINDER_SEGMENTS: usize = 32;
const SPHERE_SEGMENTS: usize = 16;
const SPHERE_STACKS: usize = 8;

/// Build the world-space mesh of a primitive. The shape is constructed
/// centered at its local origin and then carried through the node
/// transform. Degenerate shapes produce the empty mesh.
pub fn primitive_mesh(shape: &PrimitiveShape, transform: &Transform) -> CsgMesh {
    if shape.is_degenerate() {
        return CsgMesh::new();
    }
    let local = match *shape {
        PrimitiveShape::Box {
            width,
            height,
            depth,
        } => CsgMesh::cuboid(width, height, depth, None).center(),
        PrimitiveShape::Cylinder {
            radius,
            inner_radius,
            depth,
        } => {
            let outer = CsgMesh::cylinder(radius, depth, CYLINDER_SEGMENTS, None)
                .translate(0.0, 0.0, -depth / 2.0);
            if inner_radius > 0.0 {
                // Overshoot the bore slightly past both caps so the
                // difference leaves no coplanar end faces behind.
                let bore_depth = depth * 1.001;
                let bore = CsgMesh::cylinder(inner_radius, bore_depth, CYLINDER_SEGMENTS, None)
                    .translate(0.0, 0.0, -bore_depth / 2.0);
                outer.difference(&bore)
            } else {
                outer
            }
        }
        PrimitiveShape::Sphere { radius } => {
            CsgMesh::sphere(radius, SPHERE_SEGMENTS, SPHERE_STACKS, None)
        }
    };
    local.transform(&dmat4_to_matrix4(transform.to_matrix()))
}

/// Apply one algebra operator between the row accumulator and an object
/// mesh. Only `RightSubtraction` swaps the operand order.
pub fn apply_operator(acc: CsgMesh, op: Operator, obj: &CsgMesh) -> CsgMesh {
    match op {
        Operator::Union => acc.union(obj),
        Operator::Intersection => acc.intersection(obj),
        Operator::LeftSubtraction => acc.difference(obj),
        Operator::RightSubtraction => obj.difference(&acc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::mesh_utils::mesh_volume;
    use glam::f64::DVec3;

    #[test]
    fn box_volume_is_exact() {
        let shape = PrimitiveShape::Box {
            width: 2.0,
            height: 3.0,
            depth: 4.0,
        };
        let mesh = primitive_mesh(&shape, &Transform::identity());
        assert!((mesh_volume(&mesh) - 24.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_shape_is_empty() {
        let shape = PrimitiveShape::Sphere { radius: 0.0 };
        let mesh = primitive_mesh(&shape, &Transform::identity());
        assert!(mesh.polygons.is_empty());
    }

    #[test]
    fn transform_moves_the_mesh() {
        let shape = PrimitiveShape::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        };
        let transform = Transform::from_position(DVec3::new(10.0, 0.0, 0.0));
        let mesh = primitive_mesh(&shape, &transform);
        let bb = mesh.bounding_box();
        assert!((bb.mins.x - 9.5).abs() < 1e-9);
        assert!((bb.maxs.x - 10.5).abs() < 1e-9);
    }

    #[test]
    fn hollow_cylinder_loses_bore_volume() {
        let solid = PrimitiveShape::Cylinder {
            radius: 2.0,
            inner_radius: 0.0,
            depth: 1.0,
        };
        let hollow = PrimitiveShape::Cylinder {
            radius: 2.0,
            inner_radius: 1.0,
            depth: 1.0,
        };
        let t = Transform::identity();
        let v_solid = mesh_volume(&primitive_mesh(&solid, &t));
        let v_hollow = mesh_volume(&primitive_mesh(&hollow, &t));
        assert!(v_hollow < v_solid);
        assert!(v_hollow > 0.0);
    }

    #[test]
    fn right_subtraction_swaps_operands() {
        let big = primitive_mesh(
            &PrimitiveShape::Box {
                width: 4.0,
                height: 4.0,
                depth: 4.0,
            },
            &Transform::identity(),
        );
        let small = primitive_mesh(
            &PrimitiveShape::Box {
                width: 2.0,
                height: 2.0,
                depth: 2.0,
            },
            &Transform::identity(),
        );
        let left = apply_operator(big.clone(), Operator::LeftSubtraction, &small);
        let right = apply_operator(small, Operator::RightSubtraction, &big);
        // big - small vs big - big: the swapped form subtracts the
        // accumulator (small) from the object (big), same result here.
        assert!((mesh_volume(&left) - mesh_volume(&right)).abs() < 1e-6);
        assert!((mesh_volume(&left) - (64.0 - 8.0)).abs() < 1e-6);
    }
}
