/// Concrete mesh type used for all boolean solid work. No per-face
/// metadata is carried; zones only need the resulting geometry.
pub type CsgMesh = csgrs::mesh::Mesh<()>;
