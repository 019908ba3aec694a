use glam::f64::DMat4;
use nalgebra::Matrix4;

/// Scene math is glam; the boolean mesh kernel speaks nalgebra. Both
/// sides are f64 column-major, so the conversion is a plain relayout.
pub fn dmat4_to_matrix4(m: DMat4) -> Matrix4<f64> {
    Matrix4::from_column_slice(&m.to_cols_array())
}
