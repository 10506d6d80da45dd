//! Row-major 3x3 helpers used by the homography solver.

/// Row-major 3x3 matrix.
pub type Mat33 = [[f64; 3]; 3];

/// Compute the determinant of a 3x3 matrix.
#[rustfmt::skip]
pub fn det_mat33(m: &Mat33) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]) -
    m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]) +
    m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Compute the adjugate (transposed cofactor matrix) of a 3x3 matrix.
#[rustfmt::skip]
pub fn adjugate_mat33(m: &Mat33) -> Mat33 {
    [
        [
            m[1][1] * m[2][2] - m[1][2] * m[2][1],
            m[0][2] * m[2][1] - m[0][1] * m[2][2],
            m[0][1] * m[1][2] - m[0][2] * m[1][1],
        ],
        [
            m[1][2] * m[2][0] - m[1][0] * m[2][2],
            m[0][0] * m[2][2] - m[0][2] * m[2][0],
            m[0][2] * m[1][0] - m[0][0] * m[1][2],
        ],
        [
            m[1][0] * m[2][1] - m[1][1] * m[2][0],
            m[0][1] * m[2][0] - m[0][0] * m[2][1],
            m[0][0] * m[1][1] - m[0][1] * m[1][0],
        ],
    ]
}

/// Multiply two 3x3 matrices.
pub fn mul_mat33(a: &Mat33, b: &Mat33) -> Mat33 {
    let mut c = [[0.0; 3]; 3];
    for (i, row) in c.iter_mut().enumerate() {
        for (j, cij) in row.iter_mut().enumerate() {
            *cij = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    c
}

/// Multiply a 3x3 matrix by a column vector.
pub fn mat33_mul_vec3(m: &Mat33, v: &[f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Largest absolute entry of the matrix.
pub fn max_abs_mat33(m: &Mat33) -> f64 {
    m.iter().flatten().fold(0.0f64, |acc, v| acc.max(v.abs()))
}
