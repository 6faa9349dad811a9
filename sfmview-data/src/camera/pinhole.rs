//! Pinhole camera model and projection matrix decomposition.

use glam::{DMat3, DVec2, DVec3};

/// A 3×4 projection matrix `P = [M | p]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Left 3×3 block.
    pub left: DMat3,
    /// Last column.
    pub last: DVec3,
}

impl Projection {
    /// Build from 12 values in column-major order (values 0-2 are column 0,
    /// 9-11 are column 3).
    pub fn from_column_major(values: &[f64; 12]) -> Self {
        let col = |c: usize| DVec3::new(values[3 * c], values[3 * c + 1], values[3 * c + 2]);
        Self {
            left: DMat3::from_cols(col(0), col(1), col(2)),
            last: col(3),
        }
    }

    /// The 12 values in column-major order.
    pub fn to_column_major(&self) -> [f64; 12] {
        let mut values = [0.0; 12];
        values[..9].copy_from_slice(&self.left.to_cols_array());
        values[9..].copy_from_slice(&self.last.to_array());
        values
    }

    /// Apply to a homogeneous world point `(x, y, z, 1)`.
    pub fn apply(&self, point: DVec3) -> DVec3 {
        self.left * point + self.last
    }
}

/// Intrinsics `K`, rotation `R` and translation `t` of a pinhole camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinholeCamera {
    /// Upper-triangular intrinsic matrix with `K[2][2] == 1`.
    pub k: DMat3,
    /// World-to-camera rotation.
    pub r: DMat3,
    /// World-to-camera translation.
    pub t: DVec3,
    /// Camera center in world coordinates.
    pub center: DVec3,
    /// `K [R | t]`.
    pub projection: Projection,
}

impl PinholeCamera {
    /// Build a camera from `K`, `R` and `t`, deriving its center and projection.
    pub fn new(k: DMat3, r: DMat3, t: DVec3) -> Self {
        Self {
            k,
            r,
            t,
            center: -(r.transpose() * t),
            projection: Projection {
                left: k * r,
                last: k * t,
            },
        }
    }

    /// Decompose a projection matrix. Returns `None` when it is degenerate.
    pub fn from_projection(projection: &Projection) -> Option<Self> {
        let (k, r, t) = krt_from_projection(projection)?;
        Some(Self::new(k, r, t))
    }

    /// Horizontal focal length in pixels.
    pub fn focal(&self) -> f64 {
        at(&self.k, 0, 0)
    }

    /// Principal point `(K[0][2], K[1][2])` in pixels.
    pub fn principal_point(&self) -> DVec2 {
        DVec2::new(at(&self.k, 0, 2), at(&self.k, 1, 2))
    }

    /// Project a world point to pixel coordinates.
    pub fn project(&self, point: DVec3) -> DVec2 {
        let h = self.projection.apply(point);
        DVec2::new(h.x / h.z, h.y / h.z)
    }

    /// Depth of a world point along the optical axis.
    pub fn depth(&self, point: DVec3) -> f64 {
        (self.r * point + self.t).z
    }

    /// Reprojection error of `point` against an observed pixel.
    pub fn residual(&self, point: DVec3, observed: DVec2) -> f64 {
        (self.project(point) - observed).length()
    }
}

#[inline]
fn at(m: &DMat3, row: usize, col: usize) -> f64 {
    m.col(col)[row]
}

fn from_rows(r0: [f64; 3], r1: [f64; 3], r2: [f64; 3]) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(r0[0], r1[0], r2[0]),
        DVec3::new(r0[1], r1[1], r2[1]),
        DVec3::new(r0[2], r1[2], r2[2]),
    )
}

fn givens(c: f64, s: f64) -> (f64, f64) {
    let l = c.hypot(s);
    (c / l, s / l)
}

/// Smallest accepted `|det M|` relative to the product of its column norms.
const SINGULAR_RATIO: f64 = 1e-12;

/// Split `P` into `(K, R, t)` with `P ~ K [R | t]`.
///
/// RQ decomposition of the left block by Givens rotations (Hartley &
/// Zisserman, A4.1.1), then normalized so that the diagonal of `K` is
/// positive, `K[2][2] == 1` and `det(R) == +1`. Returns `None` for a
/// non-finite or (numerically) singular left block.
pub fn krt_from_projection(projection: &Projection) -> Option<(DMat3, DMat3, DVec3)> {
    let m = projection.left;
    if !m.is_finite() || !projection.last.is_finite() {
        return None;
    }
    // |det M| is bounded by the product of the column norms; a tiny ratio
    // means the block is numerically rank deficient.
    let det = m.determinant();
    let bound = m.x_axis.length() * m.y_axis.length() * m.z_axis.length();
    if !det.is_finite() || !(det.abs() > bound * SINGULAR_RATIO) {
        return None;
    }

    let mut k = m;
    let mut q = DMat3::IDENTITY;

    // Zero K(2,1).
    if at(&k, 2, 1) != 0.0 {
        let (c, s) = givens(-at(&k, 2, 2), at(&k, 2, 1));
        let qx = from_rows([1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]);
        k = k * qx;
        q = qx.transpose() * q;
    }
    // Zero K(2,0).
    if at(&k, 2, 0) != 0.0 {
        let (c, s) = givens(at(&k, 2, 2), at(&k, 2, 0));
        let qy = from_rows([c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]);
        k = k * qy;
        q = qy.transpose() * q;
    }
    // Zero K(1,0).
    if at(&k, 1, 0) != 0.0 {
        let (c, s) = givens(-at(&k, 1, 1), at(&k, 1, 0));
        let qz = from_rows([c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]);
        k = k * qz;
        q = qz.transpose() * q;
    }

    let mut r = q;

    if at(&k, 2, 2) < 0.0 {
        k = k * -1.0;
        r = r * -1.0;
    }
    if at(&k, 1, 1) < 0.0 {
        let s = DMat3::from_diagonal(DVec3::new(1.0, -1.0, 1.0));
        k = k * s;
        r = s * r;
    }
    if at(&k, 0, 0) < 0.0 {
        let s = DMat3::from_diagonal(DVec3::new(-1.0, 1.0, 1.0));
        k = k * s;
        r = s * r;
    }

    let mut t = k.inverse() * projection.last;
    k = k * (1.0 / at(&k, 2, 2));

    // P is only defined up to scale, so (-R, -t) describes the same camera.
    if r.determinant() < 0.0 {
        r = r * -1.0;
        t = -t;
    }

    if !(k.is_finite() && r.is_finite() && t.is_finite()) {
        return None;
    }
    Some((k, r, t))
}
