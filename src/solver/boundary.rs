use crate::state::Field;

/// Field type for boundary condition dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Density, pressure, divergence: mirrored at every wall.
    Scalar,
    /// Horizontal velocity: reflected at the left/right walls.
    Vx,
    /// Vertical velocity: reflected at the top/bottom walls.
    Vy,
}

/// Closed-box free-slip walls.
///
/// Each ghost cell copies its interior neighbour; the velocity component
/// normal to the wall is negated so no flux crosses it. Left/right columns
/// are written first, then top/bottom rows. Both passes span interior
/// rows/columns only, so corner ghost cells are left untouched.
pub fn set_bnd(field_type: FieldType, x: &mut Field) {
    let w = x.width();
    let h = x.height();
    let flip_x = if field_type == FieldType::Vx { -1.0 } else { 1.0 };
    let flip_y = if field_type == FieldType::Vy { -1.0 } else { 1.0 };

    for j in 1..=h {
        x[(0, j)] = flip_x * x[(1, j)];
        x[(w + 1, j)] = flip_x * x[(w, j)];
    }
    for i in 1..=w {
        x[(i, 0)] = flip_y * x[(i, 1)];
        x[(i, h + 1)] = flip_y * x[(i, h)];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: usize = 5;
    const H: usize = 4;

    fn ramp() -> Field {
        let mut f = Field::new(W, H);
        for j in 1..=H {
            for i in 1..=W {
                f[(i, j)] = (i * 10 + j) as f64;
            }
        }
        f
    }

    #[test]
    fn test_scalar_copies_neighbor() {
        let mut f = ramp();
        set_bnd(FieldType::Scalar, &mut f);
        for j in 1..=H {
            assert_eq!(f[(0, j)], f[(1, j)], "left wall should copy at row {}", j);
            assert_eq!(f[(W + 1, j)], f[(W, j)], "right wall should copy at row {}", j);
        }
        for i in 1..=W {
            assert_eq!(f[(i, 0)], f[(i, 1)], "bottom wall should copy at col {}", i);
            assert_eq!(f[(i, H + 1)], f[(i, H)], "top wall should copy at col {}", i);
        }
    }

    #[test]
    fn test_vx_reflects_on_vertical_walls() {
        let mut f = ramp();
        set_bnd(FieldType::Vx, &mut f);
        for j in 1..=H {
            assert_eq!(f[(0, j)], -f[(1, j)], "vx should negate at left wall, row {}", j);
            assert_eq!(f[(W + 1, j)], -f[(W, j)], "vx should negate at right wall, row {}", j);
        }
        for i in 1..=W {
            assert_eq!(f[(i, 0)], f[(i, 1)], "vx is tangential at bottom wall");
            assert_eq!(f[(i, H + 1)], f[(i, H)], "vx is tangential at top wall");
        }
    }

    #[test]
    fn test_vy_reflects_on_horizontal_walls() {
        let mut f = ramp();
        set_bnd(FieldType::Vy, &mut f);
        for i in 1..=W {
            assert_eq!(f[(i, 0)], -f[(i, 1)], "vy should negate at bottom wall, col {}", i);
            assert_eq!(f[(i, H + 1)], -f[(i, H)], "vy should negate at top wall, col {}", i);
        }
        for j in 1..=H {
            assert_eq!(f[(0, j)], f[(1, j)], "vy is tangential at left wall");
            assert_eq!(f[(W + 1, j)], f[(W, j)], "vy is tangential at right wall");
        }
    }

    #[test]
    fn test_corners_untouched() {
        let mut f = ramp();
        let corners = [(0, 0), (W + 1, 0), (0, H + 1), (W + 1, H + 1)];
        for &c in &corners {
            f[c] = 42.0;
        }
        for kind in [FieldType::Scalar, FieldType::Vx, FieldType::Vy] {
            set_bnd(kind, &mut f);
            for &c in &corners {
                assert_eq!(f[c], 42.0, "{:?} should not write corner {:?}", kind, c);
            }
        }
    }

    #[test]
    fn test_interior_unchanged() {
        let before = ramp();
        let mut f = before.clone();
        set_bnd(FieldType::Vx, &mut f);
        assert!(before.interior().eq(f.interior()));
    }
}
