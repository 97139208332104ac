use crate::scene::Initializer;
use crate::solver::{set_bnd, FieldType};

/// Dense 2D scalar field with a one-cell ghost border on every side.
///
/// Storage is `(width + 2) * (height + 2)` values. Interior cells are
/// `1..=width` x `1..=height`; row `0`, row `height + 1`, column `0` and
/// column `width + 1` form the border.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Field {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width + 2) * (height + 2)],
        }
    }

    /// Interior width (W).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Interior height (H).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Linear storage index for `(i, j)` with `0 <= i <= W+1`, `0 <= j <= H+1`.
    #[inline(always)]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(i <= self.width + 1 && j <= self.height + 1, "({i}, {j}) outside field");
        i + j * (self.width + 2)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Iterate interior values row by row (`j` outer, `i` inner).
    pub fn interior(&self) -> impl Iterator<Item = f64> + '_ {
        (1..=self.height).flat_map(move |j| (1..=self.width).map(move |i| self[(i, j)]))
    }
}

impl std::ops::Index<(usize, usize)> for Field {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[self.idx(i, j)]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Field {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        let k = self.idx(i, j);
        &mut self.data[k]
    }
}

/// Current/previous double buffer.
///
/// `swap` flips which slot is current; no cell data moves.
#[derive(Clone, Debug)]
pub struct FieldPair {
    slots: [Field; 2],
    current: usize,
}

impl FieldPair {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            slots: [Field::new(width, height), Field::new(width, height)],
            current: 0,
        }
    }

    pub fn swap(&mut self) {
        self.current ^= 1;
    }

    pub fn current(&self) -> &Field {
        &self.slots[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Field {
        &mut self.slots[self.current]
    }

    pub fn previous(&self) -> &Field {
        &self.slots[self.current ^ 1]
    }

    /// Borrow `(current, previous)` at once.
    pub fn split_mut(&mut self) -> (&mut Field, &mut Field) {
        let [a, b] = &mut self.slots;
        if self.current == 0 { (a, b) } else { (b, a) }
    }
}

#[derive(Clone)]
pub struct SimState {
    pub width: usize,
    pub height: usize,
    pub density: FieldPair,
    pub vx: FieldPair,
    pub vy: FieldPair,
    /// Pressure buffer for projection.
    pub scratch_p: Field,
    /// Divergence buffer for projection.
    pub scratch_div: Field,
    /// Completed ticks since construction.
    pub tick: u64,
}

impl SimState {
    /// Build the state and sample `init` once per interior cell.
    pub fn new(width: usize, height: usize, init: &dyn Initializer) -> Self {
        let mut state = Self {
            width,
            height,
            density: FieldPair::new(width, height),
            vx: FieldPair::new(width, height),
            vy: FieldPair::new(width, height),
            scratch_p: Field::new(width, height),
            scratch_div: Field::new(width, height),
            tick: 0,
        };
        state.populate(init);
        state
    }

    fn populate(&mut self, init: &dyn Initializer) {
        let dens = self.density.current_mut();
        let vx = self.vx.current_mut();
        let vy = self.vy.current_mut();
        for j in 1..=self.height {
            for i in 1..=self.width {
                let (x, y) = (i as f64, j as f64);
                dens[(i, j)] = init.density(x, y);
                let (u, v) = init.velocity(x, y);
                vx[(i, j)] = u;
                vy[(i, j)] = v;
            }
        }
        set_bnd(FieldType::Scalar, dens);
        set_bnd(FieldType::Vx, vx);
        set_bnd(FieldType::Vy, vy);
    }

    /// Zero every buffer and re-sample `init`. Dimensions are unchanged.
    pub fn reset(&mut self, init: &dyn Initializer) {
        for pair in [&mut self.density, &mut self.vx, &mut self.vy] {
            let (cur, prev) = pair.split_mut();
            cur.fill(0.0);
            prev.fill(0.0);
        }
        self.scratch_p.fill(0.0);
        self.scratch_div.fill(0.0);
        self.tick = 0;
        self.populate(init);
    }

    pub fn density(&self) -> &Field {
        self.density.current()
    }

    pub fn velocity_x(&self) -> &Field {
        self.vx.current()
    }

    pub fn velocity_y(&self) -> &Field {
        self.vy.current()
    }

    /// Add `amount` of density and a `(fx, fy)` velocity impulse to every
    /// interior cell within `radius` cells of `(x, y)`.
    pub fn splat(&mut self, x: f64, y: f64, radius: f64, amount: f64, force: (f64, f64)) {
        let r2 = radius * radius;
        let i_lo = (x - radius).floor().max(1.0) as usize;
        let j_lo = (y - radius).floor().max(1.0) as usize;
        let i_hi = ((x + radius).ceil() as usize).min(self.width);
        let j_hi = ((y + radius).ceil() as usize).min(self.height);

        let dens = self.density.current_mut();
        let vx = self.vx.current_mut();
        let vy = self.vy.current_mut();
        for j in j_lo..=j_hi {
            for i in i_lo..=i_hi {
                let dx = i as f64 - x;
                let dy = j as f64 - y;
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                dens[(i, j)] += amount;
                vx[(i, j)] += force.0;
                vy[(i, j)] += force.1;
            }
        }
        set_bnd(FieldType::Scalar, dens);
        set_bnd(FieldType::Vx, vx);
        set_bnd(FieldType::Vy, vy);
    }
}
