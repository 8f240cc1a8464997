use crate::foundation::core::Rgba8;

/// Two-color checkerboard tile used for transparent-background fills.
///
/// The tile is precomputed once; fills sample it with wrap-around, so a pattern built for one
/// configuration can be reused for every frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckerPattern {
    cell: u32,
    light: Rgba8,
    dark: Rgba8,
    tile: Vec<[u8; 4]>,
}

impl CheckerPattern {
    /// Build a checkerboard whose squares are `cell` pixels wide (minimum 1).
    pub fn new(cell: u32, light: Rgba8, dark: Rgba8) -> Self {
        let cell = cell.max(1);
        let period = cell * 2;
        let mut tile = Vec::with_capacity((period * period) as usize);
        for y in 0..period {
            for x in 0..period {
                let is_light = (x / cell + y / cell) % 2 == 0;
                tile.push(if is_light { light.premul() } else { dark.premul() });
            }
        }
        Self {
            cell,
            light,
            dark,
            tile,
        }
    }

    /// Square edge length in pixels.
    pub fn cell(&self) -> u32 {
        self.cell
    }

    /// Repeat distance of the pattern in pixels.
    pub fn period(&self) -> u32 {
        self.cell * 2
    }

    /// Color of the squares containing the pattern origin.
    pub fn light(&self) -> Rgba8 {
        self.light
    }

    /// Color of the alternate squares.
    pub fn dark(&self) -> Rgba8 {
        self.dark
    }

    /// Premultiplied color at pattern coordinate `(x, y)`.
    pub fn sample(&self, x: f64, y: f64) -> [u8; 4] {
        let period = i64::from(self.period());
        let tx = (x.floor() as i64).rem_euclid(period) as usize;
        let ty = (y.floor() as i64).rem_euclid(period) as usize;
        self.tile[ty * period as usize + tx]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/pattern.rs"]
mod tests;
