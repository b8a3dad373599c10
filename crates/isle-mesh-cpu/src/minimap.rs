//! Land/water raster with one texel per grid point.

use std::io::Write;
use std::path::Path;

use isle_edit::Terrain;
use isle_geom::{GridPoint, GridRect};

use crate::palette::height_color;

/// RGB minimap. Row 0 is the north edge (`z = tiles_z`) so the image reads
/// north-up.
#[derive(Clone, Debug)]
pub struct Minimap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Minimap {
    pub fn new(terrain: &Terrain) -> Self {
        let dims = terrain.dims();
        let (width, height) = (dims.points_x() as usize, dims.points_z() as usize);
        let mut map = Self {
            width,
            height,
            data: vec![0; width * height * 3],
        };
        map.rebuild_all(terrain);
        map
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let idx = (y * self.width + x) * 3;
        self.data[idx..idx + 3].copy_from_slice(&rgb);
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let idx = (y * self.width + x) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Texel of grid point `p`.
    #[inline]
    pub fn texel(&self, p: GridPoint) -> [u8; 3] {
        self.pixel(p.x as usize, self.height - 1 - p.z as usize)
    }

    pub fn rebuild_all(&mut self, terrain: &Terrain) {
        self.update_region(GridRect::full(terrain.dims()), terrain);
    }

    /// Recolors only the texels inside `area`.
    pub fn update_region(&mut self, area: GridRect, terrain: &Terrain) {
        let area = area.clamped(terrain.dims());
        let water = terrain.water_level();
        let max = terrain.dims().max_level;
        for p in area.points() {
            let Some(level) = terrain.point_level(p) else {
                continue;
            };
            let y = self.height - 1 - p.z as usize;
            self.put_pixel(p.x as usize, y, height_color(level, water, max));
        }
    }

    /// Binary PPM (P6) encoding.
    pub fn to_ppm(&self) -> Vec<u8> {
        let mut out = format!("P6\n{} {}\n255\n", self.width, self.height).into_bytes();
        out.extend_from_slice(&self.data);
        out
    }

    pub fn write_ppm(&self, path: &Path) -> std::io::Result<()> {
        let mut f = std::fs::File::create(path)?;
        f.write_all(&self.to_ppm())?;
        Ok(())
    }
}
