//! Height and water colors shared by the surface mesh and the minimap.

pub const WALL_COLOR: [u8; 3] = [92, 72, 54];
pub const WATER_PLANE_RGBA: [u8; 4] = [40, 90, 170, 160];

/// Color of a point at `level`: blue shades at or below the water, then
/// grass, scrub, rock and snow bands up to `max_level`.
pub fn height_color(level: i32, water_level: i32, max_level: i32) -> [u8; 3] {
    if level <= water_level {
        let depth = (water_level - level).max(0) as f32;
        let denom = water_level.max(1) as f32;
        let d_norm = (depth / denom).clamp(0.0, 1.0);
        let blue = lerp(200, 110, d_norm);
        let green = lerp(90, 30, d_norm * 0.6);
        [0, green, blue]
    } else {
        let above = (level - water_level) as f32;
        let span = (max_level - water_level).max(1) as f32;
        let t = (above / span).clamp(0.0, 1.0);
        if t < 0.33 {
            lerp_color([34, 139, 34], [107, 142, 35], t / 0.33)
        } else if t < 0.66 {
            lerp_color([107, 142, 35], [139, 69, 19], (t - 0.33) / 0.33)
        } else {
            lerp_color([139, 69, 19], [245, 245, 245], (t - 0.66) / 0.34)
        }
    }
}

#[inline]
pub fn with_alpha(rgb: [u8; 3], a: u8) -> [u8; 4] {
    [rgb[0], rgb[1], rgb[2], a]
}

#[inline]
fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t)
        .round()
        .clamp(0.0, 255.0) as u8
}

fn lerp_color(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_is_blue_land_is_not() {
        let w = height_color(2, 3, 16);
        assert_eq!(w[0], 0);
        assert!(w[2] > w[1]);
        let l = height_color(4, 3, 16);
        assert!(l[1] > l[2]);
        assert_eq!(height_color(16, 3, 16), [245, 245, 245]);
    }
}
