use isle_geom::Vec3;

/// Flat vertex arrays ready for upload: positions, normals, UVs, indices and RGBA colors.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
    pub col: Vec<u8>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse across rebuilds.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.idx.clear();
        self.col.clear();
    }

    #[inline]
    pub fn reserve_tris(&mut self, n_tris: usize) {
        self.pos.reserve(n_tris * 3 * 3);
        self.norm.reserve(n_tris * 3 * 3);
        self.uv.reserve(n_tris * 3 * 2);
        self.col.reserve(n_tris * 3 * 4);
        self.idx.reserve(n_tris * 3);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    fn push_vertex(&mut self, p: Vec3, n: Vec3, uv: (f32, f32), rgba: [u8; 4]) {
        self.pos.extend_from_slice(&[p.x, p.y, p.z]);
        self.norm.extend_from_slice(&[n.x, n.y, n.z]);
        self.uv.extend_from_slice(&[uv.0, uv.1]);
        self.col.extend_from_slice(&rgba);
    }

    /// Appends one triangle with face normal `(b - a) x (c - a)`; UVs come from world XZ.
    pub fn add_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, rgba: [u8; 4]) {
        let n = (b - a).cross(c - a).normalized();
        let base = self.vertex_count() as u32;
        for p in [a, b, c] {
            self.push_vertex(p, n, (p.x, p.z), rgba);
        }
        self.idx.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Appends a quad (two triangles) facing `n`, swapping the winding if needed.
    pub fn add_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, n: Vec3, rgba: [u8; 4]) {
        let base = self.vertex_count() as u32;
        let mut vs = [a, b, c, d];
        let mut uvs = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        if (vs[1] - vs[0]).cross(vs[2] - vs[0]).dot(n) < 0.0 {
            vs.swap(1, 3);
            uvs.swap(1, 3);
        }
        for i in 0..4 {
            self.push_vertex(vs[i], n, uvs[i], rgba);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Returns a slice of interleaved vertex positions (x,y,z per vertex).
    pub fn positions(&self) -> &[f32] {
        &self.pos
    }

    /// Returns a slice of interleaved vertex normals (x,y,z per vertex).
    pub fn normals(&self) -> &[f32] {
        &self.norm
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos[i * 3], self.pos[i * 3 + 1], self.pos[i * 3 + 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_winding_follows_normal() {
        let mut m = MeshBuild::default();
        let (a, b, c, d) = (
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        m.add_quad(a, b, c, d, Vec3::UP, [255; 4]);
        assert_eq!(m.vertex_count(), 4);
        assert_eq!(m.triangle_count(), 2);
        let n = (m.position(1) - m.position(0)).cross(m.position(2) - m.position(0));
        assert!(n.y > 0.0);
    }

    #[test]
    fn triangle_gets_flat_normal() {
        let mut m = MeshBuild::default();
        m.add_triangle(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
            [0, 0, 0, 255],
        );
        assert_eq!(&m.normals()[0..3], &[0.0, 1.0, 0.0]);
        m.clear_keep_capacity();
        assert!(m.is_empty());
    }
}
