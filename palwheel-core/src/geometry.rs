//! Mapping between points on the hue/saturation disk and colors.
//!
//! Screen space is y-down, and hue is measured clockwise from +x on screen, so a point to the
//! right of the center is hue 0 and a point below it is hue 90.

use ultraviolet::Vec2;

use crate::color::normalize_degrees;

/// Inner (dead zone) radius, as a fraction of the outer radius.
pub const INNER_FRACTION: f32 = 0.2;

/// An axis-aligned screen rectangle.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}
impl Rect {
    #[must_use]
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Hue in degrees `[0, 360)` and saturation in `[0, 1]`.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Polar {
    pub hue: f32,
    pub saturation: f32,
}

/// One wedge of the disk ring, for painting.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Segment {
    /// Hue at the middle of the wedge.
    pub hue: f32,
    /// Hue along the first and second edges.
    pub edge_hues: [f32; 2],
    /// Inner start, outer start, outer end, inner end. Convex, wound consistently.
    pub corners: [Vec2; 4],
}

/// The hue/saturation disk. Saturation runs from zero at the inner radius to one at the outer.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Disk {
    pub center: Vec2,
    pub outer: f32,
    pub inner: f32,
}
impl Disk {
    /// A disk with the standard inner radius.
    #[must_use]
    pub fn new(center: Vec2, outer: f32) -> Self {
        Self {
            center,
            outer,
            inner: outer * INNER_FRACTION,
        }
    }
    /// Fit a disk inside the wheel pane, leaving margin for the node outlines.
    #[must_use]
    pub fn fit(pane: Rect) -> Self {
        let width = pane.width();
        let size = (width.min(pane.height()) - 24.0).max(64.0);
        let outer = (size * 0.45).min(width * 0.45).max(0.0);
        Self::new(pane.center(), outer)
    }
    #[must_use]
    pub fn ring_width(&self) -> f32 {
        self.outer - self.inner
    }
    /// Resolve a screen point to a hue and saturation.
    ///
    /// Anything within the inner radius is saturation zero, anything past the outer radius is one.
    #[must_use]
    pub fn screen_to_polar(&self, point: Vec2) -> Polar {
        let delta = point - self.center;
        let ring = self.ring_width();
        let saturation = if ring > 0.0 {
            ((delta.mag() - self.inner) / ring).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let hue = normalize_degrees(delta.y.atan2(delta.x).to_degrees());
        Polar { hue, saturation }
    }
    #[must_use]
    pub fn polar_to_screen(&self, polar: Polar) -> Vec2 {
        let radius = self.inner + polar.saturation.clamp(0.0, 1.0) * self.ring_width();
        let theta = polar.hue.to_radians();
        self.center + Vec2::new(theta.cos(), theta.sin()) * radius
    }
    /// Wedge `index` of `count` equal wedges around the ring.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn segment(&self, index: usize, count: usize) -> Segment {
        let step = 360.0 / count.max(1) as f32;
        let start = index as f32 * step;
        let end = start + step;
        let at = |degrees: f32, radius: f32| {
            let theta = degrees.to_radians();
            self.center + Vec2::new(theta.cos(), theta.sin()) * radius
        };
        Segment {
            hue: normalize_degrees(start + step * 0.5),
            edge_hues: [normalize_degrees(start), normalize_degrees(end)],
            corners: [
                at(start, self.inner),
                at(start, self.outer),
                at(end, self.outer),
                at(end, self.inner),
            ],
        }
    }
}

/// Whether `pointer` grabs a node drawn at `node`.
#[must_use]
pub fn hit_test(node: Vec2, pointer: Vec2, node_radius: f32, slop: f32) -> bool {
    let reach = node_radius + slop;
    (pointer - node).mag_sq() <= reach * reach
}

#[cfg(test)]
mod test {
    use super::*;

    fn disk() -> Disk {
        Disk::new(Vec2::new(100.0, 100.0), 80.0)
    }

    #[test]
    fn boundary_point() {
        let disk = disk();
        assert_eq!(disk.inner, 16.0);
        let polar = disk.screen_to_polar(Vec2::new(180.0, 100.0));
        assert!((polar.saturation - 1.0).abs() < 1e-5);
        assert!(polar.hue.abs() < 1e-5);
    }
    #[test]
    fn dead_zone_and_outside() {
        let disk = disk();
        assert_eq!(disk.screen_to_polar(Vec2::new(100.0, 100.0)).saturation, 0.0);
        assert_eq!(disk.screen_to_polar(Vec2::new(110.0, 100.0)).saturation, 0.0);
        assert_eq!(disk.screen_to_polar(Vec2::new(400.0, 100.0)).saturation, 1.0);
    }
    #[test]
    fn y_down_hue() {
        let disk = disk();
        let below = disk.screen_to_polar(Vec2::new(100.0, 150.0));
        assert!((below.hue - 90.0).abs() < 1e-3);
        let above = disk.screen_to_polar(Vec2::new(100.0, 50.0));
        assert!((above.hue - 270.0).abs() < 1e-3);
    }
    #[test]
    fn polar_inverse() {
        let disk = disk();
        for hue in [0.0, 15.0, 90.0, 179.5, 270.0, 359.0] {
            for saturation in [0.1, 0.5, 1.0] {
                let back = disk.screen_to_polar(disk.polar_to_screen(Polar { hue, saturation }));
                assert!((back.saturation - saturation).abs() < 1e-4);
                // Tolerate wrap-around at 0/360.
                let dh = (back.hue - hue).abs();
                assert!(dh.min(360.0 - dh) < 1e-2, "{hue} -> {}", back.hue);
            }
        }
        // At saturation zero only the radius is meaningful.
        let center = disk.polar_to_screen(Polar {
            hue: 123.0,
            saturation: 0.0,
        });
        assert!(((center - disk.center).mag() - disk.inner).abs() < 1e-4);
    }
    #[test]
    fn degenerate_disk() {
        let disk = Disk::new(Vec2::zero(), 0.0);
        assert_eq!(disk.screen_to_polar(Vec2::new(5.0, 0.0)).saturation, 0.0);
    }
    #[test]
    fn fitting() {
        let pane = Rect::from_min_size(Vec2::new(10.0, 20.0), Vec2::new(200.0, 300.0));
        let disk = Disk::fit(pane);
        assert_eq!(disk.center, Vec2::new(110.0, 170.0));
        // min(200, 300) - 24 = 176, * 0.45
        assert!((disk.outer - 79.2).abs() < 1e-4);
        // Tiny panes still get a minimum size, but never wider than the pane allows.
        let tiny = Disk::fit(Rect::from_min_size(Vec2::zero(), Vec2::new(40.0, 40.0)));
        assert!((tiny.outer - 18.0).abs() < 1e-4);
    }
    #[test]
    fn hits() {
        let node = Vec2::new(50.0, 50.0);
        assert!(hit_test(node, Vec2::new(62.0, 50.0), 8.0, 4.0));
        assert!(!hit_test(node, Vec2::new(62.1, 50.0), 8.0, 4.0));
    }
    #[test]
    fn segments_cover_ring() {
        let disk = disk();
        let first = disk.segment(0, 4);
        assert!((first.hue - 45.0).abs() < 1e-4);
        assert_eq!(first.edge_hues, [0.0, 90.0]);
        assert!((first.corners[0] - Vec2::new(116.0, 100.0)).mag() < 1e-4);
        assert!((first.corners[2] - Vec2::new(100.0, 180.0)).mag() < 1e-3);
        let last = disk.segment(3, 4);
        assert!((last.corners[2] - first.corners[1]).mag() < 1e-3);
        // The last edge wraps around to hue zero.
        assert_eq!(last.edge_hues[1], 0.0);
    }
}
