use fnv::FnvHashMap;

use super::constants::*;

/// Horizontal slot for one note, in render-surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lane {
    pub x: f32,
    pub w: f32,
}

/// Axis-aligned rectangle in view (CSS) space, as reported by the page layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeyRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[inline]
pub fn note_in_range(note: i32) -> bool {
    (NOTE_MIN..=NOTE_MAX).contains(&note)
}

/// Maps note ids to lanes and holds the floor (impact) line.
#[derive(Clone, Debug, Default)]
pub struct LaneMap {
    lanes: FnvHashMap<i32, Lane>,
    floor_y: f32,
    width: f32,
    height: f32,
}

impl LaneMap {
    pub fn new(width: f32, height: f32) -> Self {
        let mut map = Self::default();
        map.layout_provisional(width, height);
        map
    }

    #[inline]
    pub fn lane(&self, note: i32) -> Option<Lane> {
        self.lanes.get(&note).copied()
    }

    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.floor_y
    }

    #[inline]
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// Lanes in ascending note order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, Lane)> + '_ {
        (NOTE_MIN..=NOTE_MAX).filter_map(move |n| self.lane(n).map(|l| (n, l)))
    }

    /// Spread the full note range evenly across the surface width.
    pub fn layout_provisional(&mut self, width: f32, height: f32) {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let margin = LANE_SIDE_MARGIN_PX.min(width * 0.5);
        let pitch = (width - 2.0 * margin) / NOTE_COUNT as f32;

        self.lanes.clear();
        for (i, note) in (NOTE_MIN..=NOTE_MAX).enumerate() {
            let x = margin + (i as f32 + 0.5) * pitch;
            self.lanes.insert(
                note,
                Lane {
                    x,
                    w: pitch * LANE_FILL_RATIO,
                },
            );
        }
        self.width = width;
        self.height = height;
        self.floor_y = clamp_floor(height - 1.0, height);
    }

    /// Derive lanes from the real key rectangles.
    ///
    /// `view` is the rectangle of the render surface in the same space as the
    /// key rects; `surface_w`/`surface_h` are the backing-store pixel sizes, so
    /// any device pixel ratio is folded into the scale. Rects for notes outside
    /// the supported range are ignored; if none remain, the provisional layout
    /// is used instead.
    pub fn layout_from_key_rects<'a, I>(
        &mut self,
        rects: I,
        view: KeyRect,
        surface_w: f32,
        surface_h: f32,
    ) where
        I: IntoIterator<Item = (i32, &'a KeyRect)>,
    {
        let sx = if view.width > 0.0 {
            surface_w / view.width
        } else {
            1.0
        };
        let sy = if view.height > 0.0 {
            surface_h / view.height
        } else {
            1.0
        };

        let mut lanes = FnvHashMap::default();
        let mut min_top = f32::INFINITY;
        for (note, r) in rects {
            if !note_in_range(note) || !(r.width.is_finite() && r.left.is_finite()) {
                continue;
            }
            let x = (r.left - view.left + r.width * 0.5) * sx;
            lanes.insert(
                note,
                Lane {
                    x,
                    w: (r.width * sx).max(0.0),
                },
            );
            if r.top.is_finite() {
                min_top = min_top.min((r.top - view.top) * sy);
            }
        }

        if lanes.is_empty() {
            log::debug!("[lanes] no usable key rects, using provisional layout");
            self.layout_provisional(surface_w, surface_h);
            return;
        }

        let height = surface_h.max(0.0);
        let top = if min_top.is_finite() {
            min_top
        } else {
            height - 1.0
        };
        self.lanes = lanes;
        self.width = surface_w.max(0.0);
        self.height = height;
        self.floor_y = clamp_floor(clamp_floor(top, height) + FLOOR_BIAS_PX, height);
    }
}

#[inline]
fn clamp_floor(y: f32, height: f32) -> f32 {
    y.clamp(0.0, (height - 1.0).max(0.0))
}
