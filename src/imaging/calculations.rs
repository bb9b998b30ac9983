//! Pure calculation functions for letterbox placement.
//!
//! All functions here are pure and testable without any I/O or images.

/// Where the scaled source lands inside the target canvas.
///
/// `x`/`y` are the top-left offset, `width`/`height` the scaled extent.
/// The region always lies fully inside the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Margins as `(left, right, top, bottom)` for a given target box.
    pub fn margins(&self, target: (u32, u32)) -> (u32, u32, u32, u32) {
        let (tgt_w, tgt_h) = target;
        (
            self.x,
            tgt_w - self.x - self.width,
            self.y,
            tgt_h - self.y - self.height,
        )
    }

    /// Whether the pixel at `(px, py)` falls inside the composited region.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Calculate the letterbox placement that fits `source` inside `target`.
///
/// The source is scaled to touch the target box on one axis and centered on
/// the other; nothing is cropped. A relatively wider source fills the width,
/// anything else (including an exact aspect match) fills the height.
///
/// The scaled extent is rounded to whole pixels and kept within `[1, target]`.
/// A zero-sized target yields an empty placement.
/// Offsets use integer floor, so opposing margins differ by at most 1px.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Output canvas dimensions (width, height)
///
/// # Examples
/// ```
/// # use logo_resizer::imaging::calculate_letterbox;
/// // 1000x400 into 500x378 → 500x200, 89px above and below
/// let p = calculate_letterbox((1000, 400), (500, 378));
/// assert_eq!((p.x, p.y, p.width, p.height), (0, 89, 500, 200));
/// ```
pub fn calculate_letterbox(source: (u32, u32), target: (u32, u32)) -> Placement {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: width matches, bars top and bottom
        let h = snap(tgt_w as f64 / src_aspect, tgt_h);
        Placement {
            x: 0,
            y: (tgt_h - h) / 2,
            width: tgt_w,
            height: h,
        }
    } else {
        // Source is taller (or equal): height matches, bars left and right
        let w = snap(tgt_h as f64 * src_aspect, tgt_w);
        Placement {
            x: (tgt_w - w) / 2,
            y: 0,
            width: w,
            height: tgt_h,
        }
    }
}

fn snap(extent: f64, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    (extent.round() as u32).clamp(1, max)
}
