/// Integer screen rectangle in world (pixel) units.
///
/// Collision follows the usual sprite-library rule: rectangles that merely
/// share an edge do not overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// Rectangle of size `w`×`h` centred on (`cx`, `cy`).
    pub fn from_center(cx: f32, cy: f32, w: i32, h: i32) -> Self {
        Rect {
            x: (cx - w as f32 / 2.0) as i32,
            y: (cy - h as f32 / 2.0) as i32,
            w,
            h,
        }
    }

    /// Rectangle whose top edge midpoint sits at (`cx`, `top`).
    pub fn from_midtop(cx: i32, top: i32, w: i32, h: i32) -> Self {
        Rect { x: cx - w / 2, y: top, w, h }
    }

    /// Rectangle whose bottom edge midpoint sits at (`cx`, `bottom`).
    pub fn from_midbottom(cx: i32, bottom: i32, w: i32, h: i32) -> Self {
        Rect { x: cx - w / 2, y: bottom - h, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}
