//! Page geometry and layout element trees.

use serde::{Deserialize, Serialize};

/// A point in normalized page space (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in normalized page space.
///
/// `(x0, y0)` is the top-left corner and `(x1, y1)` the bottom-right one.
/// PDF user space has y growing upward; use [`BoundingBox::from_pdf_rect`]
/// to convert at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a box from two corners, normalizing their order.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Convert a PDF user-space rectangle (y up) into normalized page space.
    ///
    /// ```
    /// use pdfsearch::model::BoundingBox;
    ///
    /// // 100x50 box whose bottom edge sits 700pt above the bottom of a 792pt page
    /// let bbox = BoundingBox::from_pdf_rect(72.0, 700.0, 172.0, 750.0, 792.0);
    /// assert_eq!(bbox.y0, 42.0);
    /// assert_eq!(bbox.y1, 92.0);
    /// ```
    pub fn from_pdf_rect(x0: f32, y0: f32, x1: f32, y1: f32, page_height: f32) -> Self {
        Self::new(x0, page_height - y1, x1, page_height - y0)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Union of every box in the iterator, or `None` when it is empty.
    pub fn enclosing<'a>(boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Option<BoundingBox> {
        boxes.into_iter().fold(None, |acc, b| match acc {
            None => Some(*b),
            Some(a) => Some(a.union(b)),
        })
    }

    /// Positive-area intersection test. Shared edges or corners do not count.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        rects_overlap(
            self.top_left(),
            self.bottom_right(),
            other.top_left(),
            other.bottom_right(),
        )
    }
}

/// Overlap test on two rectangles given as (top-left, bottom-right) corners.
pub fn rects_overlap(l1: Point, r1: Point, l2: Point, r2: Point) -> bool {
    // one rectangle is left of the other
    if l1.x >= r2.x || l2.x >= r1.x {
        return false;
    }

    // one rectangle is above the other
    if l1.y >= r2.y || l2.y >= r1.y {
        return false;
    }

    true
}

/// A node of a page's layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutElement {
    /// A block of text lines (paragraph candidate).
    TextBlock { bbox: BoundingBox, text: String },
    /// A placed raster image.
    ImageBlock { bbox: BoundingBox, name: String },
    /// A composite element grouping other elements.
    Container {
        bbox: BoundingBox,
        children: Vec<LayoutElement>,
    },
}

impl LayoutElement {
    pub fn text(bbox: BoundingBox, text: impl Into<String>) -> Self {
        LayoutElement::TextBlock {
            bbox,
            text: text.into(),
        }
    }

    pub fn image(bbox: BoundingBox, name: impl Into<String>) -> Self {
        LayoutElement::ImageBlock {
            bbox,
            name: name.into(),
        }
    }

    /// Build a container whose box encloses all of its children.
    pub fn container(children: Vec<LayoutElement>) -> Self {
        let bbox = BoundingBox::enclosing(children.iter().map(|c| c.bbox())).unwrap_or_default();
        LayoutElement::Container { bbox, children }
    }

    pub fn bbox(&self) -> &BoundingBox {
        match self {
            LayoutElement::TextBlock { bbox, .. }
            | LayoutElement::ImageBlock { bbox, .. }
            | LayoutElement::Container { bbox, .. } => bbox,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, LayoutElement::Container { .. })
    }
}

/// Layout of one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Top-level elements in reading order
    pub elements: Vec<LayoutElement>,
}

impl PageLayout {
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn with_elements(mut self, elements: Vec<LayoutElement>) -> Self {
        self.elements = elements;
        self
    }
}
