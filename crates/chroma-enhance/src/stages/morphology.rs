//! Binary morphology on masks.
//!
//! Samples that fall outside the image are ignored rather than padded, so
//! a region touching the border is neither grown nor eroded by it.

use crate::buffer::Mask;

/// A structuring element: the set of offsets around the anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuringElement {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl StructuringElement {
    /// Filled ellipse inscribed in a `width x height` box.
    ///
    /// ```
    /// use chroma_enhance::StructuringElement;
    ///
    /// let se = StructuringElement::ellipse(5, 5);
    /// assert_eq!(se.rows(), vec!["..#..", "#####", "#####", "#####", "..#.."]);
    /// ```
    pub fn ellipse(width: usize, height: usize) -> Self {
        let r = (height / 2) as isize;
        let c = (width / 2) as isize;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

        let mut cells = vec![false; width * height];
        for i in 0..height {
            let dy = i as isize - r;
            if dy.abs() > r {
                continue;
            }
            let dx = (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as isize;
            let j1 = (c - dx).max(0) as usize;
            let j2 = ((c + dx + 1) as usize).min(width);
            for cell in &mut cells[i * width + j1..i * width + j2] {
                *cell = true;
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Rows rendered as `#` (set) and `.` (unset).
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|&on| if on { '#' } else { '.' }).collect())
            .collect()
    }

    fn offsets(&self) -> Vec<(isize, isize)> {
        let (ax, ay) = ((self.width / 2) as isize, (self.height / 2) as isize);
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.cells[y * self.width + x])
            .map(|(x, y)| (x as isize - ax, y as isize - ay))
            .collect()
    }
}

fn morph(mask: &Mask, element: &StructuringElement, pick: fn(u8, u8) -> u8, identity: u8) -> Mask {
    let (w, h) = mask.dimensions();
    let offsets = element.offsets();
    Mask::from_fn(w, h, |x, y| {
        offsets
            .iter()
            .filter_map(|&(dx, dy)| {
                let (sx, sy) = (x as isize + dx, y as isize + dy);
                let inside = sx >= 0 && sy >= 0 && (sx as usize) < w && (sy as usize) < h;
                inside.then(|| mask.get(sx as usize, sy as usize))
            })
            .fold(identity, pick)
    })
}

/// Maximum over the element.
pub fn dilate(mask: &Mask, element: &StructuringElement) -> Mask {
    morph(mask, element, u8::max, 0)
}

/// Minimum over the element.
pub fn erode(mask: &Mask, element: &StructuringElement) -> Mask {
    morph(mask, element, u8::min, 255)
}

/// Dilate then erode: fills small holes and gaps.
pub fn close(mask: &Mask, element: &StructuringElement) -> Mask {
    erode(&dilate(mask, element), element)
}

/// Erode then dilate: removes small specks.
pub fn open(mask: &Mask, element: &StructuringElement) -> Mask {
    dilate(&erode(mask, element), element)
}
