// Gradient stop list
//
// Stops are stored first-to-last but listed last-to-first in the editor, so
// every display position goes through `display_index`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A gradient never has fewer stops than this.
pub const MIN_STOPS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradientError {
    /// Construction with fewer than `MIN_STOPS` stops.
    TooFewStops(usize),
    /// Removal attempted on a gradient already at `MIN_STOPS`.
    AtMinimum,
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for GradientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradientError::TooFewStops(n) => {
                write!(f, "a gradient needs at least {} stops, got {}", MIN_STOPS, n)
            }
            GradientError::AtMinimum => {
                write!(f, "cannot remove a stop: a gradient keeps at least {} stops", MIN_STOPS)
            }
            GradientError::OutOfRange { index, len } => {
                write!(f, "stop index {} out of range (gradient has {} stops)", index, len)
            }
        }
    }
}

impl std::error::Error for GradientError {}

/// Where a dragged stop lands relative to the row it is dropped on, as seen
/// in the (reversed) editor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPlacement {
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct GradientStops(Vec<Color>);

impl GradientStops {
    pub fn new(stops: Vec<Color>) -> Result<Self, GradientError> {
        if stops.len() < MIN_STOPS {
            return Err(GradientError::TooFewStops(stops.len()));
        }
        Ok(Self(stops))
    }

    /// Two-stop gradient from `first` to `last`.
    pub fn pair(first: Color, last: Color) -> Self {
        Self(vec![first, last])
    }

    /// Fixed stop list. Lists shorter than `MIN_STOPS` repeat their last stop.
    pub fn from_array<const N: usize>(stops: [Color; N]) -> Self {
        let mut v = stops.to_vec();
        while v.len() < MIN_STOPS {
            v.push(v.last().copied().unwrap_or(Color::BLACK));
        }
        Self(v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.0.get(index).copied()
    }

    pub fn last(&self) -> Color {
        self.0[self.0.len() - 1]
    }

    fn check(&self, index: usize) -> Result<(), GradientError> {
        if index < self.0.len() {
            Ok(())
        } else {
            Err(GradientError::OutOfRange { index, len: self.0.len() })
        }
    }

    pub fn set(&mut self, index: usize, color: Color) -> Result<(), GradientError> {
        self.check(index)?;
        self.0[index] = color;
        Ok(())
    }

    /// Append a copy of the last stop and return it.
    pub fn append(&mut self) -> Color {
        let last = self.last();
        self.0.push(last);
        last
    }

    pub fn remove(&mut self, index: usize) -> Result<Color, GradientError> {
        if self.0.len() <= MIN_STOPS {
            return Err(GradientError::AtMinimum);
        }
        self.check(index)?;
        Ok(self.0.remove(index))
    }

    /// Splice move: take the stop at `from` out, insert it at `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), GradientError> {
        self.check(from)?;
        self.check(to)?;
        if from != to {
            let stop = self.0.remove(from);
            self.0.insert(to, stop);
        }
        Ok(())
    }

    /// Map a storage index to its row in the editor list and back.
    pub fn display_index(&self, index: usize) -> usize {
        self.0.len() - 1 - index
    }

    /// Reorder by editor rows rather than storage positions.
    pub fn reorder_display(&mut self, from: usize, to: usize) -> Result<(), GradientError> {
        self.check(from)?;
        self.check(to)?;
        self.reorder(self.display_index(from), self.display_index(to))
    }

    /// Drop the stop at storage index `dragged` onto the row holding storage
    /// index `target`. Returns the stop's new storage index.
    ///
    /// The editor lists stops in reverse, so dropping above a row places the
    /// stop after the target in storage and dropping below places it before.
    pub fn drop_on(
        &mut self,
        dragged: usize,
        target: usize,
        placement: DropPlacement,
    ) -> Result<usize, GradientError> {
        self.check(dragged)?;
        self.check(target)?;
        if dragged == target {
            return Ok(dragged);
        }

        let before = placement == DropPlacement::Below;
        let new_index = if dragged < target {
            if before { target - 1 } else { target }
        } else if before {
            target
        } else {
            target + 1
        };

        let stop = self.0.remove(dragged);
        self.0.insert(new_index, stop);
        Ok(new_index)
    }

    /// Replace every stop, keeping the two-stop floor.
    pub fn replace(&mut self, stops: Vec<Color>) -> Result<(), GradientError> {
        *self = Self::new(stops)?;
        Ok(())
    }

    /// `radial-gradient(c1, c2, ...)`
    pub fn to_css(&self) -> String {
        let stops: Vec<String> = self.0.iter().map(Color::to_hex).collect();
        format!("radial-gradient({})", stops.join(", "))
    }
}

impl TryFrom<Vec<Color>> for GradientStops {
    type Error = GradientError;

    fn try_from(stops: Vec<Color>) -> Result<Self, Self::Error> {
        Self::new(stops)
    }
}

impl From<GradientStops> for Vec<Color> {
    fn from(stops: GradientStops) -> Self {
        stops.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops(hex: &[&str]) -> GradientStops {
        GradientStops::new(hex.iter().map(|h| Color::parse(h).unwrap()).collect()).unwrap()
    }

    fn hexes(g: &GradientStops) -> Vec<String> {
        g.iter().map(Color::to_hex).collect()
    }

    #[test]
    fn test_css_output() {
        let g = stops(&["#ff0000", "#00ff00", "#0000ff"]);
        assert_eq!(g.to_css(), "radial-gradient(#ff0000, #00ff00, #0000ff)");
    }

    #[test]
    fn test_remove_keeps_floor() {
        let mut g = stops(&["#ff0000", "#00ff00", "#0000ff"]);
        assert_eq!(g.remove(1).unwrap().to_hex(), "#00ff00");
        assert_eq!(hexes(&g), vec!["#ff0000", "#0000ff"]);
        assert_eq!(g.remove(0), Err(GradientError::AtMinimum));
        assert_eq!(hexes(&g), vec!["#ff0000", "#0000ff"]);
    }

    #[test]
    fn test_new_rejects_single_stop() {
        let err = GradientStops::new(vec![Color::BLACK]).unwrap_err();
        assert_eq!(err, GradientError::TooFewStops(1));
    }

    #[test]
    fn test_append_duplicates_last() {
        let mut g = stops(&["#111111", "#222222"]);
        let added = g.append();
        assert_eq!(added.to_hex(), "#222222");
        assert_eq!(hexes(&g), vec!["#111111", "#222222", "#222222"]);
    }

    #[test]
    fn test_reorder_splice() {
        let mut g = stops(&["#000001", "#000002", "#000003", "#000004"]);
        g.reorder(0, 2).unwrap();
        assert_eq!(hexes(&g), vec!["#000002", "#000003", "#000001", "#000004"]);
        g.reorder(3, 0).unwrap();
        assert_eq!(hexes(&g), vec!["#000004", "#000002", "#000003", "#000001"]);
        assert!(g.reorder(4, 0).is_err());
    }

    #[test]
    fn test_display_index_involution() {
        let g = stops(&["#000001", "#000002", "#000003"]);
        for i in 0..g.len() {
            assert_eq!(g.display_index(g.display_index(i)), i);
        }
        assert_eq!(g.display_index(0), 2);
    }

    #[test]
    fn test_reorder_display_moves_top_row_to_bottom() {
        // Rows read #3, #2, #1; moving the top row to the bottom stores it first.
        let mut g = stops(&["#000001", "#000002", "#000003"]);
        g.reorder_display(0, 2).unwrap();
        assert_eq!(hexes(&g), vec!["#000003", "#000001", "#000002"]);
    }

    #[test]
    fn test_drop_above_top_row() {
        let mut g = stops(&["#00000a", "#00000b", "#00000c"]);
        // Rows read c, b, a. Drop a above c: it becomes the top row.
        let idx = g.drop_on(0, 2, DropPlacement::Above).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(hexes(&g), vec!["#00000b", "#00000c", "#00000a"]);
    }

    #[test]
    fn test_drop_below_row() {
        let mut g = stops(&["#00000a", "#00000b", "#00000c"]);
        // Drop c below b: rows become b, c, a.
        let idx = g.drop_on(2, 1, DropPlacement::Below).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(hexes(&g), vec!["#00000a", "#00000c", "#00000b"]);
    }

    #[test]
    fn test_drop_on_self_is_noop() {
        let mut g = stops(&["#00000a", "#00000b"]);
        assert_eq!(g.drop_on(1, 1, DropPlacement::Above).unwrap(), 1);
        assert_eq!(hexes(&g), vec!["#00000a", "#00000b"]);
    }

    #[test]
    fn test_serde_rejects_short_list() {
        assert!(serde_json::from_str::<GradientStops>(r##"["#ffffff"]"##).is_err());
        let g: GradientStops = serde_json::from_str(r##"["#FFF", "#000000"]"##).unwrap();
        assert_eq!(serde_json::to_string(&g).unwrap(), r##"["#ffffff","#000000"]"##);
    }
}
