//! Direction of a region or of a jump between fields.
//!
//! ```ignore
//! use meu_lib::{movement::Direction, region::Region};
//!
//! assert_eq!(Region::new(5, 10).direction(), Direction::Forward);
//! assert_eq!(Region::new(10, 5).direction(), Direction::Backward);
//! ```

/// Which way a region extends, or which way the field navigator jumps.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
  /// Toward the end of the document (increasing positions).
  Forward,
  /// Toward the start of the document (decreasing positions).
  Backward,
}

impl Direction {
  #[inline]
  pub fn from_forward(forward: bool) -> Self {
    if forward {
      Self::Forward
    } else {
      Self::Backward
    }
  }

  #[inline]
  pub fn is_forward(self) -> bool {
    self == Self::Forward
  }
}
