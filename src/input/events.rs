use crate::core::bounds::ScreenPoint;
use crate::core::viewport::Dimensions;
use serde::{Deserialize, Serialize};

/// Input events the session understands, in device pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Button released without movement
    Click { position: ScreenPoint },
    DoubleClick { position: ScreenPoint },
    /// Mouse drag in progress; positive `dx` moves the map content right
    Drag { dx: i32, dy: i32 },
    /// Mouse drag finished
    DragEnd,
    /// Scroll wheel; positive steps zoom in
    Scroll { steps: i32 },
    Resize { dimensions: Dimensions },
}

impl InputEvent {
    /// Gets the pointer position associated with this event, if any
    pub fn position(&self) -> Option<ScreenPoint> {
        match self {
            InputEvent::Click { position } | InputEvent::DoubleClick { position } => {
                Some(*position)
            }
            _ => None,
        }
    }
}

/// Screen-edge scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    /// Unit pixel step, screen Y down
    pub fn multipliers(self) -> (i32, i32) {
        match self {
            Direction::None => (0, 0),
            Direction::N => (0, -1),
            Direction::NE => (1, -1),
            Direction::E => (1, 0),
            Direction::SE => (1, 1),
            Direction::S => (0, 1),
            Direction::SW => (-1, 1),
            Direction::W => (-1, 0),
            Direction::NW => (-1, -1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NE | Direction::SE | Direction::SW | Direction::NW
        )
    }

    /// Distance an edge click jumps: half the screen along the direction,
    /// half the diagonal for corners
    pub fn jump_distance(self, width: u32, height: u32) -> f64 {
        let (w, h) = (width as f64, height as f64);
        match self {
            Direction::None => 0.0,
            Direction::N | Direction::S => h / 2.0,
            Direction::E | Direction::W => w / 2.0,
            _ => (w * w + h * h).sqrt() / 2.0,
        }
    }
}

/// Which edge-scroll target a pointer position falls in.
///
/// Edges are `border` pixels wide. Corner targets are L-shaped and cover one
/// third of both edges they touch.
pub fn match_border(x: i32, y: i32, width: i32, height: i32, border: i32) -> Direction {
    let x_corner = width / 3;
    let y_corner = height / 3;

    if x <= border {
        if y <= y_corner {
            Direction::NW
        } else if y + y_corner >= height {
            Direction::SW
        } else {
            Direction::W
        }
    } else if x + border >= width {
        if y <= y_corner {
            Direction::NE
        } else if y + y_corner >= height {
            Direction::SE
        } else {
            Direction::E
        }
    } else if y <= border {
        if x <= x_corner {
            Direction::NW
        } else if x + x_corner >= width {
            Direction::NE
        } else {
            Direction::N
        }
    } else if y + border >= height {
        if x <= x_corner {
            Direction::SW
        } else if x + x_corner >= width {
            Direction::SE
        } else {
            Direction::S
        }
    } else {
        Direction::None
    }
}
