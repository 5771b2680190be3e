use std::fmt;

/// Позиция указателя в координатах экрана
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, step: Displacement) -> Self {
        Self {
            x: self.x.saturating_add(step.dx),
            y: self.y.saturating_add(step.dy),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Относительное смещение указателя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Displacement {
    pub dx: i32,
    pub dy: i32,
}

impl Displacement {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

impl fmt::Display for Displacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}/{:+}", self.dx, self.dy)
    }
}

/// Размер экрана в пикселях
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Угловые точки экрана, в которых срабатывает FAILSAFE
    pub fn corners(&self) -> [Position; 4] {
        let right = i32::try_from(self.width.saturating_sub(1)).unwrap_or(i32::MAX);
        let bottom = i32::try_from(self.height.saturating_sub(1)).unwrap_or(i32::MAX);
        [
            Position::new(0, 0),
            Position::new(right, 0),
            Position::new(0, bottom),
            Position::new(right, bottom),
        ]
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Один цикл "покачивания": вправо, вниз, влево, вверх.
/// Сумма смещений всегда равна нулю.
pub fn square_path(distance: u32) -> [Displacement; 4] {
    let d = i32::try_from(distance).unwrap_or(i32::MAX);
    [
        Displacement::new(d, 0),
        Displacement::new(0, d),
        Displacement::new(-d, 0),
        Displacement::new(0, -d),
    ]
}
