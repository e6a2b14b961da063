#[derive(Debug, Clone, PartialEq)]
pub enum Direction {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    ToggleHelp,
    CycleSortMode,
    CycleTheme,
    Refresh,
    None,
}
