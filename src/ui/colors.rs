//! Rose Pine palette used by every snipdeck widget.
//! Values follow https://rosepinetheme.com/ (main variant).

use ratatui::style::Color;

pub struct RosePine;

impl RosePine {
    /// Screen background
    pub const BASE: Color = Color::Rgb(25, 23, 36);
    /// Panels, popups and the editor body
    pub const SURFACE: Color = Color::Rgb(31, 29, 46);
    pub const TEXT: Color = Color::Rgb(224, 222, 244);
    pub const SUBTLE: Color = Color::Rgb(144, 140, 170);
    pub const MUTED: Color = Color::Rgb(110, 106, 134);
    /// Errors and destructive actions
    pub const LOVE: Color = Color::Rgb(235, 111, 146);
    /// Editing state
    pub const GOLD: Color = Color::Rgb(246, 193, 119);
    /// Selected file tab
    pub const ROSE: Color = Color::Rgb(235, 188, 186);
    pub const FOAM: Color = Color::Rgb(156, 207, 216);
    pub const IRIS: Color = Color::Rgb(196, 167, 231);
    /// Idle borders
    pub const HIGHLIGHT_HIGH: Color = Color::Rgb(82, 79, 103);
}
