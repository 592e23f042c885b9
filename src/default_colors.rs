use crossterm::style::Color;

pub const COLOR_WHITE: Color = Color::Rgb {
    r: 202,
    g: 211,
    b: 245,
};
pub const COLOR_DIMMED: Color = Color::Rgb {
    r: 110,
    g: 115,
    b: 141,
};
pub const COLOR_TITLE: Color = Color::Rgb {
    r: 245,
    g: 169,
    b: 127,
};
pub const COLOR_GENRE: Color = Color::Rgb {
    r: 240,
    g: 198,
    b: 198,
};
pub const COLOR_PAGE_COUNT: Color = Color::Rgb {
    r: 139,
    g: 213,
    b: 202,
};
pub const COLOR_COVER: Color = Color::Rgb {
    r: 125,
    g: 196,
    b: 228,
};
pub const COLOR_LOADING: Color = Color::Rgb {
    r: 138,
    g: 173,
    b: 244,
};
pub const COLOR_SUCCESS: Color = Color::Rgb {
    r: 166,
    g: 218,
    b: 149,
};
pub const COLOR_ERROR: Color = Color::Rgb {
    r: 237,
    g: 135,
    b: 150,
};
