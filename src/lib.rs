pub mod color;
pub mod diagram;
pub mod fonts;
pub mod image;
pub mod interaction;
pub mod properties;
pub mod shape;
pub mod style;
pub mod theme;
pub mod xml;
