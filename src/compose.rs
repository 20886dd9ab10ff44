pub mod blend;
pub mod fonts;
pub mod overlay;
