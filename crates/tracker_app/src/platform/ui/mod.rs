pub mod render;
pub mod terminal;

pub use render::render;
pub use terminal::Terminal;
