pub mod board;
pub mod graphics;
