pub mod log;
pub mod score;
