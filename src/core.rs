pub mod offer;
pub mod score;
