pub mod coords;
pub mod sample;
pub mod series;
