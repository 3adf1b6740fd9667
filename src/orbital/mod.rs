pub mod body;
pub mod elements;
pub mod two_body;

pub use body::CentralBody;
pub use elements::KeplerianElements;
pub use two_body::TwoBodyOrbit;
