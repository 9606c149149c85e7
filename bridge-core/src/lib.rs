mod card;
mod deal;
mod denomination;
mod hand;

pub use card::{Card, Rank, Suit};
pub use deal::{Deal, Partnership, Position};
pub use denomination::Denomination;
pub use hand::Hand;
