pub mod card;
pub mod deck;
pub mod hand;
pub(crate) mod lanes;
pub mod player;
pub mod rank;
pub mod suit;
pub mod trick;
