pub mod call;
pub mod generator;
pub mod legality;
pub mod ordering;
