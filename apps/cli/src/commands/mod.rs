pub mod check;
pub mod order;
pub mod resolve;
