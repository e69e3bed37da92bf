pub mod inspect;
pub mod predict;
pub mod serve;
