pub mod agari;
pub mod fu;
pub mod machi;
pub mod point;
pub mod shanten;
pub mod ukeire;
pub mod yaku;
