pub mod drive;
pub mod stabilize;
