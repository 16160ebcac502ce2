pub mod codes;
pub mod convert;
pub mod ui;
