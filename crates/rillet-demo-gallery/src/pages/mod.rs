#![forbid(unsafe_code)]

//! Gallery pages, one module per tutorial chapter.

pub mod app_design;
pub mod architecture;
pub mod fundamentals;
