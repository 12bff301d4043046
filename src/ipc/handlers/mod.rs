pub mod core;
pub mod marks;
pub mod pages;
pub mod rankings;
pub mod students;
