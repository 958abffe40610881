pub mod list;
pub mod panels;
