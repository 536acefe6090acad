pub mod circular;
pub mod output;
