pub mod maze;
pub mod simple_golf;
