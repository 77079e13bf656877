pub mod gradient_based;
