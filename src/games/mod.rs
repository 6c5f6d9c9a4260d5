pub mod sheepshead;
