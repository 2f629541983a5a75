pub mod activists;
