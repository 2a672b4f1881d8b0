pub mod health;
pub mod item;
pub mod playlist;
pub mod segment;
pub mod stream;
