pub mod health;
pub mod sessions;
pub mod skill;
