pub mod activities;
pub mod auth;
pub mod entries;
pub mod health;
pub mod moods;
pub mod stats;
