pub mod events;
pub mod rest;
