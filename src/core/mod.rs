// Core module - Session lifecycle and communication primitives
pub mod communication;
pub mod session;
