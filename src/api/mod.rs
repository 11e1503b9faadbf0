// API module

pub mod client;

pub use client::{AggregateResponse, AuthResponse, ConnectionCheck, HubApi, StatusResponse};
