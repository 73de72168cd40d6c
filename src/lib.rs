//! Pickup API - Backend for pickup sports game coordination
//!
//! This crate provides the REST API for Pickup, enabling:
//! - Field availability lookup and game booking
//! - Game rosters with join/invite/leave semantics
//! - Friend relationships between users
//! - Manager approval of bookings on managed fields

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
