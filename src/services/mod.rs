//! Domain services: slot availability, booking lifecycle, and roster
//! membership. Route handlers stay thin and delegate here.

pub mod availability;
pub mod booking;
pub mod notifier;
pub mod roster;
