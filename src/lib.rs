//! Donation hub: donation lifecycle, role-based permissions, user profiles
//! and volunteer notifications over an actor-backed store.

pub mod actor_framework;
pub mod app_system;
pub mod cache;
pub mod category_actor;
pub mod clients;
pub mod config;
pub mod domain;
pub mod donation_actor;
pub mod messages;
pub mod notification;
pub mod permissions;
pub mod session;
pub mod user_actor;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;
