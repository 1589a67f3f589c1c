//! Polling and normalization layer for the checkrr dashboard.
//!
//! [`api`] talks to the checkrr backend, [`normalize`] turns its payloads
//! into view models, [`poll`] keeps each view fresh on its own timer and
//! [`views`] ties them together behind the user actions. [`cli`] and [`web`]
//! are the two surfaces over a [`views::Dashboard`].

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod normalize;
pub mod poll;
pub mod views;
pub mod web;
