//! HTTP API for recording and reviewing care events.

pub mod app;
pub mod config;
pub mod db_handler;
pub mod error;
