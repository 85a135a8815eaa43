//! HTTP handlers

pub mod catalog;
pub mod form;
pub mod health;
pub mod predict;
