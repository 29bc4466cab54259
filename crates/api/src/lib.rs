//! `brickstore-api` — HTTP surface for the catalog back-office.

pub mod app;
