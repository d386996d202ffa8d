//! Vocab Coach Library
//!
//! Vocabulary study: passage highlighting, speech playback, pronunciation
//! scoring and printable study sheets.

pub mod app;
pub mod capture;
pub mod config;
pub mod core;
pub mod error;
pub mod lesson;
pub mod passage;
pub mod practice;
pub mod print;
pub mod study;
pub mod tts;
