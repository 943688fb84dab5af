//! Core XML parsing primitives
//!
//! This module contains the fundamental building blocks for XML parsing:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Entities: XML entity decoding with Cow (zero-copy when possible), and HTML escaping
//! - Attributes: Strict attribute list parsing
//! - Encoding: UTF-16 detection and conversion to UTF-8

pub mod attributes;
pub mod encoding;
pub mod entities;
pub mod scanner;
