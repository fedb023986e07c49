//! Enhanced error module re-export
//! 
//! This module re-exports the comprehensive parsing error types.

pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
