// Public entities for the BP logger web layer
// This module contains data structures that cross the HTTP boundary

// Readings and blocks served by the JSON API
pub mod blocks;

// Common entities for error handling
pub mod common;

// Form payloads posted by the HTML page
pub mod forms;
