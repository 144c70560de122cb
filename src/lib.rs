// Core game logic modules
pub mod core;

// Engine facade shared by every handler
pub mod engine;

// Error types
pub mod error;

// Environment configuration
pub mod config;

// Automated players
pub mod guessers;

// Middleware
pub mod middleware;

// Services (business logic)
pub mod services;

// API models (requests/responses)
pub mod models;

// HTTP routes
pub mod routes;

// Application state
pub mod state;
