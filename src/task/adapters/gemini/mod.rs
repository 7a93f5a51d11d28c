//! Gemini `generateContent` adapter for the text-generation port.

mod client;

pub use client::GeminiClient;
