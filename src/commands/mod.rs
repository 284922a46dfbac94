// Command handlers module
pub mod export;

// Re-exports for cleaner imports
pub use export::execute as export;
