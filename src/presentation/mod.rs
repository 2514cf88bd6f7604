// Presentation layer - Console surface, progress and user input
pub mod console_surface;
pub mod progress;
pub mod user_input;
