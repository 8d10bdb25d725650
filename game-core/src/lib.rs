pub mod phrases;
pub mod room;
pub mod turn;

// Re-export main components
pub use phrases::*;
pub use room::*;
pub use turn::*;
