/// Session management module - Gateway

mod coach;

pub use coach::Coach;
