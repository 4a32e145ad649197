/// Plain-text export of conversations - Gateway

mod sanitize;
mod transcript;

pub use sanitize::sanitize;
pub use transcript::{render_transcript, save_transcript};
