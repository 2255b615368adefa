pub mod markdown;
pub mod memory;

pub use markdown::MarkdownStorage;
pub use memory::MemoryStorage;
