pub mod exec;
pub mod output;
pub mod sampler;
pub mod walk;

pub use exec::exec;
pub use output::{output_summary, write_json};
pub use sampler::{select, WeeklySampler};
pub use walk::Walk;
