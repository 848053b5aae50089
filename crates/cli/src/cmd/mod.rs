mod build;
mod locate;
mod plan;

pub use build::cmd_build;
pub use locate::cmd_locate;
pub use plan::cmd_plan;
