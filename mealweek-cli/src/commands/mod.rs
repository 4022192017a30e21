mod config_cmd;
mod plan;
mod recipe;

pub use config_cmd::{ConfigCommand, OutputFormat};
pub use plan::PlanCommand;
pub use recipe::RecipeCommand;
