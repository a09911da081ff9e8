use crate::food::NutritionEstimator;

pub mod food_cmd;
mod system;

pub use food_cmd::CommandOptions;

pub struct CommandHandler {
    estimator: NutritionEstimator,
    options: CommandOptions,
}

impl CommandHandler {
    pub fn new(estimator: NutritionEstimator, options: CommandOptions) -> Self {
        Self { estimator, options }
    }

    pub async fn handle_command(&self, input: &str) -> Result<String, String> {
        let input = input.trim();
        match input.split_whitespace().next() {
            Some("nutrition") | Some("local") => {
                food_cmd::handle_command(input, &self.estimator, self.options).await
            }
            _ => system::handle_command(input),
        }
    }
}
