use colored::Colorize;

pub fn handle_command(input: &str) -> Result<String, String> {
    match input.to_lowercase().as_str() {
        "" => Ok(String::new()),
        "help" => Ok(help_text()),
        other => Err(format!("Unknown command '{}'. Type 'help' for the command list.", other)),
    }
}

fn help_text() -> String {
    let mut help = String::new();
    help.push_str(&format!("\n{}\n", "🥗 Nutrition Commands:".bold()));
    help.push_str("  nutrition <food>  - Estimate via online databases, offline table as fallback\n");
    help.push_str("  local <food>      - Estimate from the offline table only\n");
    help.push_str("  Examples: nutrition 200g chicken, local 2 bananas\n\n");
    help.push_str(&format!("{}\n", "⚙️ System Commands:".bold()));
    help.push_str("  help              - Show this help\n");
    help.push_str("  exit / quit       - Leave the prompt\n");
    help
}
