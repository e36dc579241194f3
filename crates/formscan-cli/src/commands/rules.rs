//! Rules command - show or validate the field rule set.

use clap::Args;
use console::style;

use formscan_core::FieldRule;

use super::{build_rules, load_config};

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    /// Only compile the configured patterns and report errors
    #[arg(long)]
    check: bool,
}

pub async fn run(args: RulesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let rules = build_rules(&config)?;

    if args.check {
        let count: usize = rules
            .iter()
            .map(|rule| match rule {
                FieldRule::Group { fields, .. } => fields.len(),
                _ => 1,
            })
            .sum();
        println!("{} {} patterns compiled", style("✓").green(), count);
        return Ok(());
    }

    for rule in rules.iter() {
        println!("{} [{}]", style(rule.label()).bold(), rule.kind());
        match rule {
            FieldRule::Leaf(leaf) => println!("    {}", leaf.pattern()),
            FieldRule::Group { fields, .. } => {
                for field in fields {
                    println!("    {}: {}", field.label(), field.pattern());
                }
            }
            FieldRule::Repeat(repeat) => {
                println!("    {}", repeat.pattern());
                println!("    columns: {}", repeat.columns().join(", "));
                if let Some(limit) = repeat.limit() {
                    println!("    limit: {}", limit);
                }
            }
        }
    }

    Ok(())
}
