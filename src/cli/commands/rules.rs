//! Rules command implementation
//!
//! Prints the resource rule registry: for each resource type, the reference
//! paths that are rewritten and the members that are cleared.

use crate::deid::rules::{display_path, identity_only_types, rule_for};
use crate::domain::ResourceType;
use clap::Args;
use std::fmt::Write;

/// Arguments for the rules command
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Only show the rule row of this resource type
    #[arg(short, long, value_name = "TYPE")]
    pub resource_type: Option<String>,
}

impl RulesArgs {
    /// Execute the rules command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let types = match &self.resource_type {
            Some(name) => match name.parse::<ResourceType>() {
                Ok(resource_type) => vec![resource_type],
                Err(e) => {
                    println!("❌ {e}");
                    println!("   Resources of this type get an identity rewrite only");
                    return Ok(3);
                }
            },
            None => ResourceType::ALL.to_vec(),
        };

        for resource_type in &types {
            print!("{}", render_rule(*resource_type));
        }

        if self.resource_type.is_none() {
            println!();
            println!("{} resource types registered", types.len());
            let identity_only: Vec<String> = identity_only_types()
                .iter()
                .map(ResourceType::to_string)
                .collect();
            println!("Identity rewrite only: {}", identity_only.join(", "));
        }

        Ok(0)
    }
}

/// Render one rule row
fn render_rule(resource_type: ResourceType) -> String {
    let rule = rule_for(resource_type);
    let mut out = String::new();
    let _ = writeln!(out, "{resource_type}");

    if rule.is_empty() {
        let _ = writeln!(out, "  (identity only)");
        return out;
    }

    for path in rule.references {
        let _ = writeln!(out, "  reference  {}", display_path(path));
    }
    for field in rule.clear {
        let _ = writeln!(out, "  clear      {field}");
    }
    out
}
