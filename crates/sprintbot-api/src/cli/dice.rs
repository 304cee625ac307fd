//! `sprintbot roll`.

use anyhow::Result;
use console::style;
use sprintbot_core::dice;

use super::render::html_to_terminal;

pub fn roll(text: &[String], json: bool) -> Result<()> {
    let text = text.join(" ");
    let Some(spec) = dice::parse(&text) else {
        if json {
            println!("{}", serde_json::json!({ "matched": false }));
        } else {
            println!("  {} no dice expression in '{}'", style("✗").red(), text);
        }
        return Ok(());
    };

    let outcome = dice::roll(spec);

    if json {
        let result = serde_json::json!({
            "matched": true,
            "spec": outcome.spec,
            "first": outcome.first.values,
            "second": outcome.second.as_ref().map(|pool| &pool.values),
            "total": outcome.total(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    for line in html_to_terminal(&outcome.render()).lines() {
        println!("  {line}");
    }
    println!();
    Ok(())
}
