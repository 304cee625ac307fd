//! `sprintbot plural` and `sprintbot wc`.

use anyhow::Result;
use console::style;
use sprintbot_core::numeral::pluralize;
use sprintbot_core::text_stats::TextStats;

pub fn plural(count: u64, one: &str, few: &str, many: &str, json: bool) -> Result<()> {
    let form = pluralize(count, [one, few, many]);
    if json {
        println!("{}", serde_json::json!({ "count": count, "form": form }));
    } else {
        println!("{} {}", style(count).bold(), form);
    }
    Ok(())
}

pub fn word_count(text: &[String], json: bool) -> Result<()> {
    let stats = TextStats::of(&text.join(" "));
    if json {
        let counts = serde_json::json!({
            "words": stats.words,
            "characters": stats.characters,
            "letters": stats.letters,
        });
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    println!();
    for line in stats.render().lines() {
        println!("  {line}");
    }
    println!();
    Ok(())
}
