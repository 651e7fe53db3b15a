use daybook_core::notion::filter::{filter, Condition, FilterType};

use super::CommandResult;

/// Run a single-property filter against `table` and print the matches.
pub async fn run(
    table: &str,
    property: &str,
    filter_type: &str,
    condition: &str,
    value: Option<&str>,
    limit: Option<u32>,
    json: bool,
) -> CommandResult {
    let filter_type: FilterType = filter_type.parse()?;
    let condition: Condition = condition.parse()?;
    let expr = filter(property, filter_type, condition, parse_value(value))?;

    let (_, client) = super::connect().await?;
    let pages = client.query(table, &expr, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&pages)?);
    } else if pages.is_empty() {
        println!("No records found.");
    } else {
        for page in &pages {
            println!("{}\t{}", page.id, page.title().unwrap_or_default());
        }
    }
    Ok(())
}

/// JSON literals (numbers, booleans) pass through; anything else is a
/// string. No value means `true`, as taken by `is_empty`/`is_not_empty`.
fn parse_value(value: Option<&str>) -> serde_json::Value {
    match value {
        None => serde_json::Value::Bool(true),
        Some(raw) => match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(v @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) => v,
            _ => serde_json::Value::String(raw.to_string()),
        },
    }
}
