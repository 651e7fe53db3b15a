use super::CommandResult;

/// Print the first record of `table` whose `property` equals `name`.
pub async fn run(table: &str, name: &str, property: &str) -> CommandResult {
    let (_, client) = super::connect().await?;
    match client.get_by(table, property, name).await? {
        Some(page) => println!("{}", serde_json::to_string_pretty(&page)?),
        None => println!("not found"),
    }
    Ok(())
}
