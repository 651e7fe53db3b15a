use super::CommandResult;

pub async fn run(json: bool) -> CommandResult {
    let (_, client) = super::connect().await?;
    let catalog = client.catalog();

    if json {
        let map: serde_json::Map<String, serde_json::Value> = catalog
            .iter()
            .map(|(name, id)| (name.to_string(), serde_json::Value::String(id.to_string())))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else if catalog.is_empty() {
        println!("No databases shared with this integration.");
    } else {
        for (name, id) in catalog.iter() {
            println!("{name}\t{id}");
        }
    }
    Ok(())
}
