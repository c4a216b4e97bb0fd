use anyhow::Result;

use skrytki_core::schema::Pool;
use skrytki_etl::Config;
use skrytki_search::LookupService;

fn service(config: &Config) -> LookupService {
    LookupService::new(Pool::new(&config.database_path, 1), config.request_timeout())
}

pub async fn run_search(
    config: &Config,
    text: &str,
    offices_only: bool,
    limit: usize,
    json: bool,
) -> Result<()> {
    let hits = service(config).search(text, offices_only, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results for {text:?}");
        return Ok(());
    }

    for hit in &hits {
        println!("[{}] {}", hit.id, hit.nazwa);
        println!("    REGON:   {}", hit.regon);
        println!("    Adres:   {}", hit.adres);
        println!("    Skrytka: {}", hit.skrytka.as_deref().unwrap_or("-"));
    }
    println!("\n{} result(s)", hits.len());

    Ok(())
}

pub async fn run_uris(config: &Config, id: &str, json: bool) -> Result<()> {
    let records = service(config).get_addresses(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("No addresses for entity {id}");
    } else {
        for record in &records {
            println!("{}", record.skrytka);
        }
    }

    Ok(())
}
