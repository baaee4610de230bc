use chrono::{Duration, Utc};
use lvmeteo::{LvMeteo, LvMeteoError, MeteoTable, TransportOptions};
use std::env;

#[tokio::main]
async fn main() -> Result<(), LvMeteoError> {
    configure_polars_display();
    let client = LvMeteo::with_options(TransportOptions::from_env()?);

    let parameters = ["HTDRY", "HATMN", "HATMX"];
    let stations = ["RIGASLU", "RIDM99MS", "RILP99PA"];
    let end = Utc::now();
    let start = end - Duration::days(30);

    println!("1. Meteorological archive data (AVG, MIN, MAX)");
    match client
        .series()
        .table(MeteoTable::METEO_ARCHIVE_AVG.table_name)
        .stations(stations)
        .parameters(parameters)
        .start(start)
        .end(end)
        .call()
        .await
    {
        Ok(series) => println!("{:?}\n{}", series.frame().shape(), series.frame().head(Some(5))),
        Err(e) => println!("   Error: {}", e),
    }

    println!("2. Meteorological stations");
    match client.meteo_stations().await {
        Ok(table) => println!(
            "   {} stations\n{}",
            table.height(),
            table
                .frame()
                .select(["name", "latitude", "longitude"])?
                .head(Some(5))
        ),
        Err(e) => println!("   Error: {}", e),
    }

    println!("3. Hydrological stations");
    match client.hydro_stations().await {
        Ok(table) => println!("   {} stations\n{}", table.height(), table.frame().head(Some(5))),
        Err(e) => println!("   Error: {}", e),
    }

    println!("4. Meteorological parameters");
    match client.meteo_params().await {
        Ok(table) => println!(
            "   {} parameters\n{}",
            table.height(),
            table
                .frame()
                .select(["param_id", "description_EN", "unit"])?
                .head(Some(5))
        ),
        Err(e) => println!("   Error: {}", e),
    }

    println!("5. Hydrological parameters");
    match client.hydro_params().await {
        Ok(table) => println!("   {} parameters\n{}", table.height(), table.frame().head(Some(5))),
        Err(e) => println!("   Error: {}", e),
    }

    println!("6. Weather phenomena");
    match client
        .series()
        .table(MeteoTable::WEATHER_PHENOMENA_ARCHIVE.table_name)
        .stations(stations)
        .parameters("PHENO")
        .start(start)
        .end(end)
        .call()
        .await
    {
        Ok(series) if series.is_empty() => println!("   No weather phenomena in this period."),
        Ok(series) => println!("{}", series.frame().head(Some(5))),
        Err(e) => println!("   Error: {}", e),
    }

    println!("7. Custom SQL");
    let sql = format!(
        r#"SELECT "ABBREVIATION", avg("VALUE") as avg_value, count(*) as count FROM "{}" GROUP BY "ABBREVIATION" ORDER BY count DESC LIMIT 10"#,
        MeteoTable::METEO_ARCHIVE.table_name
    );
    match client.sql().query(sql).call().await {
        Ok(table) => println!("{}", table.frame()),
        Err(e) => println!("   Error: {}", e),
    }

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
