//! services/api/src/bin/openapi.rs
//!
//! Dumps the Nestuity API document (reminders, sizes, usage and prices) as
//! pretty JSON. The output path is the first argument, `openapi.json` otherwise.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

/// Serializes `api_doc` and writes it to `path`.
fn generate_spec(
    api_doc: utoipa::openapi::OpenApi,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec_json = api_doc.to_pretty_json()?;
    std::fs::write(path, spec_json)?;
    println!("Wrote API document to {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "openapi.json".to_string());
    generate_spec(ApiDoc::openapi(), &path)?;
    Ok(())
}
