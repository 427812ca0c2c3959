//! Fetches one offer and a filtered offer list.
//!
//! Reads the endpoint and key from `AFFISE_ENDPOINT` and `AFFISE_API_KEY`.
//!
//! Run with: `AFFISE_API_KEY=... cargo run --example get_offer -- 1`

use affise::{Client, Context, Error, OfferListOpts};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("affise=debug,get_offer=info")),
        )
        .init();

    let endpoint = std::env::var("AFFISE_ENDPOINT")
        .unwrap_or_else(|_| "https://api-rocketcompany.affise.com".to_string());
    let api_key = std::env::var("AFFISE_API_KEY").unwrap_or_default();
    let id = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1);

    let client = Client::builder()
        .endpoint(endpoint)
        .api_key(api_key)
        .build()?;
    let ctx = Context::with_timeout(Duration::from_secs(15));

    println!("=== GET /offer/{} ===", id);
    match client.offers().get_by_id(&ctx, id).await {
        Ok(response) => {
            println!("Offer: {:?}", response.data);
            println!("Request latency: {:?}", response.latency);
        }
        Err(Error::HttpError { response }) => {
            println!("Rejected: {} {} -> {}", response.method, response.url, response.status);
            return Ok(());
        }
        Err(e) => return Err(e),
    }
    println!();

    println!("=== GET /offers ===");
    let opts = OfferListOpts {
        os: vec!["iOS".into()],
        limit: Some(5),
        ..Default::default()
    };
    let page = client.offers().list_page(&ctx, &opts).await?;
    for offer in &page.offers {
        println!("{:>8}  {}", offer.id, offer.offer_id);
    }
    if let Some(pagination) = &page.pagination {
        println!("More pages: {}", pagination.has_next());
    }

    Ok(())
}
