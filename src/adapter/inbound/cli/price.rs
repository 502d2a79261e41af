//! Handler for `price`.

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::output;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

#[derive(Tabled)]
struct QuoteRow {
    #[tabled(rename = "Feed")]
    feed: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "±")]
    confidence: String,
    #[tabled(rename = "Published")]
    published: String,
}

/// Shorten a feed id to its first and last four hex digits.
fn short_feed(hex: &str) -> String {
    if hex.len() <= 12 {
        return hex.to_string();
    }
    format!("{}…{}", &hex[..6], &hex[hex.len() - 4..])
}

/// Execute `price`.
pub async fn execute_price(config: &Config) -> Result<()> {
    let oracle = bootstrap::build_oracle(config);
    let feeds = config.oracle.feeds()?;

    let pb = output::spinner("Fetching prices");
    let quotes = match oracle.latest_prices(&feeds).await {
        Ok(quotes) => {
            pb.finish_and_clear();
            quotes
        }
        Err(e) => {
            output::spinner_fail(&pb, "Fetching prices");
            return Err(e.into());
        }
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "price",
            "oracle": oracle.oracle_name(),
            "quotes": quotes,
        }));
        return Ok(());
    }

    output::section(&format!("Prices ({})", oracle.oracle_name()));
    let rows: Vec<QuoteRow> = quotes
        .iter()
        .map(|quote| QuoteRow {
            feed: short_feed(&quote.feed_id.to_string()),
            price: quote.price.normalize().to_string(),
            confidence: quote.confidence.normalize().to_string(),
            published: quote.publish_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        })
        .collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    output::lines(&table);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_ids_are_shortened() {
        assert_eq!(
            short_feed("0xff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace"),
            "0xff61…0ace"
        );
        assert_eq!(short_feed("0xabc"), "0xabc");
    }
}
