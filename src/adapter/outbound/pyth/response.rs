//! Hermes `/v2/updates/price/latest` response types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::FeedId;
use crate::error::OracleError;
use crate::port::PriceQuote;

/// Top-level latest-updates response.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestUpdatesResponse {
    pub binary: BinaryUpdate,
    #[serde(default)]
    pub parsed: Vec<ParsedPriceUpdate>,
}

/// Encoded update payloads, one per accumulator message.
#[derive(Debug, Clone, Deserialize)]
pub struct BinaryUpdate {
    pub encoding: String,
    pub data: Vec<String>,
}

/// One decoded feed update.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedPriceUpdate {
    /// Feed id as bare hex.
    pub id: String,
    pub price: RawPrice,
}

/// Fixed-point price: `price * 10^expo`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPrice {
    pub price: String,
    pub conf: String,
    pub expo: i32,
    pub publish_time: i64,
}

impl LatestUpdatesResponse {
    /// Feed ids present in the parsed section.
    pub fn feed_ids(&self) -> Result<Vec<FeedId>, OracleError> {
        self.parsed
            .iter()
            .map(|update| {
                update
                    .id
                    .parse::<FeedId>()
                    .map_err(|e| OracleError::Malformed(e.to_string()))
            })
            .collect()
    }

    /// Fail if any requested feed is missing from the response.
    pub fn ensure_covers(&self, requested: &[FeedId]) -> Result<(), OracleError> {
        let present = self.feed_ids()?;
        match requested.iter().find(|feed| !present.contains(feed)) {
            Some(missing) => Err(OracleError::MissingFeed { feed_id: *missing }),
            None => Ok(()),
        }
    }

    /// Decode the binary payloads.
    pub fn decode_updates(&self) -> Result<Vec<Vec<u8>>, OracleError> {
        if !self.binary.encoding.eq_ignore_ascii_case("hex") {
            return Err(OracleError::Malformed(format!(
                "unsupported encoding '{}'",
                self.binary.encoding
            )));
        }
        let updates = self
            .binary
            .data
            .iter()
            .map(|blob| {
                let digits = blob.strip_prefix("0x").unwrap_or(blob);
                hex::decode(digits).map_err(|e| OracleError::Malformed(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if updates.is_empty() || updates.iter().all(Vec::is_empty) {
            return Err(OracleError::EmptyPayload);
        }
        Ok(updates)
    }

    /// Decode every parsed price into a quote.
    pub fn quotes(&self) -> Result<Vec<PriceQuote>, OracleError> {
        self.parsed.iter().map(ParsedPriceUpdate::to_quote).collect()
    }
}

impl ParsedPriceUpdate {
    fn to_quote(&self) -> Result<PriceQuote, OracleError> {
        let feed_id = self
            .id
            .parse::<FeedId>()
            .map_err(|e| OracleError::Malformed(e.to_string()))?;
        let price = scale(&self.price.price, self.price.expo)?;
        let confidence = scale(&self.price.conf, self.price.expo)?;
        let publish_time = DateTime::<Utc>::from_timestamp(self.price.publish_time, 0)
            .ok_or_else(|| {
                OracleError::Malformed(format!(
                    "publish_time {} out of range",
                    self.price.publish_time
                ))
            })?;

        Ok(PriceQuote {
            feed_id,
            price,
            confidence,
            publish_time,
        })
    }
}

fn scale(mantissa: &str, expo: i32) -> Result<Decimal, OracleError> {
    let malformed = || OracleError::Malformed(format!("price {mantissa}e{expo} out of range"));
    let value: i64 = mantissa
        .parse()
        .map_err(|_| OracleError::Malformed(format!("invalid price '{mantissa}'")))?;

    if expo <= 0 {
        let scale = expo.unsigned_abs();
        Decimal::try_from_i128_with_scale(i128::from(value), scale).map_err(|_| malformed())
    } else {
        let factor = 10i64.checked_pow(expo.unsigned_abs()).ok_or_else(malformed)?;
        Decimal::from(value)
            .checked_mul(Decimal::from(factor))
            .ok_or_else(malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ETH_USD: &str = "ff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace";

    fn sample() -> LatestUpdatesResponse {
        serde_json::from_value(serde_json::json!({
            "binary": { "encoding": "hex", "data": ["504e415501000000"] },
            "parsed": [{
                "id": ETH_USD,
                "price": { "price": "345012345678", "conf": "150000000", "expo": -8, "publish_time": 1_717_000_000 },
                "ema_price": { "price": "344900000000", "conf": "140000000", "expo": -8, "publish_time": 1_717_000_000 },
                "metadata": { "slot": 1, "proof_available_time": 1_717_000_001, "prev_publish_time": 1_716_999_999 }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn decodes_hex_payloads() {
        let updates = sample().decode_updates().unwrap();
        assert_eq!(updates, vec![vec![0x50, 0x4e, 0x41, 0x55, 0x01, 0x00, 0x00, 0x00]]);
    }

    #[test]
    fn parses_quotes_with_exponent() {
        let quotes = sample().quotes().unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].price, dec!(3450.12345678));
        assert_eq!(quotes[0].confidence, dec!(1.5));
        assert_eq!(quotes[0].publish_time.timestamp(), 1_717_000_000);
    }

    #[test]
    fn missing_feed_is_reported() {
        let other: FeedId = "e62df6c8b4a85fe1a67db44dc12de5db330f7ac66b72dc658afedf0f4a415b43"
            .parse()
            .unwrap();
        let requested = vec![ETH_USD.parse().unwrap(), other];
        assert_eq!(
            sample().ensure_covers(&requested),
            Err(OracleError::MissingFeed { feed_id: other })
        );
    }

    #[test]
    fn empty_payload_is_an_error() {
        let mut response = sample();
        response.binary.data.clear();
        assert_eq!(response.decode_updates(), Err(OracleError::EmptyPayload));
    }

    #[test]
    fn positive_exponent_scales_up() {
        assert_eq!(scale("12", 3).unwrap(), dec!(12000));
    }
}
