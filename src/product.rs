//! Product records – the read-only input of the layout engine.
//!
//! Records arrive from the calling layer (database rows, JSON payloads,
//! fixtures). Every optional field has a documented fallback so generation
//! stays robust against incomplete upstream data; the engine never rejects
//! a record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Fallback for a missing product name.
pub const NAME_FALLBACK: &str = "N/A";
/// Fallback for a missing description.
pub const DESCRIPTION_FALLBACK: &str = "Sin descripción";
/// Fallback for a missing image reference.
pub const IMAGE_FALLBACK: &str = "Sin imagen";

/// One catalog record. Field aliases accept the Spanish database column
/// names (`nombre`, `precio`, …) so raw rows deserialise directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default, alias = "descripcion")]
    pub description: Option<String>,
    #[serde(default, alias = "precio", deserialize_with = "tolerant_price")]
    pub price: Option<f64>,
    #[serde(default, alias = "imagen_url")]
    pub image_url: Option<String>,
    /// Carried through for the caller's benefit; not rendered.
    #[serde(default, alias = "creado_en")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(NAME_FALLBACK)
    }

    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or(DESCRIPTION_FALLBACK)
    }

    pub fn display_image(&self) -> &str {
        self.image_url.as_deref().unwrap_or(IMAGE_FALLBACK)
    }

    /// Price with a leading currency symbol and two decimals, `$0.00` when
    /// the field is absent or was non-numeric upstream.
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price.unwrap_or(0.0))
    }
}

/// Accepts a number, a numeric string (Postgres `NUMERIC` columns often
/// arrive as strings), or null. A non-numeric string degrades to `None`
/// with a warning instead of failing the whole generation.
fn tolerant_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Num(f64),
        Text(String),
    }

    Ok(match Option::<RawPrice>::deserialize(deserializer)? {
        None => None,
        Some(RawPrice::Num(v)) => Some(v),
        Some(RawPrice::Text(s)) => match s.trim().parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("ignoring non-numeric price {s:?}, using fallback");
                None
            }
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_from_number_and_string() {
        let p: Product = serde_json::from_str(r#"{"id":1,"price":19.5}"#).unwrap();
        assert_eq!(p.price, Some(19.5));

        let p: Product = serde_json::from_str(r#"{"id":2,"price":"24.99"}"#).unwrap();
        assert_eq!(p.price, Some(24.99));
    }

    #[test]
    fn non_numeric_price_falls_back() {
        let p: Product = serde_json::from_str(r#"{"id":3,"price":"gratis"}"#).unwrap();
        assert_eq!(p.price, None);
        assert_eq!(p.display_price(), "$0.00");
    }

    #[test]
    fn spanish_column_aliases() {
        let json = r#"{
            "id": 4,
            "nombre": "Café",
            "descripcion": "Tostado oscuro",
            "precio": "12.00",
            "imagen_url": "https://example.com/cafe.png"
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.display_name(), "Café");
        assert_eq!(p.display_price(), "$12.00");
    }

    #[test]
    fn missing_fields_use_documented_fallbacks() {
        let p: Product = serde_json::from_str(r#"{"id":5}"#).unwrap();
        assert_eq!(p.display_name(), "N/A");
        assert_eq!(p.display_description(), "Sin descripción");
        assert_eq!(p.display_image(), "Sin imagen");
        assert_eq!(p.display_price(), "$0.00");
    }
}
