//! Products: server-assigned identifiers and a CSV representation.

use crate::framework::{FormatError, Formatter, OperationKind, Resource};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PRODUCT_ID: AtomicU64 = AtomicU64::new(1);

/// Represents a product in the inventory.
///
/// Products created through collection-level POST get their id from
/// [`Resource::create_id`] (`product_1`, `product_2`, ...). The counter is
/// process-wide and never hands out the same number twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// Payload for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub quantity: u32,
}

/// Payload for updating a product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    #[error("Malformed product payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
        }
    }
}

fn check_price(price: f64) -> Result<(), ProductError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ProductError::InvalidPrice(price))
    }
}

impl Resource for Product {
    type Error = ProductError;

    fn instantiate(id: Option<&str>, payload: &Value) -> Result<Self, ProductError> {
        let params: ProductCreate = serde_json::from_value(payload.clone())?;
        check_price(params.price)?;
        Ok(Self::new(
            id.unwrap_or_default(),
            params.name,
            params.price,
            params.quantity,
        ))
    }

    fn edit(&mut self, payload: &Value) -> Result<(), ProductError> {
        let update: ProductUpdate = serde_json::from_value(payload.clone())?;
        if let Some(price) = update.price {
            check_price(price)?;
            self.price = price;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        Ok(())
    }

    fn create_id(&mut self) -> Option<String> {
        let n = NEXT_PRODUCT_ID.fetch_add(1, Ordering::SeqCst);
        self.id = format!("product_{n}");
        Some(self.id.clone())
    }
}

/// `csv` representation for products.
///
/// Reads render one line, `id,name,price,quantity`. Writes take
/// `name,price,quantity` (for a single product) or a mapping from id to such a
/// line (for a whole-collection replace).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductCsvFormatter;

impl ProductCsvFormatter {
    pub const FORMAT: &'static str = "csv";

    fn parse_line(line: &str) -> Result<Value, FormatError> {
        let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        let [name, price, quantity] = fields.as_slice() else {
            return Err(FormatError::new(
                Self::FORMAT,
                format!("expected name,price,quantity, got {line:?}"),
            ));
        };
        let price: f64 = price
            .parse()
            .map_err(|_| FormatError::new(Self::FORMAT, format!("bad price {price:?}")))?;
        let quantity: u32 = quantity
            .parse()
            .map_err(|_| FormatError::new(Self::FORMAT, format!("bad quantity {quantity:?}")))?;
        Ok(json!({ "name": name, "price": price, "quantity": quantity }))
    }
}

impl Formatter<Product> for ProductCsvFormatter {
    fn supports(&self, _kind: OperationKind, format: &str) -> bool {
        format == Self::FORMAT
    }

    fn encode(&self, _format: &str, product: &Product) -> Result<Value, FormatError> {
        Ok(Value::String(format!(
            "{},{},{},{}",
            product.id, product.name, product.price, product.quantity
        )))
    }

    fn decode(&self, _format: &str, payload: Value) -> Result<Value, FormatError> {
        match payload {
            Value::String(line) => Self::parse_line(&line),
            Value::Object(lines) => lines
                .into_iter()
                .map(|(id, line)| match line {
                    Value::String(line) => Ok((id, Self::parse_line(&line)?)),
                    other => Err(FormatError::new(
                        Self::FORMAT,
                        format!("expected a csv line for {id}, got {other}"),
                    )),
                })
                .collect::<Result<serde_json::Map<_, _>, _>>()
                .map(Value::Object),
            other => Err(FormatError::new(
                Self::FORMAT,
                format!("expected csv text, got {other}"),
            )),
        }
    }
}
