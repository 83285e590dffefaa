use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;
use crate::types::{CutRequirement, OrderInput};

/// Accepted layouts of a requirements document: a full order object, or a
/// bare array of requirement lines with default parameters.
#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Order(OrderInput),
    Lines(Vec<CutRequirement>),
}

impl From<Document> for OrderInput {
    fn from(doc: Document) -> Self {
        match doc {
            Document::Order(order) => order,
            Document::Lines(requirements) => OrderInput {
                requirements,
                ..OrderInput::default()
            },
        }
    }
}

pub fn parse_order(text: &str) -> Result<OrderInput, LoadError> {
    let doc: Document = serde_json::from_str(text)?;
    Ok(doc.into())
}

pub fn load_order(path: &Path) -> Result<OrderInput, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Document = serde_json::from_reader(BufReader::new(file))?;
    Ok(doc.into())
}
