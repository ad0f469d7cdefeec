//! Encoding pipeline: `DocValue` back to ArchieML text.

pub mod encoders;
pub mod writer;

use crate::{Result, options::Options, value::DocValue};

pub fn encode_value_to_string(value: &DocValue, options: &Options) -> Result<String> {
    let mut w = writer::LineWriter::new();
    encoders::encode_document(value, &mut w, options)?;
    Ok(w.into_string())
}
