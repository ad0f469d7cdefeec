#![doc = include_str!("../README.md")]

pub mod decode;
pub mod encode;
pub mod error;
pub mod options;
pub mod value;

pub use crate::decode::parser::{Parser, parse_lines, parse_str};
pub use crate::error::{Error, Result};
pub use crate::options::Options;
pub use crate::value::DocValue;

use std::io::Read;
#[cfg(feature = "json")]
use std::io::Write;

#[cfg(feature = "json")]
use serde::{Serialize, de::DeserializeOwned};

pub fn parse_from_reader<R: Read>(mut reader: R, options: &Options) -> Result<DocValue> {
    let mut s = String::new();
    reader.read_to_string(&mut s)?;
    Ok(parse_str(&s, options))
}

pub fn encode_value_to_string(value: &DocValue, options: &Options) -> Result<String> {
    crate::encode::encode_value_to_string(value, options)
}

#[cfg(feature = "json")]
pub fn encode_to_string<T: Serialize>(value: &T, options: &Options) -> Result<String> {
    let json = serde_json::to_value(value)?;
    let doc = DocValue::try_from(json)?;
    encode_value_to_string(&doc, options)
}

#[cfg(feature = "json")]
pub fn encode_to_writer<W: Write, T: Serialize>(mut writer: W, value: &T, options: &Options) -> Result<()> {
    let s = encode_to_string(value, options)?;
    writer.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(feature = "json")]
pub fn decode_from_str<T: DeserializeOwned>(s: &str, options: &Options) -> Result<T> {
    let v = parse_str(s, options).to_json();
    let t = serde_json::from_value(v)?;
    Ok(t)
}

#[cfg(feature = "json")]
pub fn decode_from_reader<R: Read, T: DeserializeOwned>(mut reader: R, options: &Options) -> Result<T> {
    let mut s = String::new();
    reader.read_to_string(&mut s)?;
    decode_from_str(&s, options)
}
