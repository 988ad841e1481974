mod chrono;
mod indexmap;
mod rust_decimal;
mod serde_json;
mod uuid;
