//! Nominal subtype dispatch through a discriminator key.

use crate::codec::Codec;
use crate::config::Config;
use crate::error::{Error, ErrorKind};
use crate::hint::SubtypeDef;
use crate::json::Json;

/// Encode variant number `index` of `def`, which wraps `record`.
///
/// Every variant except the base gets the discriminator appended after its
/// fields.
pub fn encode_subtype<T: Codec>(
    def: &SubtypeDef,
    index: usize,
    record: &T,
    config: &Config,
) -> Result<Json, Error> {
    let encoded = record.encode(config)?;
    if Some(index) == def.base {
        return Ok(encoded);
    }
    let Some(variant) = def.variants.get(index) else {
        return Err(Error::invalid_value(format!(
            "{} has no variant number {index}",
            def.name
        )));
    };
    match encoded {
        Json::Object(mut object) => {
            object.insert(def.tag.to_owned(), Json::from(variant.discriminator));
            Ok(Json::Object(object))
        }
        other => Err(Error::invalid_type("object", &other)),
    }
}

/// Select the variant of `def` named by `value`'s discriminator.
///
/// Returns the variant index and the value with the discriminator removed.
/// A value without discriminator selects the base variant.
pub fn decode_subtype(def: &SubtypeDef, value: Json) -> Result<(usize, Json), Error> {
    let mut object = match value {
        Json::Object(object) => object,
        other => return Err(Error::invalid_type("object", &other)),
    };

    match object.shift_remove(def.tag) {
        Some(Json::String(tag)) => match def.position(&tag) {
            Some(index) => {
                crate::trace!("{} dispatches {:?} to variant {}", def.name, tag, index);
                Ok((index, Json::Object(object)))
            }
            None => Err(Error::new(ErrorKind::UnknownSubtype {
                name: def.name,
                tag: def.tag,
                value: tag,
                expected: def.discriminators().map(str::to_owned).collect(),
            })
            .at_field(def.tag)),
        },
        Some(other) => Err(Error::invalid_type("string", &other).at_field(def.tag)),
        None => match def.base {
            Some(base) => Ok((base, Json::Object(object))),
            None => Err(Error::new(ErrorKind::MissingDiscriminator {
                name: def.name,
                tag: def.tag,
            })),
        },
    }
}
