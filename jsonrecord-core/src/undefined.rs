//! Undefined-parameter policies and the collect phase of record decoding.

use core::fmt;

use crate::codec::Codec;
use crate::config::Config;
use crate::error::{Error, ErrorKind, UndefinedProblem, suggest};
use crate::json::{Json, JsonMap};
use crate::overrides::{ResolvedField, ResolvedRecord};

/// Type of a catch-all field: the undefined parameters of a decoded record.
pub type CatchAll = Option<JsonMap>;

/// What happens to input keys that match no declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Undefined {
    /// Drop them
    Exclude,
    /// Fail
    Raise,
    /// Keep them in the record's catch-all field
    Include,
}

impl Undefined {
    /// Parse an attribute spelling, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "exclude" | "ignore" => Some(Undefined::Exclude),
            "raise" => Some(Undefined::Raise),
            "include" => Some(Undefined::Include),
            _ => None,
        }
    }
}

impl fmt::Display for Undefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Undefined::Exclude => "exclude",
            Undefined::Raise => "raise",
            Undefined::Include => "include",
        })
    }
}

/// Collected value of one field.
#[derive(Debug)]
pub enum Slot {
    /// A JSON value to decode
    Value(Json),
    /// Use the field's declared default
    Default,
    /// Already handed to the record
    Taken,
}

/// Field values collected from the input, waiting to be decoded into a record.
///
/// Produced by decoding an object ([`RawFields::collect`]) or by binding
/// constructor arguments ([`crate::RecordBuilder`]); consumed by
/// [`crate::Record::decode_fields`].
pub struct RawFields<'a> {
    resolved: &'a ResolvedRecord,
    config: &'a Config,
    slots: Vec<Slot>,
}

impl<'a> RawFields<'a> {
    /// Split an input object into declared fields and undefined parameters,
    /// apply the record's policy, and fill absent fields.
    pub fn collect(
        resolved: &'a ResolvedRecord,
        value: Json,
        config: &'a Config,
    ) -> Result<Self, Error> {
        let object = match value {
            Json::Object(object) => object,
            Json::Null if config.infer_missing => JsonMap::new(),
            other => return Err(Error::invalid_type("object", &other)),
        };

        let mut known: Vec<Option<Json>> = vec![None; resolved.fields.len()];
        let mut unknown = JsonMap::new();
        for (key, value) in object {
            match resolved.position(&key) {
                Some(index) => {
                    let field = &resolved.fields[index];
                    if field.wire_name == key || known[index].is_none() {
                        known[index] = Some(value);
                    }
                }
                None => {
                    unknown.insert(key, value);
                }
            }
        }

        Self::assemble(resolved, config, known, unknown, config.infer_missing)
    }

    pub(crate) fn assemble(
        resolved: &'a ResolvedRecord,
        config: &'a Config,
        mut known: Vec<Option<Json>>,
        mut unknown: JsonMap,
        infer_missing: bool,
    ) -> Result<Self, Error> {
        let record = resolved.info.name;
        let catch_all = resolved.catch_all()?;

        match resolved.undefined() {
            None | Some(Undefined::Exclude) => {
                if !unknown.is_empty() {
                    crate::debug!(
                        "dropping undefined parameters {:?} of {}",
                        unknown.keys().collect::<Vec<_>>(),
                        record
                    );
                }
                unknown.clear();
            }
            Some(Undefined::Raise) => {
                if let Some(first) = unknown.keys().next() {
                    let wire_names = resolved.fields.iter().map(|f| f.wire_name.as_str());
                    let suggestion = suggest(first, wire_names).map(str::to_owned);
                    return Err(Error::new(ErrorKind::UndefinedParameter(
                        UndefinedProblem::UnknownKeys {
                            record,
                            keys: unknown.keys().cloned().collect(),
                            suggestion,
                        },
                    )));
                }
            }
            Some(Undefined::Include) => {}
        }

        let mut slots = Vec::with_capacity(resolved.fields.len());
        for (index, field) in resolved.fields.iter().enumerate() {
            let given = known[index].take();

            if Some(index) == catch_all {
                let extra = core::mem::take(&mut unknown);
                slots.push(catch_all_slot(resolved, field, given, extra, config)?);
                continue;
            }

            let slot = match given {
                Some(Json::Null) if !field.info.hint().accepts_null() => {
                    tracing::warn!(
                        record,
                        field = field.info.name,
                        "value present as null but declared non-optional"
                    );
                    if field.info.has_default() {
                        Slot::Default
                    } else {
                        Slot::Value(Json::Null)
                    }
                }
                Some(value) => Slot::Value(value),
                None if field.info.has_default() => Slot::Default,
                None if infer_missing => {
                    if !field.info.hint().accepts_null() {
                        tracing::warn!(
                            record,
                            field = field.info.name,
                            "missing value of non-optional field inferred as null"
                        );
                    }
                    Slot::Value(Json::Null)
                }
                None => {
                    return Err(Error::new(ErrorKind::MissingField {
                        record,
                        field: field.wire_name.clone(),
                    }));
                }
            };
            slots.push(slot);
        }

        Ok(RawFields {
            resolved,
            config,
            slots,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        self.config
    }

    /// Decode field number `index`, which has no default.
    pub fn take<T: Codec>(&mut self, index: usize) -> Result<T, Error> {
        let (field, slot) = self.slot(index)?;
        match slot {
            Slot::Value(value) => decode_field(field, value, self.config),
            Slot::Default | Slot::Taken => Err(Error::new(ErrorKind::MissingField {
                record: self.resolved.info.name,
                field: field.wire_name.clone(),
            })),
        }
    }

    /// Decode field number `index`, falling back to `default`.
    pub fn take_or<T: Codec>(
        &mut self,
        index: usize,
        default: impl FnOnce() -> T,
    ) -> Result<T, Error> {
        let (field, slot) = self.slot(index)?;
        match slot {
            Slot::Value(value) => decode_field(field, value, self.config),
            Slot::Default | Slot::Taken => Ok(default()),
        }
    }

    fn slot(&mut self, index: usize) -> Result<(&'a ResolvedField, Slot), Error> {
        let resolved = self.resolved;
        match (resolved.fields.get(index), self.slots.get_mut(index)) {
            (Some(field), Some(slot)) => Ok((field, core::mem::replace(slot, Slot::Taken))),
            _ => Err(Error::invalid_value(format!(
                "{} has no field number {index}",
                resolved.info.name
            ))),
        }
    }
}

fn decode_field<T: Codec>(field: &ResolvedField, value: Json, config: &Config) -> Result<T, Error> {
    match &field.overrides.decoder {
        Some(decoder) => decoder.decode::<T>(value, config),
        None => T::decode(value, config),
    }
    .map_err(|e| e.at_field(&field.wire_name))
}

/// Slot of the catch-all field.
///
/// Undefined parameters replace a value equal to the field's default, are
/// merged into an object value, and conflict with anything else.
fn catch_all_slot(
    resolved: &ResolvedRecord,
    field: &ResolvedField,
    given: Option<Json>,
    extra: JsonMap,
    config: &Config,
) -> Result<Slot, Error> {
    let Some(given) = given else {
        return Ok(Slot::Value(Json::Object(extra)));
    };

    let default = match field.info.encoded_default(config) {
        Some(encoded) => Some(encoded?),
        None => None,
    };
    let received_default = default.as_ref() == Some(&given);

    match given {
        _ if received_default && extra.is_empty() => Ok(Slot::Default),
        _ if received_default => Ok(Slot::Value(Json::Object(extra))),
        Json::Object(mut object) => {
            object.extend(extra);
            Ok(Slot::Value(Json::Object(object)))
        }
        _ => Err(Error::new(ErrorKind::UndefinedParameter(
            UndefinedProblem::CatchAllConflict {
                record: resolved.info.name,
                field: field.info.name,
            },
        ))),
    }
}
