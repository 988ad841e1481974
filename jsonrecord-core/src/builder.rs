//! Direct construction of records from positional and keyword arguments.

use core::marker::PhantomData;

use crate::config::Config;
use crate::error::{Error, ErrorKind};
use crate::json::{Json, JsonMap};
use crate::record::Record;
use crate::undefined::{RawFields, Undefined};

/// Builds a record from constructor-style arguments, honoring the record's
/// undefined-parameter policy.
///
/// Positional arguments bind to the declared fields in order, skipping the
/// catch-all field under the `Include` policy. Keyword arguments bind by field
/// name. Arguments that bind to nothing are dropped (`Exclude`), collected
/// into the catch-all (`Include`, positional ones as `_UNKNOWN0`,
/// `_UNKNOWN1`, ...), or rejected.
///
/// ```
/// # use jsonrecord_core::*;
/// # fn build<R: Record>() -> Result<R, Error> {
/// RecordBuilder::<R>::new()
///     .arg("first field")
///     .kwarg("count", 3)
///     .build()
/// # }
/// ```
pub struct RecordBuilder<R> {
    config: Config,
    args: Vec<Json>,
    kwargs: Vec<(String, Json)>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Default for RecordBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordBuilder<R> {
    /// A builder using the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// A builder using `config` to decode argument values.
    pub fn with_config(config: Config) -> Self {
        RecordBuilder {
            config,
            args: Vec::new(),
            kwargs: Vec::new(),
            _record: PhantomData,
        }
    }

    /// Add a positional argument.
    pub fn arg(mut self, value: impl Into<Json>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Add a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Json>) -> Self {
        self.kwargs.push((name.into(), value.into()));
        self
    }

    /// Bind the arguments and build the record.
    pub fn build(self) -> Result<R, Error> {
        let resolved = self.config.resolved::<R>();
        let record = resolved.info.name;
        let policy = resolved.undefined();
        let catch_all = resolved.catch_all()?;

        let unexpected = |argument: String| {
            Error::new(ErrorKind::UnexpectedArgument { record, argument })
        };

        let mut known: Vec<Option<Json>> = vec![None; resolved.fields.len()];
        let mut unknown = JsonMap::new();
        let mut bound_by_keyword = 0;

        for (name, value) in self.kwargs {
            match resolved.info.field_index(&name) {
                Some(index) if known[index].is_some() => {
                    return Err(unexpected(name));
                }
                Some(index) => {
                    known[index] = Some(value);
                    if Some(index) != catch_all {
                        bound_by_keyword += 1;
                    }
                }
                None => match policy {
                    Some(Undefined::Include) | Some(Undefined::Exclude) => {
                        unknown.insert(name, value);
                    }
                    Some(Undefined::Raise) | None => return Err(unexpected(name)),
                },
            }
        }

        let bindable: Vec<usize> = (0..resolved.fields.len())
            .filter(|&i| Some(i) != catch_all)
            .collect();
        let takeable = bindable.len().saturating_sub(bound_by_keyword);

        let mut args = self.args.into_iter();
        for (&index, value) in bindable.iter().zip(args.by_ref().take(takeable)) {
            if known[index].is_some() {
                return Err(unexpected(resolved.fields[index].info.name.to_owned()));
            }
            known[index] = Some(value);
        }

        for (position, value) in args.enumerate() {
            match policy {
                Some(Undefined::Include) => {
                    unknown.insert(format!("_UNKNOWN{position}"), value);
                }
                Some(Undefined::Exclude) => {
                    crate::debug!("dropping positional argument {} of {}", position, record);
                }
                Some(Undefined::Raise) | None => {
                    return Err(unexpected(format!("#{}", takeable + position)));
                }
            }
        }

        let fields = RawFields::assemble(&resolved, &self.config, known, unknown, false)?;
        R::decode_fields(fields)
    }
}
