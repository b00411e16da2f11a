use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use tracing::{debug, info, trace};

use crate::env::EnvSource;
use crate::error::Error;
use crate::model::{EnvStruct, Field, LoadReport};
use crate::parser::FromEnvStr;

/// Populate `target` from the process environment.
pub fn load<T: EnvStruct + ?Sized>(target: &mut T) -> Result<LoadReport, Error> {
    Loader::new().load(target)
}

/// Populate an optional target from the process environment.
///
/// `None` fails with [`Error::InvalidTarget`].
pub fn load_opt(target: Option<&mut dyn EnvStruct>) -> Result<LoadReport, Error> {
    Loader::new().load_opt(target)
}

/// Builder-style typed environment reader.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    source: EnvSource,
    debug: bool,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: EnvSource) -> Self {
        self.source = source;
        self
    }

    /// Report fallback substitutions at `info` instead of `debug` level.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Read `key` and parse it as `T`.
    ///
    /// Fails with [`Error::NotFound`] when the variable is unset or empty and
    /// with [`Error::InvalidFormat`] when its text does not parse.
    pub fn try_get<T: FromEnvStr>(&self, key: &str) -> Result<T, Error> {
        let raw = self.source.lookup(key).ok_or_else(|| Error::not_found(key))?;
        T::from_env_str(&raw).map_err(|source| Error::InvalidFormat {
            key: key.to_owned(),
            value: raw,
            kind: T::KIND,
            source,
        })
    }

    /// Like [`Loader::try_get`], returning `fallback` on any failure.
    pub fn get<T: FromEnvStr>(&self, key: &str, fallback: T) -> T {
        self.try_get(key).unwrap_or(fallback)
    }

    /// Like [`Loader::try_get`], panicking on any failure.
    ///
    /// The panic message is the rendered [`Error`], with the key, the raw
    /// value and the parser diagnostic. Use [`Loader::try_get`] to get the
    /// error as a value.
    #[track_caller]
    pub fn must_get<T: FromEnvStr>(&self, key: &str) -> T {
        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(key, error = %err, "required environment variable is unusable");
                panic!("{err}")
            }
        }
    }

    /// Populate the tagged, settable fields of `target`.
    ///
    /// Stops at the first failing field; fields before it stay populated.
    pub fn load<T: EnvStruct + ?Sized>(&self, target: &mut T) -> Result<LoadReport, Error> {
        let mut fields = target.fields();
        check_shape(&fields)?;

        let mut report = LoadReport::default();
        for field in &mut fields {
            let Some(key) = field.eligible_key() else {
                debug!(field = field.name(), "skipping field");
                report.skipped += 1;
                continue;
            };

            match self.load_field(field, key)? {
                Origin::Environment => report.populated += 1,
                Origin::Fallback => report.from_fallback += 1,
            }
        }

        debug!(
            populated = report.populated,
            from_fallback = report.from_fallback,
            skipped = report.skipped,
            "loaded struct from environment"
        );
        Ok(report)
    }

    /// Like [`Loader::load`], for a target that may be absent.
    pub fn load_opt(&self, target: Option<&mut dyn EnvStruct>) -> Result<LoadReport, Error> {
        let Some(target) = target else {
            return Err(Error::InvalidTarget {
                reason: "target is None".to_owned(),
            });
        };
        self.load(target)
    }

    fn load_field(&self, field: &mut Field<'_>, key: &str) -> Result<Origin, Error> {
        let name = field.name();
        let fallback = field.usable_fallback();
        let type_name = field.type_name();
        let slot = field.slot_mut();

        macro_rules! dispatch {
            ($($ty:ty),* $(,)?) => {
                $(
                    if let Some(slot) = slot.downcast_mut::<$ty>() {
                        return self.assign(slot, name, key, fallback);
                    }
                )*
            };
        }

        // Durations have their own arms, so integer-shaped durations never
        // hit the integer parser.
        dispatch!(
            String,
            i8,
            i16,
            i32,
            i64,
            i128,
            isize,
            u8,
            u16,
            u32,
            u64,
            u128,
            usize,
            f32,
            f64,
            bool,
            Duration,
            TimeDelta,
            DateTime<FixedOffset>,
            DateTime<Utc>,
        );

        Err(Error::UnsupportedType {
            field: name.to_owned(),
            type_name,
        })
    }

    fn assign<T: FromEnvStr>(
        &self,
        slot: &mut T,
        field: &str,
        key: &str,
        fallback: Option<&str>,
    ) -> Result<Origin, Error> {
        let err = match self.try_get::<T>(key) {
            Ok(value) => {
                *slot = value;
                trace!(field, key, "populated field from environment");
                return Ok(Origin::Environment);
            }
            Err(err) => err,
        };

        let Some(literal) = fallback else {
            return Err(err.in_field(field));
        };

        *slot = T::from_env_str(literal).map_err(|source| Error::InvalidFallback {
            field: field.to_owned(),
            value: literal.to_owned(),
            kind: T::KIND,
            source,
        })?;

        if self.debug {
            info!(field, key, reason = %err, "using fallback value");
        } else {
            debug!(field, key, reason = %err, "using fallback value");
        }
        Ok(Origin::Fallback)
    }
}

enum Origin {
    Environment,
    Fallback,
}

fn check_shape(fields: &[Field<'_>]) -> Result<(), Error> {
    let mut seen = BTreeSet::new();
    for field in fields {
        if !seen.insert(field.name()) {
            return Err(Error::InvalidTarget {
                reason: format!("field {} is described more than once", field.name()),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::error::ErrorKind;

    #[derive(Debug, Default)]
    struct Settings {
        name: String,
        port: i32,
        ratio: f32,
        timeout: Duration,
        hidden: String,
        notes: String,
    }

    impl EnvStruct for Settings {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("name", &mut self.name).key("S_NAME"),
                Field::new("port", &mut self.port).key("S_PORT").fallback("3000"),
                Field::new("ratio", &mut self.ratio).key("S_RATIO").fallback("0.5"),
                Field::new("timeout", &mut self.timeout)
                    .key("S_TIMEOUT")
                    .fallback("5s"),
                Field::new("hidden", &mut self.hidden)
                    .key("S_HIDDEN")
                    .settable(false),
                Field::new("notes", &mut self.notes),
            ]
        }
    }

    fn loader(vars: &[(&str, &str)]) -> Loader {
        let map: BTreeMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Loader::new().source(EnvSource::from_memory(map))
    }

    #[test]
    fn populates_from_source_and_fallbacks() {
        let loader = loader(&[("S_NAME", "svc"), ("S_RATIO", "0.25"), ("S_HIDDEN", "x")]);
        let mut settings = Settings::default();

        let report = loader.load(&mut settings).expect("load should succeed");

        assert_eq!(settings.name, "svc");
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.ratio, 0.25);
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.hidden, "");
        assert_eq!(settings.notes, "");
        assert_eq!(
            report,
            LoadReport {
                populated: 2,
                from_fallback: 2,
                skipped: 2,
            }
        );
    }

    #[test]
    fn malformed_value_falls_back() {
        let loader = loader(&[("S_NAME", "svc"), ("S_PORT", "eighty")]);
        let mut settings = Settings::default();

        loader.load(&mut settings).expect("load should succeed");

        assert_eq!(settings.port, 3000);
    }

    #[test]
    fn missing_required_field_is_wrapped_with_field_name() {
        let loader = loader(&[("S_PORT", "1")]);
        let mut settings = Settings::default();

        let err = loader.load(&mut settings).expect_err("name is required");

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.field(), Some("name"));
        assert_eq!(settings.port, 0, "fields after the failure stay untouched");
    }

    #[test]
    fn duplicate_field_descriptors_are_an_invalid_target() {
        struct Twice {
            value: String,
            other: String,
        }

        impl EnvStruct for Twice {
            fn fields(&mut self) -> Vec<Field<'_>> {
                vec![
                    Field::new("value", &mut self.value).key("A"),
                    Field::new("value", &mut self.other).key("B"),
                ]
            }
        }

        let loader = loader(&[("A", "a"), ("B", "b")]);
        let mut twice = Twice {
            value: String::new(),
            other: String::new(),
        };

        let err = loader.load(&mut twice).expect_err("duplicate names");

        assert_eq!(err.kind(), ErrorKind::InvalidTarget);
        assert_eq!(twice.value, "");
    }

    #[test]
    fn unsupported_type_names_the_field() {
        struct Lists {
            hosts: Vec<String>,
        }

        impl EnvStruct for Lists {
            fn fields(&mut self) -> Vec<Field<'_>> {
                vec![Field::new("hosts", &mut self.hosts).key("HOSTS")]
            }
        }

        let loader = loader(&[("HOSTS", "a,b")]);
        let mut lists = Lists { hosts: Vec::new() };

        let err = loader.load(&mut lists).expect_err("vec is unsupported");

        match err {
            Error::UnsupportedType { field, type_name } => {
                assert_eq!(field, "hosts");
                assert!(type_name.contains("Vec"), "{type_name}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_fallback_is_treated_as_absent() {
        struct Empty {
            port: i64,
        }

        impl EnvStruct for Empty {
            fn fields(&mut self) -> Vec<Field<'_>> {
                vec![Field::new("port", &mut self.port).key("PORT").fallback("")]
            }
        }

        let mut empty = Empty { port: 0 };
        let err = loader(&[]).load(&mut empty).expect_err("no usable fallback");

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn must_get_panics_with_rendered_error() {
        let loader = loader(&[("LIMIT", "lots")]);

        let missing = std::panic::catch_unwind(|| loader.must_get::<i64>("REQUIRED_LIMIT"))
            .expect_err("unset variable should panic");
        let message = missing
            .downcast_ref::<String>()
            .expect("panic message should be a string");
        assert_eq!(
            message,
            &loader.try_get::<i64>("REQUIRED_LIMIT").unwrap_err().to_string()
        );
        assert!(message.contains("REQUIRED_LIMIT"), "{message}");

        let malformed = std::panic::catch_unwind(|| loader.must_get::<i64>("LIMIT"))
            .expect_err("malformed variable should panic");
        let message = malformed
            .downcast_ref::<String>()
            .expect("panic message should be a string");
        assert!(message.contains("LIMIT"), "{message}");
        assert!(message.contains("\"lots\""), "{message}");
        assert!(message.contains("invalid digit"), "{message}");
    }

    #[test]
    fn signed_durations_accept_negative_literals() {
        struct Skew {
            skew: TimeDelta,
            grace: TimeDelta,
        }

        impl EnvStruct for Skew {
            fn fields(&mut self) -> Vec<Field<'_>> {
                vec![
                    Field::new("skew", &mut self.skew).key("CLOCK_SKEW"),
                    Field::new("grace", &mut self.grace)
                        .key("CLOCK_GRACE")
                        .fallback("-250ms"),
                ]
            }
        }

        let mut skew = Skew {
            skew: TimeDelta::zero(),
            grace: TimeDelta::zero(),
        };
        loader(&[("CLOCK_SKEW", "-1h30m")])
            .load(&mut skew)
            .expect("load should succeed");

        assert_eq!(skew.skew, TimeDelta::minutes(-90));
        assert_eq!(skew.grace, TimeDelta::milliseconds(-250));
    }

    #[test]
    fn try_get_reports_kind_key_and_raw_value() {
        let loader = loader(&[("RATE", "fast")]);

        let err = loader.try_get::<f64>("RATE").expect_err("not a float");

        match err {
            Error::InvalidFormat {
                key, value, kind, ..
            } => {
                assert_eq!(key, "RATE");
                assert_eq!(value, "fast");
                assert_eq!(kind, "f64");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
