//! Option-word codec
//!
//! Packs named field values into 32-bit option words and unpacks raw
//! words back into named values, driven entirely by a [`Schema`].
//! Either direction fully succeeds or fails without partial output.

use crate::error::{Error, Result};
use crate::schema::Schema;

/// One named field value of a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    /// Field name, matching a schema field
    pub name: String,
    /// Field value
    pub value: u32,
}

impl Setting {
    /// Convenience constructor
    pub fn new(name: impl Into<String>, value: u32) -> Self {
        Setting {
            name: name.into(),
            value,
        }
    }
}

/// Unpack option words into named field values
///
/// Only the fields of the supplied words are produced; constant fields
/// (tags, reserved bits) are skipped since their value is dictated by
/// the schema. Word counts outside the schema's accepted range fail
/// with [`Error::WordCountMismatch`].
pub fn decode(schema: &Schema, words: &[u32]) -> Result<Vec<Setting>> {
    check_word_count(schema, words.len())?;

    let mut settings = Vec::new();
    for (idx, word) in words.iter().enumerate() {
        for field in schema.words[idx] {
            if field.constant {
                continue;
            }
            settings.push(Setting::new(field.name, field.extract(*word)));
        }
    }
    Ok(settings)
}

/// Pack named field values into option words
///
/// Every value is validated against its field's domain before anything
/// is written. Constant fields are always written with their fixed
/// value; user-supplied values for them are ignored. An optional
/// trailing word is emitted only when at least one of its non-constant
/// fields is present in `settings`; the schema's size field (explicit
/// or default) bounds which trailing words may be populated and which
/// required fields are enforced.
pub fn encode(schema: &Schema, settings: &[Setting]) -> Result<Vec<u32>> {
    // Reject unknown and out-of-domain settings up front, so a failed
    // encode leaves no partial result behind.
    for setting in settings {
        let field = schema.field(&setting.name).ok_or_else(|| {
            Error::ConfigFormat(format!(
                "unknown setting '{}' for {}",
                setting.name, schema.peripheral
            ))
        })?;
        if field.constant {
            continue;
        }
        if setting.value > field.mask() || !field.domain.contains(setting.value) {
            return Err(Error::FieldValueOutOfRange {
                field: setting.name.clone(),
                value: setting.value,
                allowed: field.domain.to_string(),
            });
        }
    }

    let claimed_words = claimed_word_count(schema, settings);
    for setting in settings {
        if let Some(field) = schema.field(&setting.name) {
            if !field.constant && field.word >= claimed_words {
                return Err(Error::ConfigFormat(format!(
                    "setting '{}' lives in option word {} but {} declares {} word(s)",
                    setting.name,
                    field.word,
                    schema.size_field.unwrap_or("the word count"),
                    claimed_words
                )));
            }
        }
    }
    for word in schema.words.iter().take(claimed_words) {
        for field in word.iter() {
            if !field.constant
                && field.default.is_none()
                && lookup(settings, field.name).is_none()
            {
                return Err(Error::MissingField {
                    field: field.name,
                    peripheral: schema.peripheral,
                });
            }
        }
    }

    let word_count = schema
        .words
        .iter()
        .enumerate()
        .filter(|(idx, fields)| {
            *idx < schema.min_words
                || fields
                    .iter()
                    .any(|f| !f.constant && lookup(settings, f.name).is_some())
        })
        .map(|(idx, _)| idx + 1)
        .max()
        .unwrap_or(schema.min_words);

    let mut words = vec![0u32; word_count];
    for (idx, word) in words.iter_mut().enumerate() {
        for field in schema.words[idx] {
            let value = if field.constant {
                field.default.unwrap_or(0)
            } else {
                match lookup(settings, field.name).or(field.default) {
                    Some(value) => value,
                    None => {
                        return Err(Error::MissingField {
                            field: field.name,
                            peripheral: schema.peripheral,
                        })
                    }
                }
            };
            *word |= (value & field.mask()) << field.offset;
        }
    }
    Ok(words)
}

/// Number of words the schema's size field (explicit setting or field
/// default) claims the encoded stream to have
fn claimed_word_count(schema: &Schema, settings: &[Setting]) -> usize {
    let extra = schema
        .size_field
        .and_then(|name| schema.field(name))
        .map(|f| lookup(settings, f.name).or(f.default).unwrap_or(0) as usize)
        .unwrap_or(0);
    (schema.min_words + extra).min(schema.max_words())
}

fn check_word_count(schema: &Schema, actual: usize) -> Result<()> {
    if actual < schema.min_words || actual > schema.max_words() {
        return Err(Error::WordCountMismatch {
            peripheral: schema.peripheral,
            min: schema.min_words,
            max: schema.max_words(),
            actual,
        });
    }
    Ok(())
}

fn lookup(settings: &[Setting], name: &str) -> Option<u32> {
    settings.iter().find(|s| s.name == name).map(|s| s.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{presets_for, Peripheral};
    use crate::schema::for_peripheral;

    #[test]
    fn decode_quad_spi_nor_word() {
        let schema = for_peripheral(Peripheral::FlexspiNor);
        let settings = decode(schema, &[0xC000_0207]).unwrap();
        assert_eq!(lookup(&settings, "quad_mode_setting"), Some(2));
        assert_eq!(lookup(&settings, "max_freq"), Some(7));
        assert_eq!(lookup(&settings, "option_size"), Some(0));
        // constants are not surfaced
        assert_eq!(lookup(&settings, "tag"), None);
        // one word supplied, so no word-1 fields
        assert_eq!(lookup(&settings, "dummy_cycles"), None);
    }

    #[test]
    fn decode_two_word_layout() {
        let schema = for_peripheral(Peripheral::FlexspiNand);
        let settings = decode(schema, &[0xC101_0026, 0x0000_00EF]).unwrap();
        assert_eq!(lookup(&settings, "flash_size"), Some(1));
        assert_eq!(lookup(&settings, "manufacturer_id"), Some(0xEF));
    }

    #[test]
    fn word_count_rejection() {
        let schema = for_peripheral(Peripheral::Sd);
        assert!(matches!(
            decode(schema, &[0xD000_0002, 0x0000_0000]),
            Err(Error::WordCountMismatch {
                peripheral: Peripheral::Sd,
                actual: 2,
                ..
            })
        ));
        assert!(matches!(
            decode(for_peripheral(Peripheral::FlexspiNor), &[]),
            Err(Error::WordCountMismatch { actual: 0, .. })
        ));
    }

    #[test]
    fn encode_fills_constants() {
        let schema = for_peripheral(Peripheral::Sd);
        let words = encode(schema, &[Setting::new("instance", 2)]).unwrap();
        assert_eq!(words, vec![0xD000_0002]);
    }

    #[test]
    fn encode_rejects_out_of_domain() {
        let schema = for_peripheral(Peripheral::FlexspiNor);
        let err = encode(
            schema,
            &[Setting::new("max_freq", 7), Setting::new("cmd_pads", 1)],
        )
        .unwrap_err();
        assert!(matches!(err, Error::FieldValueOutOfRange { ref field, value: 1, .. } if field == "cmd_pads"));

        // too wide for the field even without an explicit domain
        let err = encode(schema, &[Setting::new("max_freq", 0x1F)]).unwrap_err();
        assert!(matches!(err, Error::FieldValueOutOfRange { .. }));
    }

    #[test]
    fn encode_rejects_missing_required_field() {
        let schema = for_peripheral(Peripheral::Sd);
        assert!(matches!(
            encode(schema, &[]),
            Err(Error::MissingField {
                field: "instance",
                ..
            })
        ));
    }

    #[test]
    fn encode_rejects_unknown_setting() {
        let schema = for_peripheral(Peripheral::Sd);
        assert!(matches!(
            encode(schema, &[Setting::new("instance", 1), Setting::new("bogus", 0)]),
            Err(Error::ConfigFormat(_))
        ));
    }

    #[test]
    fn optional_word_emitted_only_when_populated() {
        let schema = for_peripheral(Peripheral::FlexspiNor);
        let one = encode(schema, &[Setting::new("max_freq", 7)]).unwrap();
        assert_eq!(one.len(), 1);

        let two = encode(
            schema,
            &[
                Setting::new("max_freq", 7),
                Setting::new("option_size", 1),
                Setting::new("dummy_cycles", 0x20),
            ],
        )
        .unwrap();
        assert_eq!(two, vec![0xC100_0007, 0x0000_0020]);
    }

    #[test]
    fn declared_word_count_enforces_required_fields() {
        let schema = for_peripheral(Peripheral::FlexspiNand);
        // the default option_size of 1 claims a second word, so its
        // required field must be supplied even though no word-1 value is
        assert!(matches!(
            encode(
                schema,
                &[Setting::new("flash_size", 1), Setting::new("max_freq", 6)]
            ),
            Err(Error::MissingField {
                field: "manufacturer_id",
                ..
            })
        ));
        // an explicit single-word layout drops the claim
        let words = encode(
            schema,
            &[
                Setting::new("option_size", 0),
                Setting::new("flash_size", 1),
                Setting::new("max_freq", 6),
            ],
        )
        .unwrap();
        assert_eq!(words, vec![0xC001_0026]);
    }

    #[test]
    fn understated_word_count_is_rejected() {
        let schema = for_peripheral(Peripheral::FlexspiNor);
        let err = encode(
            schema,
            &[
                Setting::new("option_size", 0),
                Setting::new("max_freq", 7),
                Setting::new("dummy_cycles", 0x20),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigFormat(_)), "{err}");
    }

    #[test]
    fn words_round_trip_through_fields() {
        let cases: &[(Peripheral, &[u32])] = &[
            (Peripheral::FlexspiNor, &[0xC000_0001]),
            (Peripheral::FlexspiNor, &[0xC100_0007, 0x0000_0001]),
            (Peripheral::FlexspiNor, &[0xC102_0026]),
            (Peripheral::FlexspiNand, &[0xC102_0026, 0x0000_00C2]),
            (Peripheral::Sd, &[0xD000_0002]),
        ];
        for (peripheral, words) in cases {
            let schema = for_peripheral(*peripheral);
            let settings = decode(schema, words).unwrap();
            assert_eq!(&encode(schema, &settings).unwrap(), words, "{peripheral}");
        }
    }

    #[test]
    fn fields_round_trip_through_words() {
        let schema = for_peripheral(Peripheral::FlexspiNand);
        let settings = vec![
            Setting::new("option_size", 1),
            Setting::new("flash_size", 2),
            Setting::new("has_multiplanes", 0),
            Setting::new("pages_per_block", 0),
            Setting::new("page_size", 2),
            Setting::new("max_freq", 6),
            Setting::new("manufacturer_id", 0xC2),
        ];
        let words = encode(schema, &settings).unwrap();
        assert_eq!(words, vec![0xC102_0026, 0x0000_00C2]);
        assert_eq!(decode(schema, &words).unwrap(), settings);
    }

    #[test]
    fn all_presets_round_trip() {
        for peripheral in Peripheral::ALL {
            let schema = for_peripheral(*peripheral);
            for preset in presets_for(*peripheral) {
                let settings = decode(schema, preset.option_words)
                    .unwrap_or_else(|e| panic!("{}: {e}", preset.chip_name));
                let words = encode(schema, &settings)
                    .unwrap_or_else(|e| panic!("{}: {e}", preset.chip_name));
                assert_eq!(words, preset.option_words, "{}", preset.chip_name);
            }
        }
    }
}
