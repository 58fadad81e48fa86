//! Typed dispatch catalog for the procedural backend.
//!
//! Operation names map to compile-time-known `fake` generators; an unknown
//! name is an explicit error, never a reflection miss. A handful of
//! operations accept keyword arguments; passing arguments to any other
//! operation is an error.

use rand::{Rng, RngCore};
use serde_json::{Map, Value as JsonValue};

use fake::Fake;
use fake::faker::address::raw::{
    BuildingNumber, CityName, CountryCode, CountryName, PostCode, SecondaryAddress, StateName,
    StreetName, ZipCode,
};
use fake::faker::boolean::raw::Boolean;
use fake::faker::chrono::raw::{Date, DateTime, Time};
use fake::faker::company::raw::{
    Buzzword, CatchPhrase, CompanyName, CompanySuffix, Industry, Profession,
};
use fake::faker::creditcard::raw::CreditCardNumber;
use fake::faker::currency::raw::{CurrencyCode, CurrencyName};
use fake::faker::filesystem::raw::{FileName, MimeType};
use fake::faker::internet::raw::{
    FreeEmail, IPv4, IPv6, MACAddress, Password, SafeEmail, UserAgent, Username,
};
use fake::faker::job::raw::Title as JobTitle;
use fake::faker::lorem::raw::{Paragraph, Sentence, Word};
use fake::faker::name::raw::{FirstName, LastName, Name, Suffix, Title as NameTitle};
use fake::faker::phone_number::raw::{CellNumber, PhoneNumber};
use fake::locales::{EN, PT_BR};
use fake::uuid::UUIDv4;

use rowforge_core::Value;

use super::locale::LocaleKey;

/// All operation names the catalog understands, sorted.
pub fn method_names() -> &'static [&'static str] {
    METHOD_NAMES
}

const METHOD_NAMES: &[&str] = &[
    "boolean",
    "building_number",
    "buzzword",
    "catch_phrase",
    "cell_phone",
    "city",
    "company",
    "company_suffix",
    "country",
    "country_code",
    "credit_card_number",
    "currency_code",
    "currency_name",
    "date",
    "email",
    "file_name",
    "first_name",
    "free_email",
    "industry",
    "ipv4",
    "ipv6",
    "iso8601",
    "job",
    "last_name",
    "latitude",
    "longitude",
    "mac_address",
    "mime_type",
    "name",
    "paragraph",
    "password",
    "phone_number",
    "postcode",
    "prefix",
    "profession",
    "random_digit",
    "random_int",
    "secondary_address",
    "sentence",
    "state",
    "street_address",
    "street_name",
    "suffix",
    "time",
    "user_agent",
    "user_name",
    "uuid4",
    "word",
    "zipcode",
];

macro_rules! localized {
    ($locale:expr, $rng:expr, $faker:path) => {
        match $locale {
            LocaleKey::EnUs => $faker(EN).fake_with_rng::<String, _>(&mut *$rng),
            LocaleKey::PtBr => $faker(PT_BR).fake_with_rng::<String, _>(&mut *$rng),
        }
    };
    ($locale:expr, $rng:expr, $faker:path, $($arg:expr),+) => {
        match $locale {
            LocaleKey::EnUs => $faker(EN, $($arg),+).fake_with_rng::<String, _>(&mut *$rng),
            LocaleKey::PtBr => $faker(PT_BR, $($arg),+).fake_with_rng::<String, _>(&mut *$rng),
        }
    };
}

/// Invoke one catalog operation.
///
/// Errors are returned as the in-band message the caller commits to the row.
pub(crate) fn invoke(
    method: &str,
    locale: LocaleKey,
    kwargs: Option<&Map<String, JsonValue>>,
    rng: &mut dyn RngCore,
) -> Result<Value, String> {
    // Parameterized operations first.
    match method {
        "random_int" => {
            ensure_known_keys(method, kwargs, &["min", "max"])?;
            let min = kw_i64(kwargs, "min").unwrap_or(0);
            let max = kw_i64(kwargs, "max").unwrap_or(9999);
            if min > max {
                return Err(format!("Error: random_int min {min} exceeds max {max}"));
            }
            return Ok(Value::Int(rng.random_range(min..=max)));
        }
        "random_digit" => {
            ensure_known_keys(method, kwargs, &[])?;
            return Ok(Value::Int(rng.random_range(0..=9)));
        }
        "boolean" => {
            ensure_known_keys(method, kwargs, &["chance_of_getting_true"])?;
            let chance = kw_i64(kwargs, "chance_of_getting_true").unwrap_or(50);
            if !(0..=100).contains(&chance) {
                return Err(format!(
                    "Error: boolean chance_of_getting_true {chance} must be between 0 and 100"
                ));
            }
            let value = match locale {
                LocaleKey::EnUs => Boolean(EN, chance as u8).fake_with_rng::<bool, _>(&mut *rng),
                LocaleKey::PtBr => Boolean(PT_BR, chance as u8).fake_with_rng::<bool, _>(&mut *rng),
            };
            return Ok(Value::Bool(value));
        }
        "sentence" => {
            ensure_known_keys(method, kwargs, &["nb_words"])?;
            let words = positive_kwarg(method, kwargs, "nb_words", 6)?;
            return Ok(Value::Text(localized!(locale, rng, Sentence, words..words + 1)));
        }
        "paragraph" => {
            ensure_known_keys(method, kwargs, &["nb_sentences"])?;
            let sentences = positive_kwarg(method, kwargs, "nb_sentences", 3)?;
            return Ok(Value::Text(localized!(
                locale,
                rng,
                Paragraph,
                sentences..sentences + 1
            )));
        }
        "password" => {
            ensure_known_keys(method, kwargs, &["length"])?;
            let length = positive_kwarg(method, kwargs, "length", 12)?;
            return Ok(Value::Text(localized!(locale, rng, Password, length..length + 1)));
        }
        "latitude" => {
            ensure_known_keys(method, kwargs, &[])?;
            return Ok(Value::Float(round6(rng.random_range(-90.0..=90.0))));
        }
        "longitude" => {
            ensure_known_keys(method, kwargs, &[])?;
            return Ok(Value::Float(round6(rng.random_range(-180.0..=180.0))));
        }
        _ => {}
    }

    if let Some(kwargs) = kwargs {
        if !kwargs.is_empty() {
            return Err(format!("Error: method '{method}' does not accept arguments"));
        }
    }

    let text = match method {
        "name" => localized!(locale, rng, Name),
        "first_name" => localized!(locale, rng, FirstName),
        "last_name" => localized!(locale, rng, LastName),
        "prefix" => localized!(locale, rng, NameTitle),
        "suffix" => localized!(locale, rng, Suffix),
        "email" => localized!(locale, rng, SafeEmail),
        "free_email" => localized!(locale, rng, FreeEmail),
        "user_name" => localized!(locale, rng, Username),
        "ipv4" => localized!(locale, rng, IPv4),
        "ipv6" => localized!(locale, rng, IPv6),
        "mac_address" => localized!(locale, rng, MACAddress),
        "user_agent" => localized!(locale, rng, UserAgent),
        "city" => localized!(locale, rng, CityName),
        "country" => localized!(locale, rng, CountryName),
        "country_code" => localized!(locale, rng, CountryCode),
        "state" => localized!(locale, rng, StateName),
        "street_name" => localized!(locale, rng, StreetName),
        "street_address" => {
            let number = localized!(locale, rng, BuildingNumber);
            let street = localized!(locale, rng, StreetName);
            format!("{number} {street}")
        }
        "building_number" => localized!(locale, rng, BuildingNumber),
        "secondary_address" => localized!(locale, rng, SecondaryAddress),
        "zipcode" => localized!(locale, rng, ZipCode),
        "postcode" => localized!(locale, rng, PostCode),
        "phone_number" => localized!(locale, rng, PhoneNumber),
        "cell_phone" => localized!(locale, rng, CellNumber),
        "company" => localized!(locale, rng, CompanyName),
        "company_suffix" => localized!(locale, rng, CompanySuffix),
        "catch_phrase" => localized!(locale, rng, CatchPhrase),
        "buzzword" => localized!(locale, rng, Buzzword),
        "industry" => localized!(locale, rng, Industry),
        "profession" => localized!(locale, rng, Profession),
        "job" => localized!(locale, rng, JobTitle),
        "word" => localized!(locale, rng, Word),
        "date" => localized!(locale, rng, Date),
        "time" => localized!(locale, rng, Time),
        "iso8601" => localized!(locale, rng, DateTime),
        "currency_code" => localized!(locale, rng, CurrencyCode),
        "currency_name" => localized!(locale, rng, CurrencyName),
        "credit_card_number" => localized!(locale, rng, CreditCardNumber),
        "file_name" => localized!(locale, rng, FileName),
        "mime_type" => localized!(locale, rng, MimeType),
        "uuid4" => {
            let id: uuid::Uuid = UUIDv4.fake_with_rng(&mut *rng);
            id.to_string()
        }
        _ => return Err(format!("Error: procedural method '{method}' not found")),
    };

    Ok(Value::Text(text))
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

fn ensure_known_keys(
    method: &str,
    kwargs: Option<&Map<String, JsonValue>>,
    allowed: &[&str],
) -> Result<(), String> {
    let Some(kwargs) = kwargs else {
        return Ok(());
    };
    for key in kwargs.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(format!(
                "Error: method '{method}' got an unexpected argument '{key}'"
            ));
        }
    }
    Ok(())
}

fn kw_i64(kwargs: Option<&Map<String, JsonValue>>, key: &str) -> Option<i64> {
    kwargs.and_then(|map| map.get(key)).and_then(|value| value.as_i64())
}

fn positive_kwarg(
    method: &str,
    kwargs: Option<&Map<String, JsonValue>>,
    key: &str,
    default: usize,
) -> Result<usize, String> {
    match kw_i64(kwargs, key) {
        None => Ok(default),
        Some(value) if value > 0 => Ok(value as usize),
        Some(value) => Err(format!("Error: method '{method}' requires {key} > 0, got {value}")),
    }
}
