//! The author-facing field surface and its argument parsers
//!
//! Arguments arrive as free text. Choices and flag names match
//! case-insensitively, exact names first and then unambiguous-enough
//! prefixes (first match wins), the way MUD commands abbreviate.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A named draft field an author can edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerField {
    Name,
    Attaches,
    Types,
    Argtype,
    Location,
    String,
    Costs,
    Percent,
    Numarg,
    Commands,
}

impl TriggerField {
    pub const ALL: [TriggerField; 10] = [
        TriggerField::Name,
        TriggerField::Attaches,
        TriggerField::Types,
        TriggerField::Argtype,
        TriggerField::Location,
        TriggerField::String,
        TriggerField::Costs,
        TriggerField::Percent,
        TriggerField::Numarg,
        TriggerField::Commands,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TriggerField::Name => "name",
            TriggerField::Attaches => "attaches",
            TriggerField::Types => "types",
            TriggerField::Argtype => "argtype",
            TriggerField::Location => "location",
            TriggerField::String => "string",
            TriggerField::Costs => "costs",
            TriggerField::Percent => "percent",
            TriggerField::Numarg => "numarg",
            TriggerField::Commands => "commands",
        }
    }
}

impl fmt::Display for TriggerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TriggerField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let names = TriggerField::ALL.map(|field| (field.name(), field));
        find_by_name(s, names.iter().copied())
            .ok_or_else(|| Error::UnknownField(s.trim().to_string()))
    }
}

/// Exact (case-insensitive) match first, then first prefix match
fn find_by_name<'a, T: Copy>(
    arg: &str,
    choices: impl Iterator<Item = (&'a str, T)> + Clone,
) -> Option<T> {
    let arg = arg.trim();
    if arg.is_empty() {
        return None;
    }
    let lower = arg.to_lowercase();
    choices
        .clone()
        .find(|(name, _)| name.to_lowercase() == lower)
        .or_else(|| {
            choices
                .clone()
                .find(|(name, _)| name.to_lowercase().starts_with(&lower))
        })
        .map(|(_, value)| value)
}

/// Pick one value out of a list of named choices
pub(crate) fn process_choice<'a, T: Copy>(
    arg: &str,
    what: &'static str,
    choices: impl Iterator<Item = (&'a str, T)> + Clone,
) -> Result<T> {
    if arg.trim().is_empty() {
        return Err(Error::MissingArgument(what));
    }
    find_by_name(arg, choices).ok_or_else(|| Error::InvalidChoice {
        what,
        given: arg.trim().to_string(),
    })
}

/// Toggle named bits of `current`; "none" clears everything.
///
/// `names[i]` names bit `i`. Nothing is changed unless every word parses.
pub(crate) fn process_flags(arg: &str, what: &'static str, names: &[&str], current: u64) -> Result<u64> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(Error::MissingArgument(what));
    }
    if arg.eq_ignore_ascii_case("none") {
        return Ok(0);
    }
    let mut bits = current;
    for word in arg.split(|c: char| c.is_whitespace() || c == ',').filter(|w| !w.is_empty()) {
        let pos = find_by_name(word, names.iter().copied().zip(0u32..))
            .ok_or_else(|| Error::InvalidChoice {
                what,
                given: word.to_string(),
            })?;
        bits ^= 1u64 << pos;
    }
    Ok(bits)
}

/// Parse a bounded integer
pub(crate) fn process_number(arg: &str, what: &'static str, min: i32, max: i32) -> Result<i32> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(Error::MissingArgument(what));
    }
    let out_of_range = || Error::OutOfRange {
        what,
        min: min.into(),
        max: max.into(),
    };
    let value: i64 = arg.parse().map_err(|_| Error::InvalidChoice {
        what,
        given: arg.to_string(),
    })?;
    if value < i64::from(min) || value > i64::from(max) {
        return Err(out_of_range());
    }
    i32::try_from(value).map_err(|_| out_of_range())
}

/// Require a non-empty string
pub(crate) fn process_string(arg: &str, what: &'static str) -> Result<String> {
    let arg = arg.trim();
    if arg.is_empty() {
        Err(Error::MissingArgument(what))
    } else {
        Ok(arg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_str() {
        assert_eq!("types".parse::<TriggerField>().unwrap(), TriggerField::Types);
        assert_eq!("PERC".parse::<TriggerField>().unwrap(), TriggerField::Percent);
        assert_eq!("co".parse::<TriggerField>().unwrap(), TriggerField::Costs);
        assert!(matches!(
            "bogus".parse::<TriggerField>(),
            Err(Error::UnknownField(_))
        ));
    }

    #[test]
    fn test_choice_prefers_exact_match() {
        let choices = [("Greet-All", 1), ("Greet", 2)];
        assert_eq!(process_choice("greet", "type", choices.iter().copied()).unwrap(), 2);
        assert_eq!(process_choice("greet-", "type", choices.iter().copied()).unwrap(), 1);
        assert!(matches!(
            process_choice("", "type", choices.iter().copied()),
            Err(Error::MissingArgument("type"))
        ));
    }

    #[test]
    fn test_flags_toggle_and_clear() {
        let names = ["Global", "Random", "Command"];
        let bits = process_flags("random command", "type", &names, 0).unwrap();
        assert_eq!(bits, 0b110);
        let bits = process_flags("random", "type", &names, bits).unwrap();
        assert_eq!(bits, 0b100);
        assert_eq!(process_flags("none", "type", &names, bits).unwrap(), 0);
    }

    #[test]
    fn test_flags_are_all_or_nothing() {
        let names = ["Global", "Random"];
        assert!(matches!(
            process_flags("random nonsense", "type", &names, 0),
            Err(Error::InvalidChoice { .. })
        ));
    }

    #[test]
    fn test_number_bounds() {
        assert_eq!(process_number(" 42 ", "percent", 0, 100).unwrap(), 42);
        assert!(matches!(
            process_number("101", "percent", 0, 100),
            Err(Error::OutOfRange { max: 100, .. })
        ));
        assert!(matches!(
            process_number("lots", "percent", 0, 100),
            Err(Error::InvalidChoice { .. })
        ));
        assert_eq!(process_number("-7", "numeric argument", i32::MIN, i32::MAX).unwrap(), -7);
        assert!(process_number("99999999999", "numeric argument", i32::MIN, i32::MAX).is_err());
    }
}
