use crate::Error;
use chrono::{DateTime, TimeZone, Utc};
use roxmltree::Node;
use std::str::FromStr;

pub(crate) fn required_attr<'a, 'input>(
    el: Node<'a, 'input>,
    name: &'static str,
) -> Result<&'a str, Error> {
    el.attribute(name).ok_or_else(|| Error::MissingAttribute {
        element: el.tag_name().name().to_owned(),
        attribute: name,
    })
}

pub(crate) fn optional_attr(el: Node, name: &str) -> Option<String> {
    el.attribute(name).map(ToOwned::to_owned)
}

/// The `shortTitle` attribute falls back to the title when absent or empty
pub(crate) fn short_title(el: Node, title: &str) -> String {
    match el.attribute("shortTitle") {
        Some(s) if !s.is_empty() => s.to_owned(),
        _ => title.to_owned(),
    }
}

/// The feed spells booleans as the exact string `true`; anything else,
/// including an absent attribute, reads as false
pub(crate) fn bool_attr(el: Node, name: &str) -> bool {
    el.attribute(name) == Some("true")
}

pub(crate) fn number_attr<T: FromStr>(el: Node, name: &'static str) -> Result<T, Error> {
    let s = required_attr(el, name)?;
    s.parse().map_err(|_| Error::InvalidNumber(s.to_owned()))
}

/// Timestamps travel as decimal milliseconds since the Unix epoch, in UTC
pub(crate) fn parse_epoch_millis(s: &str) -> Result<DateTime<Utc>, Error> {
    let millis: i64 = s
        .parse()
        .map_err(|_| Error::InvalidTimestamp(s.to_owned()))?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| Error::InvalidTimestamp(s.to_owned()))
}

pub(crate) fn timestamp_attr(el: Node, name: &'static str) -> Result<DateTime<Utc>, Error> {
    parse_epoch_millis(required_attr(el, name)?)
}
