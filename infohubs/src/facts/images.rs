//! Image size facts.

use super::WidthProxy;
use crate::core::Value;
use crate::errors::HubError;
use crate::hubs::{DerivedHub, FactoryRegistry};
use crate::ports::PropertySheets;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Named image sizes: name to `[width, height]`.
pub type SizeTable = BTreeMap<String, [i64; 2]>;

const SIZE_SHEET: &str = "imaging_properties";
const SIZE_PROPERTY: &str = "allowed_sizes";

#[allow(clippy::expect_used)]
static SIZE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+(\d+):(\d+)$").expect("valid size line pattern"));

/// Parses `name width:height` lines.
///
/// Every line must match, blank ones included, so a trailing newline is an
/// error too.
///
/// ```
/// use infohubs::facts::parse_size_table;
///
/// let sizes = parse_size_table("mini 200:200\npreview 400:400").unwrap();
/// assert_eq!(sizes["preview"], [400, 400]);
/// assert!(parse_size_table("thumb 128x128").is_err());
/// assert!(parse_size_table("mini 200:200\n").is_err());
/// ```
pub fn parse_size_table(raw: &str) -> Result<SizeTable, HubError> {
    let mut sizes = SizeTable::new();

    for line in raw.split('\n').map(str::trim) {
        let caps = SIZE_LINE.captures(line).ok_or_else(|| HubError::SizeParse {
            line: line.to_string(),
            reason: "expected `name width:height`".to_string(),
        })?;
        let dimension = |idx: usize| -> Result<i64, HubError> {
            caps[idx].parse().map_err(|err| HubError::SizeParse {
                line: line.to_string(),
                reason: format!("{err}"),
            })
        };
        sizes.insert(caps[1].to_string(), [dimension(2)?, dimension(3)?]);
    }

    Ok(sizes)
}

pub(super) fn register(registry: FactoryRegistry) -> FactoryRegistry {
    registry
        .register("named_sizes", named_sizes)
        .register("named_width", named_width)
        .register("image_size_steps", |_| Ok(Value::Int(0)))
        .register("image_print_factor", |_| Ok(Value::Int(1)))
        .register("print_px_factor", |_| Ok(Value::Int(1)))
}

fn named_sizes(hub: &DerivedHub) -> Result<Value, HubError> {
    let properties = hub.tools().require::<dyn PropertySheets>("portal_properties")?;
    let sizes = match properties.property(SIZE_SHEET, SIZE_PROPERTY) {
        Some(raw) => parse_size_table(&raw)?,
        None => SizeTable::new(),
    };
    Ok(Value::Map(
        sizes
            .into_iter()
            .map(|(name, [width, height])| (name, Value::from(vec![width, height])))
            .collect(),
    ))
}

/// Proxy `size name -> width`; names may carry the image prefix
/// (`image_mini` and `mini` are the same size).
fn named_width(hub: &DerivedHub) -> Result<Value, HubError> {
    let widths: BTreeMap<String, i64> = hub
        .get("named_sizes")?
        .as_map()
        .ok_or_else(|| HubError::type_mismatch("named_sizes", "a map"))?
        .iter()
        .filter_map(|(name, dims)| {
            dims.as_list()
                .and_then(|dims| dims.first())
                .and_then(Value::as_int)
                .map(|width| (name.clone(), width))
        })
        .collect();
    let prefix = hub.config().image_size_prefix.clone();

    let proxy = WidthProxy::by_key(move |name| {
        let name = name.strip_prefix(prefix.as_str()).unwrap_or(name);
        Ok(widths.get(name).copied())
    });
    Ok(Value::handle(proxy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_size_table() {
        let sizes = parse_size_table("  large 768:768\r\nicon 32:32  ").unwrap();

        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes["large"], [768, 768]);
        assert_eq!(sizes["icon"], [32, 32]);
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let err = parse_size_table("mini 200:200\nbroken").unwrap_err();

        match err {
            HubError::SizeParse { line, .. } => assert_eq!(line, "broken"),
            other => panic!("expected size parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_line_is_an_error() {
        let err = parse_size_table("mini 200:200\n\npreview 400:400").unwrap_err();
        assert!(matches!(err, HubError::SizeParse { ref line, .. } if line.is_empty()));

        assert!(parse_size_table("mini 200:200\n").is_err());
        assert!(parse_size_table("").is_err());
    }

    #[test]
    fn test_overflowing_dimension_is_an_error() {
        assert!(parse_size_table("huge 99999999999999999999:1").is_err());
    }
}
