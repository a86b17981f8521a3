//! Canonical encodings of a parameter map.
//!
//! GET lookups carry their parameters as a form-encoded query string; POST
//! mutations carry them as a compact JSON body that is also the signing input.
//! Both encodings keep the map's insertion order and drop absent values.

use serde_json::{Map, Value};

use crate::error::SdkError;
use crate::request::Params;

/// Drop `null` entries at every depth and reject floating-point numbers.
///
/// Amounts travel as integers in minor currency units, so a float anywhere in
/// the payload is a caller bug rather than something to round.
pub fn canonicalize(params: &Params) -> Result<Params, SdkError> {
    let mut out = Map::with_capacity(params.len());
    for (key, value) in params.iter() {
        if let Some(v) = canonical_value(value, key)? {
            out.insert(key.to_string(), v);
        }
    }
    Ok(Params::from(out))
}

fn canonical_value(value: &Value, path: &str) -> Result<Option<Value>, SdkError> {
    Ok(match value {
        Value::Null => None,
        Value::Number(n) if n.is_f64() => {
            return Err(SdkError::NonIntegerNumber(path.to_string()));
        }
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, inner) in map {
                let inner_path = format!("{path}.{key}");
                if let Some(v) = canonical_value(inner, &inner_path)? {
                    out.insert(key.clone(), v);
                }
            }
            Some(Value::Object(out))
        }
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, inner) in items.iter().enumerate() {
                if let Some(v) = canonical_value(inner, &format!("{path}[{i}]"))? {
                    out.push(v);
                }
            }
            Some(Value::Array(out))
        }
        other => Some(other.clone()),
    })
}

/// Form-encode `params` in insertion order.
///
/// Strings go out raw, numbers and booleans in display form, nested values as
/// compact JSON.
pub fn build_query(params: &Params) -> Result<String, SdkError> {
    let canonical = canonicalize(params)?;
    let mut pairs = Vec::with_capacity(canonical.len());
    for (key, value) in canonical.iter() {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            nested => serde_json::to_string(nested)?,
        };
        pairs.push((key, text));
    }
    Ok(serde_urlencoded::to_string(&pairs)?)
}

/// The exact bytes that are both signed and sent as the HTTP body.
pub fn signable_body(params: &Params) -> Result<String, SdkError> {
    let canonical = canonicalize(params)?;
    Ok(serde_json::to_string(canonical.as_map())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        Params::try_from(value).unwrap()
    }

    #[test]
    fn test_query_keeps_insertion_order() {
        let p = Params::new()
            .set("sub_mchid", "1900000109")
            .set("sp_mchid", "1230000109");
        assert_eq!(
            build_query(&p).unwrap(),
            "sub_mchid=1900000109&sp_mchid=1230000109"
        );
    }

    #[test]
    fn test_query_encodes_reserved_characters() {
        let p = Params::new().set("description", "a b&c=d");
        assert_eq!(build_query(&p).unwrap(), "description=a+b%26c%3Dd");
    }

    #[test]
    fn test_query_formats_scalars() {
        let p = Params::new()
            .set("limit", 20)
            .set("unfreeze_unsplit", true);
        assert_eq!(build_query(&p).unwrap(), "limit=20&unfreeze_unsplit=true");
    }

    #[test]
    fn test_query_omits_absent_fields() {
        let p = params(json!({
            "sub_mchid": "1900000109",
            "out_order_no": null,
            "transaction_id": "4200000001",
        }));
        assert_eq!(
            build_query(&p).unwrap(),
            "sub_mchid=1900000109&transaction_id=4200000001"
        );
    }

    #[test]
    fn test_query_of_empty_map_is_empty() {
        assert_eq!(build_query(&Params::new()).unwrap(), "");
    }

    #[test]
    fn test_body_omits_absent_fields() {
        let p = params(json!({
            "sub_mchid": "160000",
            "attach": null,
            "amount": { "total": 10, "currency": null },
        }));
        assert_eq!(
            signable_body(&p).unwrap(),
            r#"{"sub_mchid":"160000","amount":{"total":10}}"#
        );
    }

    #[test]
    fn test_body_keeps_nested_order() {
        let p = params(json!({
            "receivers": [{ "type": "MERCHANT_ID", "account": "1607189890", "amount": 1 }],
        }));
        assert_eq!(
            signable_body(&p).unwrap(),
            r#"{"receivers":[{"type":"MERCHANT_ID","account":"1607189890","amount":1}]}"#
        );
    }

    #[test]
    fn test_float_amount_rejected_with_path() {
        let p = params(json!({ "receivers": [{ "amount": 1.5 }] }));
        match signable_body(&p).unwrap_err() {
            SdkError::NonIntegerNumber(path) => assert_eq!(path, "receivers[0].amount"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_float_rejected_in_query_too() {
        let p = Params::new().set("amount", 0.1);
        assert!(matches!(
            build_query(&p),
            Err(SdkError::NonIntegerNumber(_))
        ));
    }
}
