//! The assembler: descriptor + parameters + defaults → [`ResolvedRequest`].

use serde_json::{Map, Value};

use crate::config::{PartnerConfig, RequestOptions};
use crate::error::SdkError;
use crate::request::fields::{OperationDescriptor, Placement, Requirement};
use crate::request::payload::{build_query, signable_body};
use crate::request::{
    Method, Operation, Params, Payload, ResolvedRequest, FORM_CONTENT_TYPE, PLATFORM_SERIAL_HEADER,
};

/// Assemble `operation` from the caller's parameters.
///
/// Steps, in order: drop competing identifiers, move path identifiers into
/// the path, inject account defaults, encode the rest as query or body.
/// Fails before anything is sent when a required default cannot be resolved.
pub fn assemble(
    operation: Operation,
    params: &Params,
    options: &RequestOptions,
    config: &PartnerConfig,
) -> Result<ResolvedRequest, SdkError> {
    let descriptor = operation.descriptor();
    let mut remaining = params.clone();

    for &key in descriptor.discarded {
        if let Some(dropped) = remaining.remove(key) {
            if !dropped.is_null() {
                tracing::debug!(
                    operation = descriptor.name,
                    field = key,
                    "Discarding competing identifier"
                );
            }
        }
    }

    let path = fill_path(&descriptor, &mut remaining)?;
    let merged = inject_defaults(&descriptor, remaining, options, config)?;

    let payload = match descriptor.method {
        Method::Get if !descriptor.sends_query => {
            if !merged.is_empty() {
                tracing::debug!(
                    operation = descriptor.name,
                    fields = ?merged.keys().collect::<Vec<_>>(),
                    "Lookup takes no query; dropping remaining fields"
                );
            }
            Payload::Query(String::new())
        }
        Method::Get => Payload::Query(build_query(&merged)?),
        Method::Post => Payload::Body(signable_body(&merged)?),
    };

    let mut extra_headers = Vec::new();
    if descriptor.method == Method::Get {
        extra_headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
    }
    if descriptor.forwards_platform_serial {
        if let Some(serial) = &options.platform_serial_no {
            extra_headers.push((PLATFORM_SERIAL_HEADER.to_string(), serial.clone()));
        }
    }

    tracing::debug!(
        operation = descriptor.name,
        method = %descriptor.method,
        path = %path,
        "Assembled request"
    );

    Ok(ResolvedRequest::new(
        descriptor.name,
        descriptor.method,
        path,
        payload,
        extra_headers,
    ))
}

/// Replace each `{field}` placeholder with the caller's value, removing the
/// field from `params`.
fn fill_path(descriptor: &OperationDescriptor, params: &mut Params) -> Result<String, SdkError> {
    let mut path = descriptor.path_template.to_string();
    for &name in descriptor.path_params {
        let value = params
            .remove(name)
            .filter(|v| !v.is_null())
            .ok_or(SdkError::MissingPathParam(name))?;
        let segment = match value {
            Value::String(s) if !s.is_empty() => s,
            Value::Number(n) if !n.is_f64() => n.to_string(),
            Value::String(_) => return Err(SdkError::MissingPathParam(name)),
            other => {
                return Err(SdkError::InvalidParams(format!(
                    "path parameter `{name}` must be a string or integer, got {other}"
                )))
            }
        };
        path = path.replace(&format!("{{{name}}}"), &urlencoding::encode(&segment));
    }
    Ok(path)
}

/// Merge account defaults around the caller's fields.
///
/// Leading fields always come first in declaration order, whether the value
/// is the caller's or a resolved default. A field the caller already set is
/// never resolved.
fn inject_defaults(
    descriptor: &OperationDescriptor,
    mut params: Params,
    options: &RequestOptions,
    config: &PartnerConfig,
) -> Result<Params, SdkError> {
    let mut leading = Map::new();
    let mut trailing = Vec::new();

    for field in descriptor.defaults {
        if params.contains(field.name) {
            if field.placement == Placement::Leading {
                if let Some(value) = params.remove(field.name) {
                    leading.insert(field.name.to_string(), value);
                }
            }
            continue;
        }
        let explicit = options.get(field.key);
        let resolved = match field.requirement {
            Requirement::Required => Some(config.require(explicit, field.key)?),
            Requirement::IfPresent => config.resolve(explicit, field.key),
        };
        if let Some(value) = resolved {
            match field.placement {
                Placement::Leading => {
                    leading.insert(field.name.to_string(), Value::String(value));
                }
                Placement::Trailing => trailing.push((field.name, value)),
            }
        }
    }

    let mut merged = leading;
    for (key, value) in params.into_map() {
        if !value.is_null() {
            merged.insert(key, value);
        }
    }
    for (key, value) in trailing {
        merged.insert(key.to_string(), Value::String(value));
    }
    Ok(Params::from(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigKey;
    use crate::domain::transaction::Channel;
    use serde_json::json;

    fn params(value: Value) -> Params {
        Params::try_from(value).unwrap()
    }

    fn create_params() -> Params {
        params(json!({
            "description": "pay",
            "out_trade_no": "N1",
            "payer": { "sp_openid": "oid" },
            "amount": { "total": 10 },
            "sub_mchid": "160000",
            "notify_url": "https://x",
        }))
    }

    #[test]
    fn test_create_native_prepends_app_and_merchant() {
        let options = RequestOptions::new().with_merchant_id("M1").with_app_id("A1");
        let req = assemble(
            Operation::CreateTransaction(Channel::Native),
            &create_params(),
            &options,
            &PartnerConfig::new(),
        )
        .unwrap();

        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.path(), "/v3/pay/partner/transactions/native");
        let body = req.signable_body().unwrap();
        assert!(body.starts_with(r#"{"sp_appid":"A1","sp_mchid":"M1","description":"pay""#));
        assert_eq!(req.http_body(), Some(body));
    }

    #[test]
    fn test_create_uses_config_when_options_empty() {
        let config = PartnerConfig::new().with_app_id("wx_cfg").with_merchant_id("M_cfg");
        let req = assemble(
            Operation::CreateTransaction(Channel::App),
            &create_params(),
            &RequestOptions::new(),
            &config,
        )
        .unwrap();

        assert_eq!(req.path(), "/v3/pay/partner/transactions/app");
        assert!(req
            .signable_body()
            .unwrap()
            .starts_with(r#"{"sp_appid":"wx_cfg","sp_mchid":"M_cfg","#));
    }

    #[test]
    fn test_create_without_merchant_fails() {
        let err = assemble(
            Operation::CreateTransaction(Channel::H5),
            &create_params(),
            &RequestOptions::new().with_app_id("A1"),
            &PartnerConfig::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SdkError::ConfigurationMissing(ConfigKey::MerchantId)
        ));
    }

    #[test]
    fn test_caller_supplied_merchant_keeps_leading_order() {
        let p = create_params().set("sp_mchid", "CALLER");
        let req = assemble(
            Operation::CreateTransaction(Channel::Native),
            &p,
            &RequestOptions::new().with_app_id("A1"),
            &PartnerConfig::new(),
        )
        .unwrap();
        let body = req.signable_body().unwrap();
        assert!(body.starts_with(r#"{"sp_appid":"A1","sp_mchid":"CALLER","description""#));
        assert_eq!(body.matches("sp_mchid").count(), 1);
    }

    #[test]
    fn test_caller_supplied_app_id_stays_first() {
        let p = create_params().set("sp_appid", "CALLER");
        let options = RequestOptions::new().with_merchant_id("M1").with_app_id("A1");
        let req = assemble(
            Operation::CreateTransaction(Channel::Native),
            &p,
            &options,
            &PartnerConfig::new(),
        )
        .unwrap();
        let body = req.signable_body().unwrap();
        assert!(body.starts_with(r#"{"sp_appid":"CALLER","sp_mchid":"M1","description":"pay""#));
        assert!(!body.contains(r#""A1""#));
    }

    #[test]
    fn test_null_default_field_is_resolved() {
        let p = create_params().set("sp_appid", Value::Null);
        let options = RequestOptions::new().with_merchant_id("M1").with_app_id("A1");
        let req = assemble(
            Operation::CreateTransaction(Channel::Native),
            &p,
            &options,
            &PartnerConfig::new(),
        )
        .unwrap();
        assert!(req
            .signable_body()
            .unwrap()
            .starts_with(r#"{"sp_appid":"A1","sp_mchid":"M1","description""#));
    }

    #[test]
    fn test_query_order_by_id_drops_out_trade_no() {
        let p = params(json!({
            "out_trade_no": "N202104302474",
            "sub_mchid": "16000008",
            "transaction_id": "4323400972202104305133344444",
        }));
        let op = Operation::query_order_for(&p);
        let req = assemble(
            op,
            &p,
            &RequestOptions::new().with_merchant_id("1230000109"),
            &PartnerConfig::new(),
        )
        .unwrap();

        assert_eq!(req.method(), Method::Get);
        assert_eq!(
            req.url_path(),
            "/v3/pay/partner/transactions/id/4323400972202104305133344444?sub_mchid=16000008&sp_mchid=1230000109"
        );
        assert!(!req.url_path().contains("out_trade_no"));
        assert_eq!(req.header("content-type"), Some(FORM_CONTENT_TYPE));
    }

    #[test]
    fn test_query_order_by_out_trade_no() {
        let p = Params::new()
            .set("sub_mchid", "16000008")
            .set("out_trade_no", "N202104302474");
        let req = assemble(
            Operation::query_order_for(&p),
            &p,
            &RequestOptions::new(),
            &PartnerConfig::new().with_merchant_id("1230000109"),
        )
        .unwrap();
        assert_eq!(
            req.url_path(),
            "/v3/pay/partner/transactions/out-trade-no/N202104302474?sub_mchid=16000008&sp_mchid=1230000109"
        );
    }

    #[test]
    fn test_caller_params_not_mutated() {
        let p = Params::new()
            .set("sub_mchid", "16000008")
            .set("out_trade_no", "N3344445");
        let before = p.clone();
        assemble(
            Operation::CloseOrder,
            &p,
            &RequestOptions::new(),
            &PartnerConfig::new(),
        )
        .unwrap();
        assert_eq!(p, before);
    }

    #[test]
    fn test_close_order_without_merchant_omits_it() {
        let p = Params::new()
            .set("sub_mchid", "16000008")
            .set("out_trade_no", "N3344445");
        let req = assemble(
            Operation::CloseOrder,
            &p,
            &RequestOptions::new(),
            &PartnerConfig::new(),
        )
        .unwrap();
        assert_eq!(
            req.path(),
            "/v3/pay/partner/transactions/out-trade-no/N3344445/close"
        );
        assert_eq!(req.signable_body(), Some(r#"{"sub_mchid":"16000008"}"#));
    }

    #[test]
    fn test_close_order_appends_resolved_merchant() {
        let p = Params::new()
            .set("sub_mchid", "16000008")
            .set("out_trade_no", "N3344445");
        let req = assemble(
            Operation::CloseOrder,
            &p,
            &RequestOptions::new(),
            &PartnerConfig::new().with_merchant_id("1230000109"),
        )
        .unwrap();
        assert_eq!(
            req.signable_body(),
            Some(r#"{"sub_mchid":"16000008","sp_mchid":"1230000109"}"#)
        );
    }

    #[test]
    fn test_missing_path_param() {
        let p = Params::new().set("sub_mchid", "16000008");
        let err = assemble(
            Operation::CloseOrder,
            &p,
            &RequestOptions::new(),
            &PartnerConfig::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SdkError::MissingPathParam("out_trade_no")));
    }

    #[test]
    fn test_numeric_path_param_is_accepted() {
        let p = Params::new().set("transaction_id", 4323400972202104301u64);
        let req = assemble(
            Operation::QueryProfitsharingAmount,
            &p,
            &RequestOptions::new(),
            &PartnerConfig::new(),
        )
        .unwrap();
        assert_eq!(
            req.url_path(),
            "/v3/profitsharing/transactions/4323400972202104301/amounts"
        );
    }

    #[test]
    fn test_remaining_amount_ignores_extra_fields() {
        let p = Params::new()
            .set("transaction_id", "4200000001")
            .set("sub_mchid", "1900000109");
        let req = assemble(
            Operation::QueryProfitsharingAmount,
            &p,
            &RequestOptions::new(),
            &PartnerConfig::new().with_merchant_id("1230000109"),
        )
        .unwrap();
        assert_eq!(
            req.url_path(),
            "/v3/profitsharing/transactions/4200000001/amounts"
        );
        assert_eq!(req.payload(), &Payload::Query(String::new()));
    }

    #[test]
    fn test_path_segment_is_percent_encoded() {
        let p = Params::new().set("out_order_no", "P 1/2");
        let req = assemble(
            Operation::QueryProfitsharing,
            &p,
            &RequestOptions::new(),
            &PartnerConfig::new(),
        )
        .unwrap();
        assert_eq!(req.path(), "/v3/profitsharing/orders/P%201%2F2");
    }

    #[test]
    fn test_profitsharing_request_forwards_serial_header() {
        let p = params(json!({
            "sub_mchid": "160000",
            "transaction_id": "4323400972202104301286330188",
            "out_order_no": "N202104307987",
            "unfreeze_unsplit": true,
            "receivers": [{ "type": "MERCHANT_ID", "account": "1607189890", "amount": 1, "description": "fee" }],
        }));
        let options = RequestOptions::new()
            .with_app_id("wx8888888888888888")
            .with_platform_serial_no("5157F09EFDC096DE15EBE81A47057A7232F1B8E1");
        let req = assemble(
            Operation::RequestProfitsharing,
            &p,
            &options,
            &PartnerConfig::new(),
        )
        .unwrap();

        assert_eq!(req.path(), "/v3/profitsharing/orders");
        assert_eq!(
            req.header(PLATFORM_SERIAL_HEADER),
            Some("5157F09EFDC096DE15EBE81A47057A7232F1B8E1")
        );
        assert!(req
            .signable_body()
            .unwrap()
            .starts_with(r#"{"appid":"wx8888888888888888","sub_mchid":"160000""#));
    }

    #[test]
    fn test_return_profitsharing_injects_no_defaults() {
        let p = params(json!({
            "sub_mchid": "16000000",
            "out_order_no": "P202104306585",
            "out_return_no": "R20210430223",
            "return_mchid": "180000",
            "amount": 1,
            "description": "return",
        }));
        let config = PartnerConfig::new().with_app_id("A").with_merchant_id("M");
        let req = assemble(
            Operation::ReturnProfitsharing,
            &p,
            &RequestOptions::new(),
            &config,
        )
        .unwrap();
        let body = req.signable_body().unwrap();
        assert!(!body.contains("appid"));
        assert!(!body.contains("sp_mchid"));
        assert!(req.extra_headers().is_empty());
    }

    #[test]
    fn test_query_return_moves_out_return_no_to_path() {
        let p = params(json!({
            "sub_mchid": "1608747309",
            "out_order_no": "P202104306585",
            "out_return_no": "R202105023455",
        }));
        let req = assemble(
            Operation::QueryReturnProfitsharing,
            &p,
            &RequestOptions::new(),
            &PartnerConfig::new(),
        )
        .unwrap();
        assert_eq!(
            req.url_path(),
            "/v3/profitsharing/return-orders/R202105023455?sub_mchid=1608747309&out_order_no=P202104306585"
        );
    }

    #[test]
    fn test_float_amount_fails_before_send() {
        let p = create_params().set("amount", json!({ "total": 9.99 }));
        let err = assemble(
            Operation::CreateTransaction(Channel::Jsapi),
            &p,
            &RequestOptions::new().with_app_id("A1").with_merchant_id("M1"),
            &PartnerConfig::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SdkError::NonIntegerNumber(path) if path == "amount.total"));
    }
}
