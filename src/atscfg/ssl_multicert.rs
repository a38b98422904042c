// Copyright (c) 2025 - Cowboy AI, Inc.
//! `ssl_multicert.config` - certificate/key bindings for HTTPS delivery services

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::common::{make_hdr_comment, Cfg, Warnings};
use crate::domain::{DeliveryService, DsType, Server};
use crate::errors::{ConfigErrorKind, ConfigResult};

pub const SSL_MULTICERT_CONFIG_FILE_NAME: &str = "ssl_multicert.config";

const SCHEME_HTTPS: &str = "https://";
const SCHEME_HTTP: &str = "http://";

/// The slice of a delivery service this file cares about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SslMultiCertDs {
    pub xml_id: String,
    pub ds_type: DsType,
    pub protocol: i64,
    pub example_urls: Vec<String>,
}

pub fn make_ssl_multicert_dot_config(
    server: &Server,
    delivery_services: &[DeliveryService],
    hdr_comment: &str,
) -> ConfigResult<Cfg> {
    let mut warnings = Warnings::new();
    if server.cdn_name.is_none() {
        return Err(warnings.fail(ConfigErrorKind::MissingServerField("CDNName")));
    }

    let (dses, ds_warnings) = delivery_services_to_ssl_multicert_dses(delivery_services);
    warnings.extend(ds_warnings);

    let mut lines: Vec<String> = get_ssl_multicert_delivery_services(&dses)
        .values()
        .map(|ds| {
            let (cert, key) = get_cert_and_key_name(ds, &mut warnings);
            format!("ssl_cert_name={cert}\t ssl_key_name={key}\n")
        })
        .collect();
    lines.sort();

    let text = make_hdr_comment(hdr_comment) + &lines.concat();
    Ok(Cfg::text_ascii(text, warnings))
}

/// Project delivery services, keyed by xml id
///
/// Delivery services missing a type, protocol or xml id are dropped with a
/// warning.
pub fn delivery_services_to_ssl_multicert_dses(
    delivery_services: &[DeliveryService],
) -> (BTreeMap<String, SslMultiCertDs>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut dses = BTreeMap::new();
    for ds in delivery_services {
        let (Some(ds_type), Some(protocol), Some(xml_id)) =
            (ds.ds_type, ds.protocol, ds.xml_id.as_deref())
        else {
            match ds.xml_id.as_deref() {
                Some(xml_id) => {
                    warnings.push(format!("got DS '{xml_id}' with nil values! Skipping!"))
                }
                None => warnings.push("got unknown DS with nil values! Skipping!".to_string()),
            }
            continue;
        };
        dses.insert(
            xml_id.to_string(),
            SslMultiCertDs {
                xml_id: xml_id.to_string(),
                ds_type,
                protocol,
                example_urls: ds.example_urls.clone(),
            },
        );
    }
    (dses, warnings)
}

/// Delivery services that get a certificate binding
///
/// Public so callers can tell which certificates a server needs without
/// parsing the file.
pub fn get_ssl_multicert_delivery_services(
    dses: &BTreeMap<String, SslMultiCertDs>,
) -> BTreeMap<String, SslMultiCertDs> {
    dses.iter()
        .filter(|(_, ds)| ds.ds_type != DsType::AnyMap)
        // steering certificates never live on the caches
        .filter(|(_, ds)| !ds.ds_type.is_steering())
        .filter(|(_, ds)| ds.protocol != 0)
        .filter(|(_, ds)| !ds.example_urls.is_empty())
        .map(|(name, ds)| (name.clone(), ds.clone()))
        .collect()
}

/// Cert and key file names derived from the first example URL
///
/// Returns `(cert, key)`, e.g. `ds1_example_net_cert.cer` and
/// `ds1.example.net.key` for `https://ds1.example.net`.
///
/// Anything not starting with `https://` is assumed to be `http://` and loses
/// that many leading characters. A URL shorter than the scheme is used as is.
/// Both cases warn, since the resulting names are likely wrong.
pub fn get_cert_and_key_name(ds: &SslMultiCertDs, warnings: &mut Warnings) -> (String, String) {
    let url = ds.example_urls.first().map(String::as_str).unwrap_or_default();

    let scheme = if url.starts_with(SCHEME_HTTPS) {
        SCHEME_HTTPS
    } else {
        SCHEME_HTTP
    };

    if !url.starts_with(scheme) {
        warn!(xml_id = %ds.xml_id, url, "example url has no scheme");
        warnings.push(format!(
            "got ds '{}' example url '{}' with no scheme! {} will likely be malformed!",
            ds.xml_id, url, SSL_MULTICERT_CONFIG_FILE_NAME
        ));
    }
    let host = url.get(scheme.len()..).unwrap_or(url);

    let key = format!("{host}.key");
    let cert = format!("{}_cert.cer", host.replace('.', "_"));
    (cert, key)
}
