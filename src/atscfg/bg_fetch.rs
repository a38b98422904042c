// Copyright (c) 2025 - Cowboy AI, Inc.
//! `bg_fetch.config` - background fetch for every user agent

use super::common::{make_hdr_comment, Cfg, Warnings};
use crate::domain::Server;
use crate::errors::{ConfigErrorKind, ConfigResult};

pub const BG_FETCH_CONFIG_FILE_NAME: &str = "bg_fetch.config";

pub fn make_bg_fetch_dot_config(server: &Server, hdr_comment: &str) -> ConfigResult<Cfg> {
    let warnings = Warnings::new();
    if server.cdn_name.is_none() {
        return Err(warnings.fail(ConfigErrorKind::MissingServerField("CDNName")));
    }
    let text = make_hdr_comment(hdr_comment) + "include User-Agent *\n";
    Ok(Cfg::text_ascii(text, warnings))
}
