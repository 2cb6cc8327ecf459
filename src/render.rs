//! HTML fragments and URLs for wizard navigation.

use handlebars::{Handlebars, RenderError, TemplateError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::wizard::BackLink;

const BACK_LINK_TEMPLATE_NAME: &str = "back_link";
const BACK_LINK_TEMPLATE: &str =
    "<div class='box nav'>Back to <a href='{{href}}'>{{label}}</a></div>";

static PATH_SEGMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._~-]+$").expect("valid path segment pattern"));

/// Returns true if `id` can be placed in a URL path segment without escaping
pub fn is_path_segment(id: &str) -> bool {
    PATH_SEGMENT_PATTERN.is_match(id) && id != "." && id != ".."
}

/// URL path of the view for `step_id` within a session
pub fn step_url(site_root: &str, session_id: &str, step_id: &str) -> String {
    format!(
        "{}/wizard/{}/step/{}",
        site_root.trim_end_matches('/'),
        session_id,
        step_id
    )
}

/// Renders the "Back to ..." navigation box
pub struct BackLinkRenderer {
    hbs: Handlebars<'static>,
}

impl BackLinkRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_template_string(BACK_LINK_TEMPLATE_NAME, BACK_LINK_TEMPLATE)?;
        Ok(Self { hbs })
    }

    /// Render `link` as an HTML fragment; label and URL are HTML-escaped
    pub fn render(
        &self,
        site_root: &str,
        session_id: &str,
        link: &BackLink,
    ) -> Result<String, RenderError> {
        let data = json!({
            "href": step_url(site_root, session_id, &link.step_id),
            "label": link.label,
        });
        self.hbs.render(BACK_LINK_TEMPLATE_NAME, &data)
    }
}
