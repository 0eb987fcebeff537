//! HTML fragments built from the service's read models.

use crate::domain::{ContributorView, EditForm};

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Heading followed by one linked avatar and name per contributor.
///
/// Returns an empty string for an empty list so callers never emit an
/// empty wrapper.
pub fn render_contributor_block(views: &[ContributorView], heading: &str) -> String {
    if views.is_empty() {
        return String::new();
    }

    let mut html = format!("<p><span>{}</span></p>", escape_html(heading));
    html.push_str("<div class=\"post-contributors\">");
    for view in views {
        html.push_str(&format!(
            "<div class=\"contributor-item\"><a href=\"{}\">\
             <img class=\"contributor-avatar\" src=\"{}\" alt=\"\" /> {}</a></div>",
            escape_html(&view.profile_url),
            escape_html(&view.avatar_url),
            escape_html(&view.display_name),
        ));
    }
    html.push_str("</div>");
    html
}

/// Content filter: appends the contributor block on singular views only.
pub fn append_contributor_block(
    content: &str,
    views: &[ContributorView],
    heading: &str,
    singular: bool,
) -> String {
    if !singular || views.is_empty() {
        return content.to_string();
    }

    let mut out = String::from(content);
    out.push_str(&render_contributor_block(views, heading));
    out
}

/// Checkbox list plus the hidden anti-forgery token field.
pub fn render_edit_form(form: &EditForm) -> String {
    let mut html = format!(
        "<input type=\"hidden\" name=\"{}\" value=\"{}\" />",
        EditForm::TOKEN_FIELD_NAME,
        escape_html(form.token.as_str()),
    );
    for option in &form.options {
        html.push_str(&format!(
            "<label><input type=\"checkbox\" name=\"{}[]\" value=\"{}\"{} /> {}</label>",
            escape_html(&form.field_name),
            option.contributor_id,
            if option.checked { " checked" } else { "" },
            escape_html(&option.display_name),
        ));
    }
    html
}
