use risk_model::{
    DEFAULT_DISTANCE_TO_MINES_KM, DEFAULT_YEAR, DEFAULT_ZONE, FOREST_LOSS_DOMAIN, ILLNESS_DOMAIN,
};
use risk_runtime::Prediction;

use crate::catalog::{Figure, Section, SectionCatalog};

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Full page: navigation, the given body, footer.
pub fn page(catalog: &SectionCatalog, active_slug: &str, body: &str) -> String {
    let mut nav = String::new();
    for section in &catalog.sections {
        let href = section_href(section);
        let marker = if section.slug == active_slug {
            " aria-current=\"page\""
        } else {
            ""
        };
        nav.push_str(&format!(
            "<li><a href=\"{href}\"{marker}>{}</a></li>",
            escape(&section.nav)
        ));
    }

    let footer = catalog
        .footer
        .as_deref()
        .map(|text| format!("<hr><footer>{}</footer>", escape(text)))
        .unwrap_or_default();

    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body>\
         <nav><ul>{nav}</ul></nav><main>{body}</main>{footer}</body></html>",
        escape(&catalog.page_title)
    )
}

pub fn section_href(section: &Section) -> String {
    match section.kind {
        crate::catalog::SectionKind::Prediction => "/predict".to_string(),
        _ => format!("/sections/{}", section.slug),
    }
}

pub fn section_body(section: &Section) -> String {
    let mut out = format!("<h1>{}</h1>", escape(&section.title));
    for paragraph in &section.paragraphs {
        out.push_str(&format!("<p>{}</p>", escape(paragraph)));
    }
    out.push_str(&bullet_list(&section.bullets));
    for figure in &section.figures {
        out.push_str(&render_figure(figure));
    }
    out
}

pub fn closing(section: &Section) -> String {
    section
        .closing
        .as_deref()
        .map(|text| format!("<p><strong>{}</strong></p>", escape(text)))
        .unwrap_or_default()
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul>");
    for item in items {
        out.push_str(&format!("<li>{}</li>", escape(item)));
    }
    out.push_str("</ul>");
    out
}

fn render_figure(figure: &Figure) -> String {
    let caption = escape(&figure.caption);
    let mut out = format!(
        "<section><h2>{caption}</h2><figure><img src=\"/assets/{}\" alt=\"{caption}\">\
         <figcaption>{caption}</figcaption></figure>",
        escape(&figure.path)
    );
    if !figure.legend.is_empty() {
        out.push_str("<h3>Legend</h3><ul>");
        for entry in &figure.legend {
            out.push_str(&format!(
                "<li><span style=\"color:{}\">&#9632;</span> {}</li>",
                escape(&entry.color),
                escape(&entry.label)
            ));
        }
        out.push_str("</ul>");
    }
    out.push_str(&bullet_list(&figure.notes));
    out.push_str("</section>");
    out
}

/// Decision rules of the loaded tree, one per node.
pub fn rules(rules: &[String]) -> String {
    let mut out = String::from("<section><h2>Decision Rules</h2><ol start=\"0\">");
    for rule in rules {
        out.push_str(&format!("<li><code>{}</code></li>", escape(rule)));
    }
    out.push_str("</ol></section>");
    out
}

/// Form with the two adjustable controls, pre-filled with `forest` and
/// `illnesses`, then the summary of every submitted feature and the optional
/// `note`, ahead of the submit button.
pub fn prediction_form(forest: f64, illnesses: u32, note: Option<&str>) -> String {
    let note = note
        .map(|text| format!("<p class=\"info\">{}</p>", escape(text)))
        .unwrap_or_default();
    format!(
        "<form method=\"get\" action=\"/predict\">\
         <label>Forest Cover Loss (ha) \
         <input type=\"range\" name=\"forest_loss_ha\" min=\"{}\" max=\"{}\" step=\"{}\" value=\"{forest}\"></label><br>\
         <label>Reported Illnesses \
         <input type=\"range\" name=\"reported_illnesses\" min=\"{}\" max=\"{}\" step=\"{}\" value=\"{illnesses}\"></label><br>\
         <details><summary>Review Input Summary</summary><ul>\
         <li>Forest Loss: {forest} ha</li>\
         <li>Reported Illnesses: {illnesses}</li>\
         <li>Distance to Mines: {DEFAULT_DISTANCE_TO_MINES_KM:.1} km (default)</li>\
         <li>Year: {DEFAULT_YEAR}, Zone: {DEFAULT_ZONE} (default)</li>\
         </ul></details>\
         {note}\
         <button type=\"submit\">Predict Risk</button></form>",
        FOREST_LOSS_DOMAIN.min,
        FOREST_LOSS_DOMAIN.max,
        FOREST_LOSS_DOMAIN.step,
        ILLNESS_DOMAIN.min,
        ILLNESS_DOMAIN.max,
        ILLNESS_DOMAIN.step,
    )
}

pub fn prediction_result(prediction: &Prediction) -> String {
    let label = prediction.label;
    let class = if label.is_high() { "high-risk" } else { "low-risk" };
    format!(
        "<hr><div class=\"{class}\" role=\"status\"><h2>{}</h2><p>{}</p></div>",
        escape(label.headline()),
        escape(label.message())
    )
}

pub fn prediction_error(message: &str) -> String {
    format!(
        "<hr><div class=\"error\" role=\"alert\"><h2>Prediction failed</h2><p>{}</p></div>",
        escape(message)
    )
}

pub fn dataset_download() -> String {
    "<hr><h2>Download Proxy Dataset</h2>\
     <p>The proxy dataset used for model training and interpretation.</p>\
     <p><a href=\"/download/dataset\" download>Download CSV</a></p>"
        .to_string()
}
