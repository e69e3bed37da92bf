//! Dashboard section content.
//!
//! Section text, figures and legends live in a TOML catalog next to the
//! assets so the page copy can change without a rebuild.
use serde::Deserialize;
use std::path::{Component, Path};

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    #[default]
    Text,
    /// Hosts the prediction form.
    Prediction,
    /// Also lists the decision rules of the loaded tree.
    Insights,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegendEntry {
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Figure {
    /// Path relative to the asset root.
    pub path: String,
    pub caption: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub slug: String,
    pub nav: String,
    pub title: String,
    #[serde(default)]
    pub kind: SectionKind,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub figures: Vec<Figure>,
    #[serde(default)]
    pub closing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionCatalog {
    pub page_title: String,
    #[serde(default)]
    pub footer: Option<String>,
    pub sections: Vec<Section>,
}

impl SectionCatalog {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: SectionCatalog =
            toml::from_str(&contents).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sections.is_empty() {
            return Err(ConfigError::Catalog("no sections defined".to_string()));
        }

        for (i, section) in self.sections.iter().enumerate() {
            let valid_slug = !section.slug.is_empty()
                && section
                    .slug
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
            if !valid_slug {
                return Err(ConfigError::Catalog(format!(
                    "invalid slug '{}': use lowercase letters, digits and dashes",
                    section.slug
                )));
            }
            if self.sections[..i].iter().any(|s| s.slug == section.slug) {
                return Err(ConfigError::Catalog(format!(
                    "duplicate slug '{}'",
                    section.slug
                )));
            }
            for figure in &section.figures {
                if !is_relative_asset_path(&figure.path) {
                    return Err(ConfigError::Catalog(format!(
                        "figure path '{}' in section '{}' must stay inside the asset root",
                        figure.path, section.slug
                    )));
                }
            }
        }

        let prediction_sections = self
            .sections
            .iter()
            .filter(|s| s.kind == SectionKind::Prediction)
            .count();
        if prediction_sections > 1 {
            return Err(ConfigError::Catalog(
                "only one prediction section is allowed".to_string(),
            ));
        }

        Ok(())
    }

    pub fn first(&self) -> &Section {
        // validate() guarantees at least one section
        &self.sections[0]
    }

    pub fn get(&self, slug: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.slug == slug)
    }

    pub fn prediction_section(&self) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.kind == SectionKind::Prediction)
    }
}

/// True when `path` is relative and made only of normal components.
pub fn is_relative_asset_path(path: &str) -> bool {
    let path = Path::new(path);
    !path.as_os_str().is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    fn parse(source: &str) -> Result<SectionCatalog, ConfigError> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(source.as_bytes()).unwrap();
        SectionCatalog::load(file.path())
    }

    #[test]
    fn shipped_catalog_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/dashboard.toml");
        let catalog = SectionCatalog::load(&path).unwrap();
        assert_eq!(catalog.sections.len(), 6);
        assert_eq!(catalog.first().slug, "about");
        assert_eq!(
            catalog.prediction_section().map(|s| s.slug.as_str()),
            Some("risk-prediction")
        );
        assert!(catalog.get("landscape-change").is_some());
    }

    #[test]
    fn parses_figures_and_legends() {
        let catalog = parse(
            r##"
            page_title = "Test"

            [[sections]]
            slug = "maps"
            nav = "Maps"
            title = "Maps"

            [[sections.figures]]
            path = "remote_sensing/ndvi.tif"
            caption = "NDVI"

            [[sections.figures.legend]]
            color = "#FF0000"
            label = "Loss"
            "##,
        )
        .unwrap();
        let figure = &catalog.sections[0].figures[0];
        assert_eq!(figure.legend[0].label, "Loss");
        assert_eq!(catalog.sections[0].kind, SectionKind::Text);
    }

    #[test]
    fn rejects_duplicate_slugs() {
        let result = parse(
            r#"
            page_title = "Test"
            [[sections]]
            slug = "a"
            nav = "A"
            title = "A"
            [[sections]]
            slug = "a"
            nav = "B"
            title = "B"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Catalog(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn rejects_empty_catalog() {
        let result = parse(
            r#"
            page_title = "Test"
            sections = []
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Catalog(_))));
    }

    #[test]
    fn rejects_escaping_figure_paths() {
        let result = parse(
            r#"
            page_title = "Test"
            [[sections]]
            slug = "a"
            nav = "A"
            title = "A"
            [[sections.figures]]
            path = "../secrets.png"
            caption = "nope"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Catalog(_))));
    }

    #[rstest]
    #[case("images/heatmap.png", true)]
    #[case("remote_sensing/LULC_2013_colored.tif", true)]
    #[case("../model/tree_model.json", false)]
    #[case("/etc/passwd", false)]
    #[case("images/../../x", false)]
    #[case("", false)]
    fn asset_paths_must_stay_relative(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_relative_asset_path(path), expected);
    }
}
