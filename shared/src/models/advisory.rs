//! Advisory feed models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Advisory severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorySeverity {
    Info,
    Warning,
    Critical,
}

impl std::str::FromStr for AdvisorySeverity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(AdvisorySeverity::Info),
            "warning" => Ok(AdvisorySeverity::Warning),
            "critical" => Ok(AdvisorySeverity::Critical),
            _ => Err("Unknown advisory severity"),
        }
    }
}

/// A published farming advisory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: AdvisorySeverity,
    pub date: DateTime<Utc>,
}

/// Advisory hub article category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ArticleCategory {
    #[serde(rename = "Crop Care", alias = "crop-care")]
    CropCare,
    #[serde(rename = "Soil Management", alias = "soil-management")]
    SoilManagement,
    #[serde(rename = "Government Schemes", alias = "government-schemes")]
    GovernmentSchemes,
    #[serde(rename = "Pest Control", alias = "pest-control")]
    PestControl,
}

impl ArticleCategory {
    /// Categories in hub display order
    pub const ALL: [ArticleCategory; 4] = [
        ArticleCategory::CropCare,
        ArticleCategory::SoilManagement,
        ArticleCategory::GovernmentSchemes,
        ArticleCategory::PestControl,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ArticleCategory::CropCare => "Crop Care",
            ArticleCategory::SoilManagement => "Soil Management",
            ArticleCategory::GovernmentSchemes => "Government Schemes",
            ArticleCategory::PestControl => "Pest Control",
        }
    }
}

impl std::fmt::Display for ArticleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ArticleCategory {
    type Err = &'static str;

    /// Accepts the display label or its kebab-case form, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', " ");
        Self::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted)
            .ok_or("Unknown article category")
    }
}

/// An advisory hub article
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryArticle {
    pub id: String,
    pub title: String,
    pub category: ArticleCategory,
    pub summary: String,
    pub image_id: String,
    pub url: String,
}

impl AdvisoryArticle {
    /// Case-insensitive match on title or summary; an empty term matches everything
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.title.to_lowercase().contains(&term)
            || self.summary.to_lowercase().contains(&term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&ArticleCategory::GovernmentSchemes).unwrap();
        assert_eq!(json, "\"Government Schemes\"");

        let parsed: ArticleCategory = serde_json::from_str("\"pest-control\"").unwrap();
        assert_eq!(parsed, ArticleCategory::PestControl);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Crop Care".parse(), Ok(ArticleCategory::CropCare));
        assert_eq!("soil-management".parse(), Ok(ArticleCategory::SoilManagement));
        assert!("Weather".parse::<ArticleCategory>().is_err());
    }

    #[test]
    fn test_article_search_ignores_case() {
        let article = AdvisoryArticle {
            id: "cc-01".to_string(),
            title: "Effective Wheat Cultivation Techniques".to_string(),
            category: ArticleCategory::CropCare,
            summary: "Best practices from sowing to harvesting.".to_string(),
            image_id: "crop-care-1".to_string(),
            url: "#".to_string(),
        };

        assert!(article.matches_search("WHEAT"));
        assert!(article.matches_search("sowing"));
        assert!(article.matches_search(""));
        assert!(!article.matches_search("cotton"));
    }
}
