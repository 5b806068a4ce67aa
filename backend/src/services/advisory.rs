//! Advisory feed and advisory hub services
//!
//! Serves the published farming advisories shown on the alerts page and
//! the advisory hub's article library.

use chrono::{DateTime, TimeZone, Utc};
use shared::{Advisory, AdvisoryArticle, AdvisorySeverity, ArticleCategory};

use crate::error::{AppError, AppResult};

/// Advisory feed
#[derive(Clone)]
pub struct AdvisoryService {
    advisories: Vec<Advisory>,
}

impl AdvisoryService {
    /// Service over the built-in advisories
    pub fn new() -> Self {
        Self::with_advisories(builtin_advisories())
    }

    pub fn with_advisories(mut advisories: Vec<Advisory>) -> Self {
        advisories.sort_by(|a, b| b.date.cmp(&a.date));
        Self { advisories }
    }

    /// Advisories newest first, optionally restricted to one severity
    pub fn list(&self, severity: Option<AdvisorySeverity>) -> Vec<Advisory> {
        self.advisories
            .iter()
            .filter(|a| severity.map_or(true, |s| a.severity == s))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> AppResult<Advisory> {
        self.advisories
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Advisory".to_string()))
    }
}

impl Default for AdvisoryService {
    fn default() -> Self {
        Self::new()
    }
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

fn builtin_advisories() -> Vec<Advisory> {
    vec![
        Advisory {
            id: "alert-1".to_string(),
            title: "Pest Risk Alert: High Humidity".to_string(),
            description: "High humidity and recent rainfall increase the risk of fungal diseases and aphid infestations. Monitor crops closely.".to_string(),
            severity: AdvisorySeverity::Warning,
            date: at(2024, 7, 20, 10, 30),
        },
        Advisory {
            id: "alert-2".to_string(),
            title: "Heatwave Warning for Next 48 Hours".to_string(),
            description: "Temperatures are expected to exceed 40°C. Ensure adequate irrigation for all crops to prevent heat stress.".to_string(),
            severity: AdvisorySeverity::Critical,
            date: at(2024, 7, 19, 14, 0),
        },
        Advisory {
            id: "alert-3".to_string(),
            title: "PM-KISAN Scheme: Next Installment Update".to_string(),
            description: "The next installment of the PM-KISAN scheme is scheduled to be released by the end of the month. Ensure your eKYC is complete.".to_string(),
            severity: AdvisorySeverity::Info,
            date: at(2024, 7, 18, 9, 0),
        },
        Advisory {
            id: "alert-4".to_string(),
            title: "Moderate Rainfall Predicted".to_string(),
            description: "Moderate rainfall expected over the weekend. Plan harvesting activities accordingly to avoid crop damage.".to_string(),
            severity: AdvisorySeverity::Info,
            date: at(2024, 7, 17, 18, 0),
        },
        Advisory {
            id: "alert-5".to_string(),
            title: "Locust Swarm Sighting Reported".to_string(),
            description: "Small locust swarms have been reported in neighboring districts. Be vigilant and report any sightings immediately.".to_string(),
            severity: AdvisorySeverity::Critical,
            date: at(2024, 7, 16, 11, 45),
        },
    ]
}

/// Advisory hub article library
#[derive(Clone)]
pub struct ArticleService {
    articles: Vec<AdvisoryArticle>,
}

impl ArticleService {
    pub fn new() -> Self {
        Self {
            articles: builtin_articles(),
        }
    }

    /// Articles in library order, filtered by category and search term
    pub fn list(&self, category: Option<ArticleCategory>, search: Option<&str>) -> Vec<AdvisoryArticle> {
        self.articles
            .iter()
            .filter(|a| category.map_or(true, |c| a.category == c))
            .filter(|a| search.map_or(true, |term| a.matches_search(term)))
            .cloned()
            .collect()
    }

    pub fn categories(&self) -> Vec<ArticleCategory> {
        ArticleCategory::ALL.to_vec()
    }
}

impl Default for ArticleService {
    fn default() -> Self {
        Self::new()
    }
}

fn article(id: &str, title: &str, category: ArticleCategory, summary: &str, image_id: &str) -> AdvisoryArticle {
    AdvisoryArticle {
        id: id.to_string(),
        title: title.to_string(),
        category,
        summary: summary.to_string(),
        image_id: image_id.to_string(),
        url: "#".to_string(),
    }
}

fn builtin_articles() -> Vec<AdvisoryArticle> {
    use ArticleCategory::*;

    vec![
        article(
            "cc-01",
            "Effective Wheat Cultivation Techniques",
            CropCare,
            "Learn about the best practices for wheat cultivation, from sowing to harvesting, to maximize your yield.",
            "crop-care-1",
        ),
        article(
            "sm-01",
            "Understanding Soil pH and Its Importance",
            SoilManagement,
            "Discover how soil pH affects nutrient availability and crop health. Includes tips for testing and amendment.",
            "soil-management-1",
        ),
        article(
            "gs-01",
            "Guide to Pradhan Mantri Fasal Bima Yojana (PMFBY)",
            GovernmentSchemes,
            "A comprehensive overview of the flagship crop insurance scheme, including eligibility and application process.",
            "govt-scheme-1",
        ),
        article(
            "pc-01",
            "Integrated Pest Management (IPM) for Cotton",
            PestControl,
            "Implement sustainable and effective pest control strategies for your cotton crops using IPM principles.",
            "pest-control-1",
        ),
        article(
            "cc-02",
            "Advanced Irrigation Methods for Sugarcane",
            CropCare,
            "Explore drip and sprinkler irrigation systems to conserve water and improve sugarcane growth.",
            "irrigation-1",
        ),
        article(
            "sm-02",
            "The Role of Organic Matter in Soil Health",
            SoilManagement,
            "Learn how to improve soil structure, water retention, and fertility by increasing organic matter.",
            "soil-management-1",
        ),
        article(
            "gs-02",
            "How to Benefit from the PM-KISAN Scheme",
            GovernmentSchemes,
            "Step-by-step guide to enrolling in and receiving benefits from the PM-KISAN income support scheme.",
            "govt-scheme-1",
        ),
        article(
            "pc-02",
            "Natural Remedies for Common Vegetable Pests",
            PestControl,
            "Use neem oil, garlic spray, and other organic solutions to protect your vegetable garden from pests.",
            "pest-control-1",
        ),
    ]
}
