//! Department and requirement-category classification for planned courses

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Prefixes that name a requirement category, not a department
const CATEGORY_PREFIXES: [&str; 5] = ["FC", "CC", "CT", "CPA", "CVA"];

/// Department codes recognised as real departments
const DEPARTMENTS: [&str; 28] = [
    "ANT", "ARC", "BIO", "CHM", "CS", "CW", "ECO", "EES", "ENG", "ENT", "ES", "EVS", "FIN", "HIS",
    "IR", "JM", "LAN", "MATH", "MS", "PA", "PHI", "PHY", "POL", "PSY", "SOA", "SOC", "SPA", "VA",
];

/// Title fragments (lowercase) of foundation courses that may lack an `FC-` code
const FOUNDATION_TITLES: [&str; 12] = [
    "great books",
    "indian civilizations",
    "introduction to critical thinking",
    "critical thinking seminar",
    "environmental studies",
    "mind and behaviour",
    "principles of science",
    "economy, politics and society",
    "literature and the world",
    "quantitative reasoning",
    "trends in world history",
    "social and political formations",
];

static DEPT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2,4})-").expect("department prefix pattern is valid"));

/// Requirement category of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    /// Foundation course
    Foundation,
    /// Co-curricular course
    CoCurricular,
    /// Major requirement or elective
    Major,
    /// Minor requirement
    Minor,
    /// Open credit
    Open,
    /// Concentration requirement
    Concentration,
}

impl Category {
    /// Short label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Foundation => "FC",
            Self::CoCurricular => "CC",
            Self::Major => "Major",
            Self::Minor => "Minor",
            Self::Open => "Open",
            Self::Concentration => "Concentration",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fc" | "foundation" => Ok(Self::Foundation),
            "cc" | "co-curricular" | "cocurricular" => Ok(Self::CoCurricular),
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "open" | "open credit" => Ok(Self::Open),
            "concentration" => Ok(Self::Concentration),
            _ => Err(format!("Unknown course category: '{s}'")),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

/// Department and category of a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Department code, `None` for category-only codes and unknown prefixes
    pub dept_code: Option<String>,
    /// Requirement category
    pub course_type: Category,
}

/// Classify a course by its code and title.
///
/// The classifier only ever answers Foundation, Co-curricular or Major;
/// Minor, Open and Concentration come from explicit user overrides.
#[must_use]
pub fn classify(raw_code: Option<&str>, title: &str) -> Classification {
    let code = primary_code(raw_code);
    Classification {
        dept_code: code.as_deref().and_then(dept_code),
        course_type: course_type(code.as_deref(), title),
    }
}

/// First `/`-separated code, trimmed and uppercased.
fn primary_code(raw_code: Option<&str>) -> Option<String> {
    raw_code?
        .split('/')
        .map(str::trim)
        .find(|c| !c.is_empty())
        .map(str::to_uppercase)
}

fn dept_code(code: &str) -> Option<String> {
    let prefix = DEPT_PREFIX_RE.captures(code)?.get(1)?.as_str();
    if CATEGORY_PREFIXES.contains(&prefix) {
        return None;
    }
    let prefix = if prefix == "MAT" { "MATH" } else { prefix };
    DEPARTMENTS
        .contains(&prefix)
        .then(|| prefix.to_string())
}

fn course_type(code: Option<&str>, title: &str) -> Category {
    if let Some(code) = code {
        if code.starts_with("FC-") || code.starts_with("CT-") {
            return Category::Foundation;
        }
        if code.starts_with("CPA-") || code.starts_with("CVA-") {
            return Category::CoCurricular;
        }
    }

    let title = title.to_lowercase();
    if FOUNDATION_TITLES.iter().any(|name| title.contains(name)) {
        Category::Foundation
    } else {
        Category::Major
    }
}

/// Quantized course size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CreditSize {
    /// Two-credit course
    Two,
    /// Four-credit course
    Four,
    /// Eight-credit course (thesis/capstone)
    Eight,
}

impl CreditSize {
    /// Snap a credit value into one of the three sizes.
    ///
    /// NaN snaps to the smallest size.
    #[must_use]
    pub fn snap(value: f64) -> Self {
        if value.is_nan() || value <= 2.0 {
            Self::Two
        } else if value <= 4.0 {
            Self::Four
        } else {
            Self::Eight
        }
    }

    /// Credits this size stands for
    #[must_use]
    pub const fn credits(self) -> f64 {
        match self {
            Self::Two => 2.0,
            Self::Four => 4.0,
            Self::Eight => 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foundation_code() {
        let c = classify(Some("FC-0102"), "Great Books");
        assert_eq!(c.dept_code, None);
        assert_eq!(c.course_type, Category::Foundation);
        assert_eq!(c.course_type.to_string(), "FC");
    }

    #[test]
    fn test_co_curricular_code() {
        let c = classify(Some("CPA-0080"), "Leadership");
        assert_eq!(c.dept_code, None);
        assert_eq!(c.course_type.to_string(), "CC");
        assert_eq!(classify(Some("CVA-0101"), "Dance").course_type, Category::CoCurricular);
    }

    #[test]
    fn test_cross_listed_takes_first_code() {
        let c = classify(Some("CS-1101/PHY-1101"), "Intro");
        assert_eq!(c.dept_code.as_deref(), Some("CS"));
        assert_eq!(c.course_type, Category::Major);
    }

    #[test]
    fn test_mat_is_math() {
        assert_eq!(
            classify(Some("MAT-1001"), "Calculus").dept_code.as_deref(),
            Some("MATH")
        );
    }

    #[test]
    fn test_unknown_prefix_has_no_department() {
        assert_eq!(classify(Some("XYZ-1001"), "Mystery").dept_code, None);
        assert_eq!(classify(Some("CS1101"), "No dash").dept_code, None);
        assert_eq!(classify(None, "Untitled").dept_code, None);
    }

    #[test]
    fn test_ct_prefix_is_foundation_without_department() {
        let c = classify(Some("CT-1001"), "Critical Thinking");
        assert_eq!(c.dept_code, None);
        assert_eq!(c.course_type, Category::Foundation);
    }

    #[test]
    fn test_foundation_by_title() {
        let c = classify(Some("HIS-1001"), "Trends in World History");
        assert_eq!(c.dept_code.as_deref(), Some("HIS"));
        assert_eq!(c.course_type, Category::Foundation);
        assert_eq!(
            classify(None, "MIND AND BEHAVIOUR").course_type,
            Category::Foundation
        );
    }

    #[test]
    fn test_lowercase_code_is_normalised() {
        assert_eq!(classify(Some(" eco-1001 "), "Micro").dept_code.as_deref(), Some("ECO"));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("minor".parse::<Category>(), Ok(Category::Minor));
        assert_eq!("FC".parse::<Category>(), Ok(Category::Foundation));
        assert!("elective".parse::<Category>().is_err());
    }

    #[test]
    fn test_credit_snapping() {
        assert_eq!(CreditSize::snap(1.0), CreditSize::Two);
        assert_eq!(CreditSize::snap(2.0), CreditSize::Two);
        assert_eq!(CreditSize::snap(3.0), CreditSize::Four);
        assert_eq!(CreditSize::snap(4.0), CreditSize::Four);
        assert_eq!(CreditSize::snap(6.0), CreditSize::Eight);
        assert_eq!(CreditSize::snap(f64::NAN), CreditSize::Two);
        assert!((CreditSize::Eight.credits() - 8.0).abs() < f64::EPSILON);
    }
}
