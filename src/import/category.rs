//! Coarse subject category from a Dewey-style call number.

use crate::domain::{Category, CategoryDefaults, CategoryRepository, DomainError};
use crate::models::category::DEFAULT_COLOR;

pub const IMPORTED_CATEGORY_DESCRIPTION: &str = "Auto-generated category from library import";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDef {
    pub name: &'static str,
    pub color: &'static str,
}

pub static GENERAL: CategoryDef = CategoryDef {
    name: "General",
    color: DEFAULT_COLOR,
};

/// Dewey main classes, indexed by their hundreds digit
pub static DEWEY_CLASSES: [CategoryDef; 10] = [
    CategoryDef {
        name: "Computer Science & Information",
        color: "#10b981",
    },
    CategoryDef {
        name: "Philosophy & Psychology",
        color: "#8b5cf6",
    },
    CategoryDef {
        name: "Religion",
        color: "#f59e0b",
    },
    CategoryDef {
        name: "Social Sciences",
        color: "#ef4444",
    },
    CategoryDef {
        name: "Language",
        color: "#06b6d4",
    },
    CategoryDef {
        name: "Natural Sciences & Mathematics",
        color: "#84cc16",
    },
    CategoryDef {
        name: "Technology & Applied Sciences",
        color: "#f97316",
    },
    CategoryDef {
        name: "Arts & Recreation",
        color: "#ec4899",
    },
    CategoryDef {
        name: "Literature",
        color: "#6366f1",
    },
    CategoryDef {
        name: "History & Geography",
        color: "#8b5a3c",
    },
];

// A bare 0 is too common to mean class 0 on its own
const COMPUTING_TOKENS: [&str; 2] = ["000", "004"];

/// How a call number is matched against the Dewey classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryMatching {
    /// Class 0 when the call number contains "000" or "004"; otherwise the lowest
    /// class `d` whose `d00` token or digit `d` occurs anywhere in it.
    /// Any digit anywhere counts, so "823.914" lands in class 1.
    #[default]
    Legacy,
    /// Class given by the first character, which must be a digit.
    LeadingDigit,
}

impl CategoryMatching {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Some(CategoryMatching::Legacy),
            "leading-digit" | "leading_digit" => Some(CategoryMatching::LeadingDigit),
            _ => None,
        }
    }
}

/// Category a call number belongs to; `General` when nothing matches.
pub fn category_for(call_number: &str, matching: CategoryMatching) -> &'static CategoryDef {
    let class = match matching {
        CategoryMatching::Legacy => legacy_class(call_number),
        CategoryMatching::LeadingDigit => call_number
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .map(|d| d as u8),
    };

    class.map_or(&GENERAL, |digit| &DEWEY_CLASSES[digit as usize])
}

fn legacy_class(call_number: &str) -> Option<u8> {
    if COMPUTING_TOKENS.iter().any(|token| call_number.contains(token)) {
        return Some(0);
    }
    (1..10u8).find(|&digit| {
        let range_token = format!("{}00", digit);
        call_number.contains(&range_token) || call_number.contains(char::from(b'0' + digit))
    })
}

/// Resolves call numbers to stored categories, creating them on first use
pub struct CategoryClassifier<'a> {
    repo: &'a dyn CategoryRepository,
    matching: CategoryMatching,
}

impl<'a> CategoryClassifier<'a> {
    pub fn new(repo: &'a dyn CategoryRepository, matching: CategoryMatching) -> Self {
        Self { repo, matching }
    }

    pub async fn classify(&self, call_number: &str) -> Result<Category, DomainError> {
        let def = category_for(call_number, self.matching);
        self.repo
            .find_or_create(
                def.name,
                CategoryDefaults {
                    description: Some(IMPORTED_CATEGORY_DESCRIPTION.to_string()),
                    color: def.color.to_string(),
                },
            )
            .await
    }
}
