// Static catalog of the site's tools, used for cards and navigation

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Calculator,
    Counter,
    Converter,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Calculator, Category::Counter, Category::Converter];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Calculator => "calculator",
            Category::Counter => "counter",
            Category::Converter => "converter",
        }
    }

    /// Accepts the singular or plural name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let name = name.strip_suffix('s').unwrap_or(&name);
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ToolEntry {
    pub name: &'static str,
    pub category: Category,
    pub path: &'static str,
    pub description: &'static str,
}

const fn tool(
    name: &'static str,
    category: Category,
    path: &'static str,
    description: &'static str,
) -> ToolEntry {
    ToolEntry {
        name,
        category,
        path,
        description,
    }
}

static TOOLS: &[ToolEntry] = &[
    tool(
        "BMI Calculator",
        Category::Calculator,
        "/tools/bmi-calculator",
        "Body mass index from height and weight",
    ),
    tool(
        "Age Calculator",
        Category::Calculator,
        "/tools/age-calculator",
        "Exact age in years, months and days",
    ),
    tool(
        "Factorial Calculator",
        Category::Calculator,
        "/tools/factorial-calculator",
        "Factorials of large integers",
    ),
    tool(
        "Prime Number Checker",
        Category::Calculator,
        "/tools/prime-checker",
        "Check whether a number is prime",
    ),
    tool(
        "Percentage Change Calculator",
        Category::Calculator,
        "/tools/percentage-change",
        "Increase or decrease between two values",
    ),
    tool(
        "Percentage Calculator",
        Category::Calculator,
        "/tools/percentage-calculator",
        "What is X percent of Y",
    ),
    tool(
        "Loan EMI Calculator",
        Category::Calculator,
        "/tools/emi-calculator",
        "Monthly installment for a loan",
    ),
    tool(
        "Word Counter",
        Category::Counter,
        "/tools/word-counter",
        "Count words in a block of text",
    ),
    tool(
        "Character Counter",
        Category::Counter,
        "/tools/character-counter",
        "Count characters with and without spaces",
    ),
    tool(
        "Sentence Counter",
        Category::Counter,
        "/tools/sentence-counter",
        "Count sentences and paragraphs",
    ),
    tool(
        "Temperature Converter",
        Category::Converter,
        "/tools/temperature-converter",
        "Celsius, Fahrenheit and Kelvin",
    ),
    tool(
        "Length Converter",
        Category::Converter,
        "/tools/length-converter",
        "Metric and imperial lengths",
    ),
    tool(
        "Weight Converter",
        Category::Converter,
        "/tools/weight-converter",
        "Kilograms, pounds and ounces",
    ),
    tool(
        "Case Converter",
        Category::Converter,
        "/tools/case-converter",
        "Upper, lower, title and sentence case",
    ),
];

pub fn all() -> &'static [ToolEntry] {
    TOOLS
}

pub fn by_category(category: Category) -> impl Iterator<Item = &'static ToolEntry> {
    TOOLS.iter().filter(move |t| t.category == category)
}

pub fn find_by_path(path: &str) -> Option<&'static ToolEntry> {
    let path = path.trim_end_matches('/');
    TOOLS.iter().find(|t| t.path == path)
}

/// Categories that have at least one tool, in display order.
pub fn categories() -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|c| by_category(*c).next().is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn paths_are_unique_and_rooted() {
        let mut seen = HashSet::new();
        for t in all() {
            assert!(t.path.starts_with("/tools/"), "{}", t.path);
            assert!(seen.insert(t.path), "duplicate path {}", t.path);
        }
    }

    #[test]
    fn every_category_is_populated() {
        assert_eq!(categories(), Category::ALL.to_vec());
        let total: usize = Category::ALL.iter().map(|c| by_category(*c).count()).sum();
        assert_eq!(total, all().len());
    }

    #[test]
    fn find_by_path_ignores_trailing_slash() {
        let bmi = find_by_path("/tools/bmi-calculator/").unwrap();
        assert_eq!(bmi.name, "BMI Calculator");
        assert!(find_by_path("/tools/nope").is_none());
    }

    #[test]
    fn category_parse() {
        assert_eq!(Category::parse("Converters"), Some(Category::Converter));
        assert_eq!(Category::parse("counter"), Some(Category::Counter));
        assert_eq!(Category::parse("games"), None);
    }
}
