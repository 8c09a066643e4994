use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bookmark {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub category: String,
}

/// Body of a POST or PUT request. Missing fields come through as empty
/// strings so that validation, not deserialization, rejects them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NewBookmark {
    pub id: Option<i64>,
    pub name: String,
    pub url: String,
    pub category: String,
}

impl NewBookmark {
    pub fn new(name: &str, url: &str, category: &str) -> Self {
        NewBookmark {
            id: None,
            name: name.to_owned(),
            url: url.to_owned(),
            category: category.to_owned(),
        }
    }

    pub fn with_id(self, id: i64) -> Bookmark {
        Bookmark {
            id,
            name: self.name,
            url: self.url,
            category: self.category,
        }
    }
}

/// Field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Category,
}

impl SortField {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Name" => Some(SortField::Name),
            "Category" => Some(SortField::Category),
            _ => None,
        }
    }

    pub fn value<'a>(&self, bookmark: &'a Bookmark) -> &'a str {
        match self {
            SortField::Name => &bookmark.name,
            SortField::Category => &bookmark.category,
        }
    }
}
