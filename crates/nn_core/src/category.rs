use std::fmt;

/// Categories the archive knows how to style. Articles may carry labels
/// outside this set; those render with [`CategoryColor::Gray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Technology,
    Science,
    Entertainment,
    Politics,
    Business,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Technology,
        Category::Science,
        Category::Entertainment,
        Category::Politics,
        Category::Business,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Science => "Science",
            Category::Entertainment => "Entertainment",
            Category::Politics => "Politics",
            Category::Business => "Business",
        }
    }

    pub fn color(&self) -> CategoryColor {
        match self {
            Category::Technology => CategoryColor::Blue,
            Category::Entertainment => CategoryColor::Rose,
            Category::Science => CategoryColor::Purple,
            Category::Politics => CategoryColor::Green,
            Category::Business => CategoryColor::Yellow,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Styling token for a category chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryColor {
    Blue,
    Rose,
    Purple,
    Green,
    Yellow,
    Gray,
}

impl CategoryColor {
    /// Utility classes for the web front end.
    pub fn class(&self) -> &'static str {
        match self {
            CategoryColor::Blue => "text-blue-400 bg-blue-400/10",
            CategoryColor::Rose => "text-rose-400 bg-rose-400/10",
            CategoryColor::Purple => "text-purple-400 bg-purple-400/10",
            CategoryColor::Green => "text-green-400 bg-green-400/10",
            CategoryColor::Yellow => "text-yellow-400 bg-yellow-400/10",
            CategoryColor::Gray => "text-gray-400 bg-gray-400/10",
        }
    }

    /// 8-bit RGB approximation of the chip's text color, for terminals.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            CategoryColor::Blue => (96, 165, 250),
            CategoryColor::Rose => (251, 113, 133),
            CategoryColor::Purple => (192, 132, 252),
            CategoryColor::Green => (74, 222, 128),
            CategoryColor::Yellow => (250, 204, 21),
            CategoryColor::Gray => (156, 163, 175),
        }
    }
}

/// Total: any label yields a token, unknown ones the shared fallback.
pub fn category_color(label: &str) -> CategoryColor {
    Category::from_label(label)
        .map(|c| c.color())
        .unwrap_or(CategoryColor::Gray)
}
