//! Column configuration tree and its flattened/derived forms.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fallback pixel width for leaf columns that configure neither `width`
/// nor `minWidth`.
pub const DEFAULT_COLUMN_WIDTH: f32 = 100.0;

/// Horizontal alignment for cell or header content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    /// Left-aligned (default)
    #[default]
    Left,
    /// Centered
    Center,
    /// Right-aligned
    Right,
}

/// Which edge a column is pinned to during horizontal scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixedPosition {
    /// Not pinned (default)
    #[default]
    None,
    /// Pinned to the left edge
    Left,
    /// Pinned to the right edge
    Right,
}

impl FixedPosition {
    /// True for either pinned side.
    #[must_use]
    pub fn is_fixed(self) -> bool {
        self != Self::None
    }
}

// Configuration accepts "none"/"left"/"right" plus the legacy boolean
// alias where `true` means left-pinned.
impl<'de> Deserialize<'de> for FixedPosition {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(Self::Left),
            Raw::Flag(false) => Ok(Self::None),
            Raw::Name(name) => match name.as_str() {
                "left" => Ok(Self::Left),
                "right" => Ok(Self::Right),
                "none" | "" => Ok(Self::None),
                other => Err(serde::de::Error::unknown_variant(
                    other,
                    &["none", "left", "right"],
                )),
            },
        }
    }
}

impl Serialize for FixedPosition {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let name = match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Right => "right",
        };
        serializer.serialize_str(name)
    }
}

/// Direction of an active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// The default toggle cycle: ascending, descending, then cleared.
#[must_use]
pub fn default_sort_orders() -> Vec<Option<SortOrder>> {
    vec![Some(SortOrder::Ascending), Some(SortOrder::Descending), None]
}

/// A node of the declarative column configuration tree.
///
/// A node with `children` is a group header cell spanning all its
/// descendants; a node without children is a leaf bound to a data field
/// through `prop`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Column {
    /// Field key this column reads from each row. Absent for pure group headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prop: Option<String>,
    /// Header label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Explicit pixel width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// Minimum pixel width, used when `width` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f32>,
    /// Body cell alignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
    /// Header cell alignment (falls back to `align`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_align: Option<Alignment>,
    /// Pinned side. Unset inherits the nearest ancestor's value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<FixedPosition>,
    /// Whether header clicks cycle this column's sort order
    pub sortable: bool,
    /// The sort toggle cycle for this column
    pub sort_orders: Vec<Option<SortOrder>>,
    /// Opaque reference to a host-registered comparator capability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_script: Option<String>,
    /// Child columns. Non-empty makes this node a group header.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Column>,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            prop: None,
            label: None,
            width: None,
            min_width: None,
            align: None,
            header_align: None,
            fixed: None,
            sortable: false,
            sort_orders: default_sort_orders(),
            sort_script: None,
            children: Vec::new(),
        }
    }
}

impl Column {
    /// Create a leaf column bound to a data field.
    #[must_use]
    pub fn field(prop: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            prop: Some(prop.into()),
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Create a group header spanning `children`.
    #[must_use]
    pub fn group(label: impl Into<String>, children: Vec<Column>) -> Self {
        Self {
            label: Some(label.into()),
            children,
            ..Self::default()
        }
    }

    /// True when this node has no children and is bound to data.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A leaf of the column tree after flattening.
///
/// `fixed` is resolved (a leaf without its own value inherits the nearest
/// ancestor's), and `index` records the depth-first, left-to-right
/// traversal position, the authoritative column order for both header
/// and body rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafColumn {
    /// Position in depth-first traversal order
    pub index: usize,
    /// Field key this column reads from each row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prop: Option<String>,
    /// Header label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Explicit pixel width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// Minimum pixel width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f32>,
    /// Body cell alignment
    pub align: Alignment,
    /// Header cell alignment
    pub header_align: Alignment,
    /// Resolved pinned side
    pub fixed: FixedPosition,
    /// Whether header clicks cycle this column's sort order
    pub sortable: bool,
    /// The sort toggle cycle for this column
    pub sort_orders: Vec<Option<SortOrder>>,
    /// Opaque reference to a host-registered comparator capability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_script: Option<String>,
}

impl LeafColumn {
    /// Pixel width used for pinning offsets: `width`, else `minWidth`,
    /// else [`DEFAULT_COLUMN_WIDTH`].
    #[must_use]
    pub fn resolved_width(&self) -> f32 {
        self.width
            .or(self.min_width)
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }
}

/// A derived header grid cell.
///
/// `col_span` is the number of leaf descendants (minimum 1). `row_span`
/// is 1 for group headers and stretches leaves down to the bottom header
/// row so every leaf reaches it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    /// Field key, for leaf cells
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prop: Option<String>,
    /// Header label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Header alignment (headerAlign, falling back to align)
    pub align: Alignment,
    /// Resolved pinned side
    pub fixed: FixedPosition,
    /// Whether this cell accepts sort toggles
    pub sortable: bool,
    /// Number of leaf columns spanned
    pub col_span: usize,
    /// Number of header rows spanned
    pub row_span: usize,
    /// True when this cell is a leaf column
    pub is_leaf: bool,
    /// Index into the flattened leaf list, for leaf cells
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaf_index: Option<usize>,
}
