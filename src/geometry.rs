//! Page geometry and typography constants. These values define the visual
//! contract of the generated documents; pagination and every fixed anchor
//! derive from them.

/// Content width reference for column offsets.
pub const PAGE_WIDTH: f32 = 592.0;

/// Side margin.
pub const BASE_MARGIN: f32 = 30.0;

/// Top margin.
pub const BASE_MARGIN_TOP: f32 = 40.0;

/// Top offset of the running page header text.
pub const HEADER_MARGIN_TOP: f32 = 5.0;

/// Maximum usable page height; the single threshold gating all pagination
/// decisions.
pub const MAX_PAGE_HEIGHT: f32 = 900.0;

/// Width of the right-hand info column (title, metas, totals panel).
pub const COLUMN_WIDTH: f32 = 250.0;

// Item table column offsets, as fractions of the page width.
pub const ITEM_COL_UNIT_PRICE_OFFSET: f32 = PAGE_WIDTH * 0.40;
pub const ITEM_COL_QUANTITY_OFFSET: f32 = PAGE_WIDTH * 0.50;
pub const ITEM_COL_TOTAL_NO_TAX_OFFSET: f32 = PAGE_WIDTH * 0.55;
pub const ITEM_COL_DISCOUNT_OFFSET: f32 = PAGE_WIDTH * 0.69;
pub const ITEM_COL_TAX_OFFSET: f32 = PAGE_WIDTH * 0.75;
pub const ITEM_COL_TOTAL_WITH_TAX_OFFSET: f32 = PAGE_WIDTH * 0.85;

// Text sizes
pub const BASE_TEXT_FONT_SIZE: f32 = 8.0;
pub const SMALL_TEXT_FONT_SIZE: f32 = 7.0;
pub const LARGE_TEXT_FONT_SIZE: f32 = 10.0;
pub const TITLE_FONT_SIZE: f32 = 14.0;

// Block-local spacing
pub const TITLE_MARGIN: f32 = 6.0;
pub const ITEM_FONT_SIZE: f32 = 8.0;
pub const ITEM_TITLE_MARGIN: f32 = 6.0;
pub const ITEMS_PADDING_TOP: f32 = 40.0;
pub const ITEM_ROW_GAP: f32 = 6.0;
pub const METAS_FONT_SIZE: f32 = 8.0;
pub const CONTACT_MARGIN: f32 = 3.0;
pub const TOTAL_MARGIN: f32 = 5.0;

/// Display height of a contact logo; width follows the image aspect ratio.
pub const LOGO_HEIGHT: f32 = 80.0;

/// The single font family used throughout.
pub const FONT_FAMILY: &str = "Helvetica";
