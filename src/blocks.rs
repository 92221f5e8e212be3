//! Fixed block measurements shared by the layout engine: logo sizing,
//! address block and totals panel heights, item column widths. Heights
//! reported here must match what the layout engine actually draws, or the
//! running cursor drifts.

use crate::error::BuildError;
use crate::geometry::*;

/// Display size of a logo: fixed height, width from the decoded aspect
/// ratio. Fails on a malformed payload; there is no placeholder path.
pub fn logo_display_size(data: &[u8]) -> Result<(f32, f32), BuildError> {
    let img = image::load_from_memory(data).map_err(|e| BuildError::ImageDecode(e.to_string()))?;
    let (w, h) = (img.width() as f32, img.height() as f32);
    if h == 0.0 {
        return Err(BuildError::ImageDecode("image has zero height".to_string()));
    }
    Ok((LOGO_HEIGHT * w / h, LOGO_HEIGHT))
}

/// Height of the shaded address block: one line height per display line
/// plus one spare, padded by the contact margin.
pub fn address_block_height(line_count: usize) -> f32 {
    LARGE_TEXT_FONT_SIZE * (line_count as f32 + 1.0) + CONTACT_MARGIN * 2.0
}

/// Width available to the item name/description sub-column.
pub fn item_text_width() -> f32 {
    ITEM_COL_UNIT_PRICE_OFFSET - BASE_MARGIN - ITEM_TITLE_MARGIN * 2.0
}

/// Worst-case height of the totals panel, used for the break check before
/// notes/totals are drawn. The discount row adds a fixed increment.
pub fn totals_panel_height(has_discount: bool) -> f32 {
    if has_discount {
        45.0
    } else {
        30.0
    }
}
