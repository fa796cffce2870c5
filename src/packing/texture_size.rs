use super::Size;

/// Smallest texture width ever proposed before rounding up.
const MIN_TEXTURE_WIDTH: u32 = 127;

/// Estimate the side of a new square texture for the fragments still waiting
/// to be placed.
///
/// The estimate starts from the square root of the remaining area, adds the
/// padding overhead of one row of blocks, rounds up to a power of two and
/// halves the result again when the remaining fragments would fill too little
/// of it. `force_single` disables the halving. The caller clamps the result
/// to its maximum texture size.
pub fn most_suitable_width(
    remaining_area: u64,
    block_size: Size,
    padding: u32,
    force_single: bool,
) -> u32 {
    let block_w = block_size.width.max(1);
    let block_h = block_size.height.max(1);

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let mut width = ((remaining_area as f32 * block_w as f32 / block_h as f32).sqrt() + 0.5) as u32;
    width += (width / block_w + 1) * padding;
    if block_w < block_h {
        width = width * block_h / block_w;
    }
    width = width.max(MIN_TEXTURE_WIDTH).max(block_w.max(block_h));
    width = next_power_above(width);

    let side = f64::from(width);
    #[allow(clippy::cast_precision_loss)]
    let fill_ratio = remaining_area as f64 / (side * side);
    let threshold = if force_single {
        0.0
    } else if width > 512 {
        0.6
    } else if width > 128 {
        0.4
    } else {
        0.0
    };

    if fill_ratio > threshold {
        width
    } else {
        width >> 1
    }
}

/// Smallest power of two strictly greater than `n` (128 for 127, 256 for 128).
fn next_power_above(n: u32) -> u32 {
    let mut v = n;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v.saturating_add(1)
}
