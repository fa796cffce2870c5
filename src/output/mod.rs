mod format;
mod xml;

pub use format::save_texture;
pub use xml::{render_descriptor, write_xml};

/// File name of one output texture: `<prefix>_<index>.<suffix>`
pub fn texture_file_name(prefix: &str, index: usize, suffix: &str) -> String {
    format!("{}_{}.{}", prefix, index, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_file_name() {
        assert_eq!(texture_file_name("hero", 0, "png"), "hero_0.png");
        assert_eq!(texture_file_name("ui/icons", 12, "bmp"), "ui/icons_12.bmp");
    }
}
