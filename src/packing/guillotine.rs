use super::{Position, Size, Zone};

/// Placement of a fragment: which registered image it came from and its
/// handle inside that image's fragment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentRef {
    pub image: usize,
    pub fragment: crate::sprite::FragmentId,
}

/// A rectangle of space inside one output texture.
///
/// Free slices have no fragment; used slices carry the fragment placed in them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    texture: usize,
    pub zone: Zone,
    pub fragment: Option<FragmentRef>,
}

impl Slice {
    pub fn new(texture: usize, zone: Zone) -> Self {
        Self {
            texture,
            zone,
            fragment: None,
        }
    }

    pub fn texture(&self) -> usize {
        self.texture
    }
}

/// Guillotine free-space bookkeeping across every output texture.
///
/// Free slices are scanned first-fit in insertion order.
#[derive(Debug, Default)]
pub struct GuillotinePacker {
    padding: u32,
    free_slices: Vec<Slice>,
}

impl GuillotinePacker {
    pub fn new(padding: u32) -> Self {
        Self {
            padding,
            free_slices: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.free_slices.clear();
    }

    pub fn free_slices(&self) -> &[Slice] {
        &self.free_slices
    }

    /// Register a fresh square texture: its interior minus one padding border.
    pub fn add_texture(&mut self, texture: usize, width: u32) {
        let inner = width.saturating_sub(self.padding * 2);
        self.free_slices.push(Slice::new(
            texture,
            Zone::new(self.padding, self.padding, inner, inner),
        ));
    }

    /// Take the first free slice that holds `size`, split off the leftover
    /// space and return the slice shrunk to `size`.
    pub fn find_free_slice(&mut self, size: Size) -> Option<Slice> {
        let index = self
            .free_slices
            .iter()
            .position(|slice| slice.zone.contains(size))?;
        let mut slice = self.free_slices.remove(index);
        let zone = slice.zone;
        let padding = self.padding;

        // The cut along the placed rect's longer edge keeps the full extent
        let (bottom_width, right_height) = if size.width >= size.height {
            (size.width, zone.size.height)
        } else {
            (zone.size.width, size.height)
        };

        let bottom_height = zone.size.height - size.height;
        if bottom_height > padding * 2 {
            self.free_slices.push(Slice::new(
                slice.texture,
                Zone {
                    pos: Position::new(zone.pos.x, zone.pos.y + size.height + padding),
                    size: Size::new(bottom_width, bottom_height - padding),
                },
            ));
        }

        let right_width = zone.size.width - size.width;
        if right_width > padding * 2 {
            self.free_slices.push(Slice::new(
                slice.texture,
                Zone {
                    pos: Position::new(zone.pos.x + size.width + padding, zone.pos.y),
                    size: Size::new(right_width - padding, right_height),
                },
            ));
        }

        slice.zone.size = size;
        Some(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_interior() {
        let mut packer = GuillotinePacker::new(1);
        packer.add_texture(0, 128);
        assert_eq!(packer.free_slices(), &[Slice::new(0, Zone::new(1, 1, 126, 126))]);
    }

    #[test]
    fn test_wide_rect_keeps_full_right_column() {
        let mut packer = GuillotinePacker::new(1);
        packer.add_texture(0, 128);

        let slice = packer.find_free_slice(Size::new(100, 40)).unwrap();
        assert_eq!(slice.zone, Zone::new(1, 1, 100, 40));

        let free = packer.free_slices();
        assert_eq!(free.len(), 2);
        // bottom: under the rect only
        assert_eq!(free[0].zone, Zone::new(1, 42, 100, 85));
        // right: full slice height
        assert_eq!(free[1].zone, Zone::new(102, 1, 25, 126));
    }

    #[test]
    fn test_tall_rect_keeps_full_bottom_row() {
        let mut packer = GuillotinePacker::new(1);
        packer.add_texture(0, 128);

        packer.find_free_slice(Size::new(40, 100)).unwrap();

        let free = packer.free_slices();
        assert_eq!(free.len(), 2);
        assert_eq!(free[0].zone, Zone::new(1, 102, 126, 25));
        assert_eq!(free[1].zone, Zone::new(42, 1, 85, 100));
    }

    #[test]
    fn test_slivers_are_discarded() {
        let mut packer = GuillotinePacker::new(1);
        packer.add_texture(0, 128);

        // Leaves 1px to the right and 2px below: both at most one padding wide
        packer.find_free_slice(Size::new(125, 124)).unwrap();
        assert!(packer.free_slices().is_empty());
    }

    #[test]
    fn test_first_fit_order() {
        let mut packer = GuillotinePacker::new(0);
        packer.add_texture(0, 64);
        packer.add_texture(1, 64);

        let first = packer.find_free_slice(Size::new(64, 64)).unwrap();
        assert_eq!(first.texture(), 0);
        let second = packer.find_free_slice(Size::new(10, 10)).unwrap();
        assert_eq!(second.texture(), 1);
        assert!(packer.find_free_slice(Size::new(64, 64)).is_none());
    }

    #[test]
    fn test_no_fit_leaves_pool_untouched() {
        let mut packer = GuillotinePacker::new(1);
        packer.add_texture(0, 64);
        assert!(packer.find_free_slice(Size::new(63, 10)).is_none());
        assert_eq!(packer.free_slices().len(), 1);
    }

    #[test]
    fn test_splits_never_overlap_used_space() {
        let mut packer = GuillotinePacker::new(1);
        packer.add_texture(0, 256);

        let sizes = [(100, 60), (30, 90), (50, 50), (20, 10), (70, 20), (40, 40)];
        let mut used = Vec::new();
        for (w, h) in sizes {
            if let Some(slice) = packer.find_free_slice(Size::new(w, h)) {
                used.push(slice.zone);
            }
        }

        for (i, a) in used.iter().enumerate() {
            for b in used.iter().skip(i + 1) {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
            for free in packer.free_slices() {
                assert!(!a.intersects(&free.zone));
            }
        }
    }
}
