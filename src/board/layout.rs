use crate::board::config::BoardConfig;

/// Margin around the board and gap between pads, in normalized window units.
const BOARD_MARGIN: f32 = 0.06;
const PAD_GAP: f32 = 0.02;

/// Pad footprint in normalized window coordinates, origin at the top left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PadRect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One on-screen pad: a note identifier, an optional trigger key, and where
/// the pad sits in the window.
#[derive(Debug, Clone)]
pub struct PadButton {
    pub index: usize,
    pub note: String,
    pub key: Option<char>,
    pub label: String,
    pub rect: PadRect,
}

/// The discovered pad set. Built once from configuration; pads are never
/// added or removed afterwards.
#[derive(Debug, Clone, Default)]
pub struct PadLayout {
    pads: Vec<PadButton>,
}

impl PadLayout {
    /// Lays the configured pads out on a grid. Key identifiers are lowered
    /// here so every later lookup is case-insensitive.
    pub fn from_config(board: &BoardConfig) -> Self {
        let columns = board.columns.max(1).min(board.pads.len().max(1));
        let rows = board.pads.len().div_ceil(columns);

        let cell_width = (1.0 - 2.0 * BOARD_MARGIN) / columns as f32;
        let cell_height = (1.0 - 2.0 * BOARD_MARGIN) / rows.max(1) as f32;

        let pads = board
            .pads
            .iter()
            .enumerate()
            .map(|(index, pad)| {
                let column = index % columns;
                let row = index / columns;
                let rect = PadRect {
                    x: BOARD_MARGIN + column as f32 * cell_width + PAD_GAP / 2.0,
                    y: BOARD_MARGIN + row as f32 * cell_height + PAD_GAP / 2.0,
                    width: cell_width - PAD_GAP,
                    height: cell_height - PAD_GAP,
                };
                PadButton {
                    index,
                    note: pad.note.clone(),
                    key: pad.key.map(|key| key.to_ascii_lowercase()),
                    label: pad.label.clone().unwrap_or_else(|| pad.note.clone()),
                    rect,
                }
            })
            .collect();

        PadLayout { pads }
    }

    /// Resolves a pointer position to the pad under it, if any.
    pub fn pad_at(&self, x: f32, y: f32) -> Option<&PadButton> {
        self.pads.iter().find(|pad| pad.rect.contains(x, y))
    }

    /// Resolves a key identifier to its pad, case-insensitively.
    pub fn pad_for_key(&self, key: char) -> Option<&PadButton> {
        let key = key.to_ascii_lowercase();
        self.pads.iter().find(|pad| pad.key == Some(key))
    }

    pub fn pad(&self, index: usize) -> Option<&PadButton> {
        self.pads.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PadButton> {
        self.pads.iter()
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::config::PadConfig;

    fn board(pads: &[(&str, Option<char>)], columns: usize) -> BoardConfig {
        BoardConfig {
            columns,
            pads: pads
                .iter()
                .map(|(note, key)| PadConfig {
                    note: note.to_string(),
                    key: *key,
                    label: None,
                })
                .collect(),
        }
    }

    #[test]
    fn pads_stay_inside_normalized_bounds() {
        let layout = PadLayout::from_config(&board(
            &[
                ("C", Some('a')),
                ("D", Some('s')),
                ("E", Some('d')),
                ("F", Some('f')),
                ("G", None),
            ],
            3,
        ));
        for pad in layout.iter() {
            assert!(pad.rect.x >= 0.0 && pad.rect.x + pad.rect.width <= 1.0);
            assert!(pad.rect.y >= 0.0 && pad.rect.y + pad.rect.height <= 1.0);
        }
        // Two rows: three pads on the first, two on the second.
        assert!(layout.pad(3).unwrap().rect.y > layout.pad(2).unwrap().rect.y);
    }

    #[test]
    fn hit_testing_resolves_pads_and_gaps() {
        let layout = PadLayout::from_config(&board(&[("C", None), ("D", None)], 2));
        let c = layout.pad(0).unwrap();
        let (cx, cy) = c.rect.center();
        assert_eq!(layout.pad_at(cx, cy).unwrap().note, "C");
        // The margin above the board belongs to no pad.
        assert!(layout.pad_at(cx, 0.01).is_none());
        // Neither does the gap between the two pads.
        let d = layout.pad(1).unwrap();
        let between = (c.rect.x + c.rect.width + d.rect.x) / 2.0;
        assert!(layout.pad_at(between, cy).is_none());
    }

    #[test]
    fn key_lookup_is_case_insensitive() {
        let layout = PadLayout::from_config(&board(&[("C", Some('A'))], 1));
        assert_eq!(layout.pad_for_key('a').unwrap().note, "C");
        assert_eq!(layout.pad_for_key('A').unwrap().note, "C");
        assert!(layout.pad_for_key('z').is_none());
    }

    #[test]
    fn an_empty_board_resolves_nothing() {
        let layout = PadLayout::from_config(&board(&[], 7));
        assert!(layout.is_empty());
        assert!(layout.pad_at(0.5, 0.5).is_none());
        assert!(layout.pad_for_key('a').is_none());
    }

    #[test]
    fn labels_default_to_the_note_name() {
        let layout = PadLayout::from_config(&board(&[("C", None)], 1));
        assert_eq!(layout.pad(0).unwrap().label, "C");
    }
}
