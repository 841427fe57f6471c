/// Pixel geometry of the rating chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub canvas_width: u32,
    pub item_width: u32,
    pub item_height: u32,
    pub gap: u32,
    pub columns: u32,
    pub top_margin: u32,
    pub header_height: u32,
    pub section_title_height: u32,
    pub section_spacing: u32,
    pub bottom_padding: u32
}

impl Default for ChartLayout {
    fn default() -> Self {
        ChartLayout {
            canvas_width: 1200,
            item_width: 200,
            item_height: 150,
            gap: 20,
            columns: 5,
            top_margin: 50,
            header_height: 90,
            section_title_height: 60,
            section_spacing: 40,
            bottom_padding: 50
        }
    }
}

impl ChartLayout {
    pub fn rows(&self, capacity: usize) -> u32 {
        (capacity as u32).div_ceil(self.columns.max(1))
    }

    pub fn grid_height(&self, rows: u32) -> u32 {
        if rows == 0 {
            return 0;
        }

        rows * self.item_height + (rows - 1) * self.gap
    }

    /// Y coordinate where the recent section title starts.
    pub fn recent_section_top(&self) -> u32 {
        self.top_margin + self.header_height
    }

    /// Y coordinate where the older section title starts.
    pub fn older_section_top(&self, recent_capacity: usize) -> u32 {
        self.recent_section_top()
            + self.section_title_height
            + self.grid_height(self.rows(recent_capacity))
            + self.section_spacing
    }

    pub fn canvas_height(&self, recent_capacity: usize, older_capacity: usize) -> u32 {
        self.older_section_top(recent_capacity)
            + self.section_title_height
            + self.grid_height(self.rows(older_capacity))
            + self.bottom_padding
    }

    /// Top-left corner of the tile at `index` in a grid starting at `grid_top`.
    /// The grid is centered horizontally.
    pub fn tile_origin(&self, grid_top: u32, index: usize) -> (u32, u32) {
        let columns = self.columns.max(1);
        let grid_width = columns * self.item_width + (columns - 1) * self.gap;
        let left = self.canvas_width.saturating_sub(grid_width) / 2;

        let row = index as u32 / columns;
        let col = index as u32 % columns;

        (
            left + col * (self.item_width + self.gap),
            grid_top + row * (self.item_height + self.gap)
        )
    }
}
