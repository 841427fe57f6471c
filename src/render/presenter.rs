use std::{collections::HashMap, fmt::Write};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    config::RatingConfig,
    database::reference_index::{normalize_title, ReferenceIndex},
    model::{
        constants::{OLDER_CAPACITY, RECENT_CAPACITY},
        rating::rank_label,
        structures::records::{EnrichedRecord, RatingTotals, SelectionResult}
    },
    render::{
        cover_art::{CoverArt, CoverArtLoader},
        layout::ChartLayout,
        tile::{
            chart_type_color, difficulty_color, escape_xml, group_thousands, pad_tiles, truncate_name, Tile,
            PLACEHOLDER_NAME
        }
    }
};

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write chart markup: {0}")]
    Format(#[from] std::fmt::Error)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedChart {
    pub content_type: &'static str,
    pub body: String
}

/// Draws a selection as an SVG chart: a header with the totals, then one
/// fixed-size grid per list, padded with placeholder tiles.
#[derive(Debug)]
pub struct Presenter {
    layout: ChartLayout,
    recent_capacity: usize,
    older_capacity: usize,
    loader: Option<CoverArtLoader>
}

impl Default for Presenter {
    fn default() -> Self {
        Presenter::new(RECENT_CAPACITY, OLDER_CAPACITY)
    }
}

impl Presenter {
    pub fn new(recent_capacity: usize, older_capacity: usize) -> Presenter {
        Presenter {
            layout: ChartLayout::default(),
            recent_capacity,
            older_capacity,
            loader: None
        }
    }

    /// A presenter sized from `config` that fetches cover art.
    pub fn from_config(config: &RatingConfig) -> Result<Presenter, reqwest::Error> {
        let loader = CoverArtLoader::new(
            &config.cover_art_base_url,
            config.cover_art_concurrency,
            config.cover_art_cache_size,
            config.request_timeout
        )?;

        Ok(Presenter::new(config.recent_capacity, config.older_capacity).with_cover_art(loader))
    }

    pub fn with_cover_art(mut self, loader: CoverArtLoader) -> Presenter {
        self.loader = Some(loader);
        self
    }

    pub fn with_layout(mut self, layout: ChartLayout) -> Presenter {
        self.layout = layout;
        self
    }

    /// Renders the chart, fetching cover art for the displayed records when a
    /// loader is configured. `cover_refs` maps normalized titles to image
    /// references. Images that fail to load are left out.
    pub async fn render(
        &self,
        selection: &SelectionResult,
        cover_refs: &HashMap<String, String>
    ) -> Result<RenderedChart, RenderError> {
        let cover_art = match &self.loader {
            Some(loader) => {
                let wanted: HashMap<String, &String> = self
                    .displayed(selection)
                    .filter_map(|record| {
                        let title = normalize_title(record.song_name());
                        cover_refs.get(&title).map(|image_ref| (title, image_ref))
                    })
                    .collect();

                let loaded = loader.load_all(wanted.values().map(|r| r.to_string())).await;
                wanted
                    .into_iter()
                    .filter_map(|(title, image_ref)| loaded.get(image_ref).map(|art| (title, art.clone())))
                    .collect()
            }
            None => HashMap::new()
        };

        let body = self.render_svg(selection, &cover_art)?;
        debug!("Rendered chart ({} bytes, {} cover images)", body.len(), cover_art.len());

        Ok(RenderedChart {
            content_type: SVG_CONTENT_TYPE,
            body
        })
    }

    /// `cover_art` is keyed by normalized title.
    pub fn render_svg(
        &self,
        selection: &SelectionResult,
        cover_art: &HashMap<String, CoverArt>
    ) -> Result<String, RenderError> {
        let layout = &self.layout;
        let width = layout.canvas_width;
        let height = layout.canvas_height(self.recent_capacity, self.older_capacity);
        let totals = RatingTotals::from_records(
            selection.recent_list.iter().take(self.recent_capacity),
            selection.older_list.iter().take(self.older_capacity)
        );

        let mut out = String::with_capacity(64 * 1024);
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="{FONT_FAMILY}">"#
        )?;
        out.push_str(concat!(
            "<defs>",
            r##"<linearGradient id="background" x1="0" y1="0" x2="1" y2="1"><stop offset="0%" stop-color="#667eea"/><stop offset="100%" stop-color="#764ba2"/></linearGradient>"##,
            r##"<linearGradient id="placeholder" x1="0" y1="0" x2="0" y2="1"><stop offset="0%" stop-color="#2c3e50"/><stop offset="100%" stop-color="#34495e"/></linearGradient>"##,
            "</defs>\n"
        ));
        writeln!(out, r#"<rect width="{width}" height="{height}" fill="url(#background)"/>"#)?;

        let center = width / 2;
        let title_y = layout.top_margin + 40;
        let totals_y = layout.top_margin + 78;
        writeln!(
            out,
            r##"<text x="{center}" y="{title_y}" text-anchor="middle" font-size="36" font-weight="bold" fill="#ffffff">maimai DX Rating</text>"##
        )?;
        writeln!(
            out,
            r##"<text x="{center}" y="{totals_y}" text-anchor="middle" font-size="22" fill="#ffffff">Total {} | New {} | Old {}</text>"##,
            group_thousands(totals.total),
            group_thousands(totals.recent),
            group_thousands(totals.older)
        )?;

        self.write_section(
            &mut out,
            "recent",
            "NEW CHARTS",
            &selection.recent_list,
            self.recent_capacity,
            layout.recent_section_top(),
            cover_art
        )?;
        self.write_section(
            &mut out,
            "older",
            "OLD CHARTS",
            &selection.older_list,
            self.older_capacity,
            layout.older_section_top(self.recent_capacity),
            cover_art
        )?;

        out.push_str("</svg>\n");

        Ok(out)
    }

    fn displayed<'a>(&self, selection: &'a SelectionResult) -> impl Iterator<Item = &'a EnrichedRecord> {
        selection
            .recent_list
            .iter()
            .take(self.recent_capacity)
            .chain(selection.older_list.iter().take(self.older_capacity))
    }

    #[allow(clippy::too_many_arguments)]
    fn write_section(
        &self,
        out: &mut String,
        id: &str,
        title: &str,
        records: &[EnrichedRecord],
        capacity: usize,
        top: u32,
        cover_art: &HashMap<String, CoverArt>
    ) -> Result<(), RenderError> {
        let layout = &self.layout;
        let (left, _) = layout.tile_origin(0, 0);
        let shown = records.len().min(capacity);

        writeln!(
            out,
            r##"<text x="{left}" y="{}" font-size="26" font-weight="bold" fill="#ffffff">{title} ({shown}/{capacity})</text>"##,
            top + 40
        )?;

        let grid_top = top + layout.section_title_height;
        for (index, tile) in pad_tiles(records, capacity).into_iter().enumerate() {
            let (x, y) = layout.tile_origin(grid_top, index);
            match tile {
                Tile::Record { position, record } => {
                    let art = cover_art.get(&normalize_title(record.song_name()));
                    self.write_record_tile(out, &format!("{id}-{index}"), x, y, position, record, art)?;
                }
                Tile::Placeholder => self.write_placeholder_tile(out, x, y)?
            }
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn write_record_tile(
        &self,
        out: &mut String,
        clip_id: &str,
        x: u32,
        y: u32,
        position: usize,
        record: &EnrichedRecord,
        art: Option<&CoverArt>
    ) -> Result<(), RenderError> {
        let w = self.layout.item_width;
        let h = self.layout.item_height;
        let color = difficulty_color(record.difficulty());
        let right = x + w - 10;

        out.push_str("<g>");
        match art {
            Some(art) => {
                write!(
                    out,
                    r#"<clipPath id="tile-{clip_id}"><rect x="{x}" y="{y}" width="{w}" height="{h}" rx="12"/></clipPath>"#
                )?;
                write!(
                    out,
                    r#"<image href="{}" x="{x}" y="{y}" width="{w}" height="{h}" preserveAspectRatio="xMidYMid slice" clip-path="url(#tile-{clip_id})"/>"#,
                    art.data_uri()
                )?;
                write!(
                    out,
                    r##"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="12" fill="#000000" fill-opacity="0.55"/>"##
                )?;
            }
            None => write!(
                out,
                r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="12" fill="{color}" fill-opacity="0.85"/>"#
            )?
        }
        write!(
            out,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="12" fill="none" stroke="{color}" stroke-width="3"/>"#
        )?;

        write!(
            out,
            r##"<text x="{}" y="{}" font-size="14" font-weight="bold" fill="#ffffff">#{}</text>"##,
            x + 10,
            y + 24,
            position + 1
        )?;

        let chart_type = record.chart_type();
        write!(
            out,
            r#"<rect x="{}" y="{}" width="42" height="20" rx="4" fill="{}"/>"#,
            x + w - 50,
            y + 8,
            chart_type_color(chart_type)
        )?;
        write!(
            out,
            r##"<text x="{}" y="{}" text-anchor="middle" font-size="12" font-weight="bold" fill="#ffffff">{chart_type}</text>"##,
            x + w - 29,
            y + 23
        )?;

        write!(
            out,
            r##"<text x="{}" y="{}" font-size="15" font-weight="bold" fill="#ffffff">{}</text>"##,
            x + 10,
            y + 55,
            escape_xml(&truncate_name(record.song_name()))
        )?;
        write!(
            out,
            r##"<text x="{}" y="{}" font-size="18" fill="#ffffff">{:.4}%</text>"##,
            x + 10,
            y + 85,
            record.achievement()
        )?;
        write!(
            out,
            r##"<text x="{right}" y="{}" text-anchor="end" font-size="16" font-weight="bold" fill="#ffd700">{}</text>"##,
            y + 85,
            rank_label(record.achievement())
        )?;
        write!(
            out,
            r##"<text x="{}" y="{}" font-size="13" fill="#ffffff">Lv.{}</text>"##,
            x + 10,
            y + h - 15,
            record.level()
        )?;
        write!(
            out,
            r##"<text x="{right}" y="{}" text-anchor="end" font-size="20" font-weight="bold" fill="#ffffff">{}</text>"##,
            y + h - 15,
            record.rating()
        )?;
        out.push_str("</g>\n");

        Ok(())
    }

    fn write_placeholder_tile(&self, out: &mut String, x: u32, y: u32) -> Result<(), RenderError> {
        let w = self.layout.item_width;
        let h = self.layout.item_height;

        writeln!(
            out,
            r##"<g><rect x="{x}" y="{y}" width="{w}" height="{h}" rx="12" fill="url(#placeholder)"/><rect x="{x}" y="{y}" width="{w}" height="{h}" rx="12" fill="none" stroke="#7f8c8d" stroke-width="2" stroke-dasharray="6 4"/><text x="{}" y="{}" text-anchor="middle" font-size="18" fill="#bdc3c7">{PLACEHOLDER_NAME}</text></g>"##,
            x + w / 2,
            y + h / 2 + 6
        )?;

        Ok(())
    }
}

/// Image references for every record in `selection` that the reference
/// table has cover art for, keyed by normalized title.
pub fn cover_art_refs(index: &ReferenceIndex, selection: &SelectionResult) -> HashMap<String, String> {
    selection
        .recent_list
        .iter()
        .chain(&selection.older_list)
        .filter_map(|record| {
            index
                .cover_art(record.song_name())
                .map(|image_ref| (normalize_title(record.song_name()), image_ref.to_string()))
        })
        .collect()
}
