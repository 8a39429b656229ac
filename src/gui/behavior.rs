//! Tile behavior and pane definitions for egui_tiles

use crate::gui::state::AppState;
use crate::gui::state::DropTarget;
use crate::gui::tiles;
use eframe::egui::{self};

/// The different types of panes in our application
#[derive(Clone, Debug)]
pub enum ImgToolsPane {
    /// Grid splitter controls
    Splitter,
    /// Source image with grid overlay
    SplitPreview,
    /// Channel packer slots and controls
    ChannelPacker,
}

impl ImgToolsPane {
    /// Get the title for this pane
    pub fn title(&self) -> &'static str {
        match self {
            ImgToolsPane::Splitter => "Image Splitter",
            ImgToolsPane::SplitPreview => "Split Preview",
            ImgToolsPane::ChannelPacker => "Channel Packer",
        }
    }

    fn drop_target(&self) -> DropTarget {
        match self {
            ImgToolsPane::Splitter | ImgToolsPane::SplitPreview => DropTarget::Splitter,
            ImgToolsPane::ChannelPacker => DropTarget::Packer,
        }
    }
}

/// Behavior implementation for our tile tree
pub struct ImgToolsBehavior<'a> {
    pub state: &'a mut AppState,
}

impl egui_tiles::Behavior<ImgToolsPane> for ImgToolsBehavior<'_> {
    fn tab_title_for_pane(&mut self, pane: &ImgToolsPane) -> egui::WidgetText {
        pane.title().into()
    }

    fn pane_ui(
        &mut self,
        ui: &mut egui::Ui,
        _tile_id: egui_tiles::TileId,
        pane: &mut ImgToolsPane,
    ) -> egui_tiles::UiResponse {
        if ui.rect_contains_pointer(ui.max_rect()) {
            self.state.hovered_pane = Some(pane.drop_target());
        }

        match pane {
            ImgToolsPane::Splitter => tiles::draw_splitter_tile(ui, self.state),
            ImgToolsPane::SplitPreview => tiles::draw_split_preview_tile(ui, self.state),
            ImgToolsPane::ChannelPacker => tiles::draw_channel_packer_tile(ui, self.state),
        }

        egui_tiles::UiResponse::None
    }

    fn simplification_options(&self) -> egui_tiles::SimplificationOptions {
        egui_tiles::SimplificationOptions {
            all_panes_must_have_tabs: true,
            ..Default::default()
        }
    }

    fn tab_bar_height(&self, _style: &egui::Style) -> f32 {
        24.0
    }

    fn gap_width(&self, _style: &egui::Style) -> f32 {
        2.0
    }
}

/// Create the default tile tree layout
pub fn create_default_tree() -> egui_tiles::Tree<ImgToolsPane> {
    let mut tiles = egui_tiles::Tiles::default();

    let splitter_id = tiles.insert_pane(ImgToolsPane::Splitter);
    let preview_id = tiles.insert_pane(ImgToolsPane::SplitPreview);
    let packer_id = tiles.insert_pane(ImgToolsPane::ChannelPacker);

    // Splitter controls above the packer, preview taking the right side
    let tools_column = tiles.insert_vertical_tile(vec![splitter_id, packer_id]);
    let root = tiles.insert_horizontal_tile(vec![tools_column, preview_id]);

    egui_tiles::Tree::new("imgtools_tree", root, tiles)
}
