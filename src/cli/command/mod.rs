pub mod gui;
pub mod pack;
pub mod preview;
pub mod split;

use crate::cli::command::gui::GuiArgs;
use crate::cli::command::pack::PackArgs;
use crate::cli::command::preview::PreviewArgs;
use crate::cli::command::split::SplitArgs;
use crate::cli::to_args::ToArgs;
use arbitrary::Arbitrary;
use clap::Subcommand;
use std::ffi::OsString;

#[derive(Subcommand, Arbitrary, PartialEq, Debug)]
pub enum Command {
    /// Split an image into a grid of PNG tiles
    Split(SplitArgs),

    /// Write a copy of an image with the split grid drawn on it
    Preview(PreviewArgs),

    /// Pack up to three grayscale images into the R, G and B channels of one PNG
    Pack(PackArgs),

    /// Launch a graphical user interface
    Gui(GuiArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Gui(GuiArgs::default())
    }
}

impl Command {
    /// # Errors
    ///
    /// Returns an error if the selected command fails.
    pub fn invoke(self) -> eyre::Result<()> {
        match self {
            Command::Split(args) => args.invoke(),
            Command::Preview(args) => args.invoke(),
            Command::Pack(args) => args.invoke(),
            Command::Gui(args) => args.invoke(),
        }
    }
}

impl ToArgs for Command {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        match self {
            Command::Split(split_args) => {
                args.push("split".into());
                args.extend(split_args.to_args());
            }
            Command::Preview(preview_args) => {
                args.push("preview".into());
                args.extend(preview_args.to_args());
            }
            Command::Pack(pack_args) => {
                args.push("pack".into());
                args.extend(pack_args.to_args());
            }
            Command::Gui(gui_args) => {
                args.push("gui".into());
                args.extend(gui_args.to_args());
            }
        }
        args
    }
}
