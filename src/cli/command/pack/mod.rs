use crate::channels;
use crate::channels::ChannelAssignment;
use crate::cli::to_args::ToArgs;
use arbitrary::Arbitrary;
use clap::Args;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

/// Pack grayscale images into the channels of one RGB PNG; missing channels are black
#[derive(Args, Arbitrary, Clone, PartialEq, Debug)]
pub struct PackArgs {
    /// Image for the red channel
    #[clap(long)]
    pub red: Option<String>,

    /// Image for the green channel
    #[clap(long)]
    pub green: Option<String>,

    /// Image for the blue channel
    #[clap(long)]
    pub blue: Option<String>,

    /// Output file (`.png` is appended if missing)
    #[clap(long, short = 'o')]
    pub output: String,
}

impl PackArgs {
    /// # Errors
    ///
    /// Returns an error if no channel is given, an input cannot be loaded, or the output
    /// cannot be written.
    pub fn invoke(self) -> eyre::Result<()> {
        let red = self.red.as_deref().map(Path::new);
        let green = self.green.as_deref().map(Path::new);
        let blue = self.blue.as_deref().map(Path::new);
        if red.is_none() && green.is_none() && blue.is_none() {
            return Err(crate::Error::NoChannels.into());
        }

        let assignment = ChannelAssignment::from_paths(red, green, blue)?;
        println!("{}", channels::readiness_summary(&assignment.provided()));

        let packed = channels::pack(&assignment)?;
        let written = channels::save_packed(&packed, &PathBuf::from(&self.output))?;
        println!(
            "Images successfully packed ({}x{})! Saved to: {}",
            packed.width(),
            packed.height(),
            written.display()
        );
        Ok(())
    }
}

impl ToArgs for PackArgs {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        for (flag, value) in [
            ("--red", &self.red),
            ("--green", &self.green),
            ("--blue", &self.blue),
        ] {
            if let Some(value) = value {
                args.push(flag.into());
                args.push(value.into());
            }
        }
        args.push("--output".into());
        args.push(OsString::from(self.output.clone()));
        args
    }
}
